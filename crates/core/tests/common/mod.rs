//! Shared setup for integration tests

use plume_core::{CaseStudy, GeoCoord, SourceSpec};

/// Install a tracing subscriber once per test binary; `RUST_LOG` controls verbosity
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Default case-study source with a different wind-from bearing
#[allow(dead_code)]
pub fn case_source(case: CaseStudy, wind_from: f64) -> SourceSpec {
    let GeoCoord { lat, lon } = case.origin();
    SourceSpec::from_scalars(
        lat,
        lon,
        CaseStudy::DEFAULT_EMISSION_RATE,
        CaseStudy::DEFAULT_WIND_SPEED,
        wind_from,
        CaseStudy::DEFAULT_RELEASE_HEIGHT,
    )
    .unwrap()
}
