use clap::Parser;
use plume_core::{
    AnimationConfig, CaseStudy, Frame, GeoCoord, HeatPoint, Meters, PlumeConfig, PlumeModel,
    PlumeOutput, RampMode, SourceSpec,
};
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Gaussian plume dispersion demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "plume-demo")]
#[command(about = "Gaussian plume contamination dispersion demo", long_about = None)]
struct Args {
    /// Case study preset supplying the source location (fukushima, chernobyl)
    #[arg(short, long, default_value = "fukushima")]
    case: String,

    /// Override source latitude in degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Override source longitude in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Emission rate Q (units per second)
    #[arg(short = 'q', long, default_value_t = CaseStudy::DEFAULT_EMISSION_RATE)]
    emission_rate: f64,

    /// Wind speed U in m/s
    #[arg(short = 'u', long, default_value_t = CaseStudy::DEFAULT_WIND_SPEED)]
    wind_speed: f64,

    /// Bearing the wind blows from, in degrees (0=North, 90=East)
    #[arg(short = 'w', long, default_value_t = CaseStudy::DEFAULT_WIND_FROM)]
    wind_from: f64,

    /// Release height H in meters
    #[arg(long, default_value_t = CaseStudy::DEFAULT_RELEASE_HEIGHT)]
    release_height: f64,

    /// Animate with this many frames instead of a single steady plume
    #[arg(short, long)]
    animate: Option<usize>,

    /// First spread factor of the animation
    #[arg(long, default_value_t = 0.2)]
    start_factor: f64,

    /// Scale the emission rate together with the spread during animation
    #[arg(long)]
    ramp_emission: bool,

    /// Compute all animation frames up front in parallel
    #[arg(long)]
    parallel: bool,

    /// Delay between printed animation frames in milliseconds
    #[arg(long, default_value_t = 0)]
    frame_delay_ms: u64,

    /// Model configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the result as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write heat points as CSV (frame,lat,lon,weight)
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Serialize)]
struct AnimationReport<'a> {
    source: &'a SourceSpec,
    animation: &'a AnimationConfig,
    frames: &'a [Frame],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Gaussian Plume Demo ===\n");

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PlumeConfig::default(),
    };
    let model = PlumeModel::new(config)?;
    let source = build_source(args)?;

    println!("Source: {source}");
    println!("Plume travels toward {}\n", source.wind_to());

    match args.animate {
        Some(steps) => run_animation(args, &model, &source, steps),
        None => run_single(args, &model, &source),
    }
}

fn load_config(path: &Path) -> Result<PlumeConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let config: PlumeConfig = serde_json::from_str(&text)?;
    info!("Loaded model configuration from {}", path.display());
    Ok(config)
}

fn build_source(args: &Args) -> Result<SourceSpec, Box<dyn std::error::Error>> {
    let origin = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            println!("Using custom origin");
            GeoCoord::new(lat, lon)
        }
        _ => {
            let case = CaseStudy::from_name(&args.case).ok_or_else(|| {
                format!(
                    "Unknown case study '{}', expected one of: fukushima, chernobyl",
                    args.case
                )
            })?;
            println!("Case study: {case}");
            case.origin()
        }
    };

    Ok(SourceSpec::from_scalars(
        origin.lat,
        origin.lon,
        args.emission_rate,
        args.wind_speed,
        args.wind_from,
        args.release_height,
    )?)
}

fn run_single(
    args: &Args,
    model: &PlumeModel,
    source: &SourceSpec,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let output = model.compute_heat_points(source)?;
    let elapsed = start.elapsed();

    print_summary(&output, model.config().meters_per_degree);
    println!("Computed in {:.2} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = &args.json {
        write_json(path, &output)?;
    }
    if let Some(path) = &args.csv {
        write_csv(path, std::iter::once((0, output.points.as_slice())))?;
    }
    Ok(())
}

fn run_animation(
    args: &Args,
    model: &PlumeModel,
    source: &SourceSpec,
    steps: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let animation = AnimationConfig {
        steps,
        start_factor: args.start_factor,
        ramp: if args.ramp_emission {
            RampMode::SpreadAndEmission
        } else {
            RampMode::SpreadOnly
        },
        ..Default::default()
    };
    let sequencer = model.sequencer(source, animation)?;

    println!(
        "{:>5} {:>8} {:>8} {:>8} {:>12}",
        "frame", "factor", "Q scale", "points", "centroid km"
    );

    let print_frame = |frame: &Frame| {
        let reach = plume_core::weighted_centroid(&frame.points)
            .map_or(0.0, |c| source.origin().offset_to(c, model.config().meters_per_degree).distance());
        println!(
            "{:>5} {:>8.3} {:>8.3} {:>8} {:>12.2}",
            frame.index,
            frame.spread_factor,
            frame.emission_scale,
            frame.points.len(),
            Meters::new(reach).to_kilometers()
        );
        for warning in &frame.warnings {
            println!("      warning: {warning}");
        }
    };

    let frames = if args.parallel {
        let frames = sequencer.precompute_parallel()?;
        frames.iter().for_each(print_frame);
        frames
    } else {
        let mut frames = Vec::with_capacity(steps);
        for frame in sequencer.frames() {
            let frame = frame?;
            print_frame(&frame);
            frames.push(frame);
            if args.frame_delay_ms > 0 {
                thread::sleep(Duration::from_millis(args.frame_delay_ms));
            }
        }
        frames
    };

    if let Some(path) = &args.json {
        write_json(
            path,
            &AnimationReport {
                source,
                animation: sequencer.config(),
                frames: &frames,
            },
        )?;
    }
    if let Some(path) = &args.csv {
        write_csv(path, frames.iter().map(|f| (f.index, f.points.as_slice())))?;
    }
    Ok(())
}

fn print_summary(output: &PlumeOutput, meters_per_degree: f64) {
    println!("Heat points: {}", output.points.len());
    println!("Peak concentration: {:.3e}", output.peak_concentration);

    match output.centroid() {
        Some(centroid) => {
            let offset = output.origin.offset_to(centroid, meters_per_degree);
            println!(
                "Weighted centroid: {centroid} ({:.2} km at {:.1}° from source)",
                Meters::new(offset.distance()).to_kilometers(),
                offset.bearing()
            );
        }
        None => println!("Weighted centroid: n/a"),
    }

    for warning in &output.warnings {
        println!("Warning: {warning}");
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn write_csv<'a>(
    path: &Path,
    frames: impl Iterator<Item = (usize, &'a [HeatPoint])>,
) -> io::Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    writeln!(out, "frame,lat,lon,weight")?;
    for (index, points) in frames {
        for p in points {
            writeln!(out, "{},{:.6},{:.6},{:.6}", index, p.lat, p.lon, p.weight)?;
        }
    }
    out.flush()?;
    println!("Wrote {}", path.display());
    Ok(())
}
