//! Interactive Plume Demo
//!
//! A terminal REPL for exploring the Gaussian plume model. Adjust the
//! source parameters, run the steady plume or a spreading animation, and
//! inspect the most recent result as a table or an ASCII heat map.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `case <name>` - Switch the source location to a case study (fukushima, chernobyl)
//! - `set <param> <value>` - Change a parameter (lat, lon, q, u, from, h, steps, ramp)
//! - `params` - Show the current parameters
//! - `run` - Compute the steady plume
//! - `animate [steps]` - Compute a spreading animation and keep its final frame
//! - `show [n]` - List the n heaviest heat points of the last result (default 10)
//! - `heatmap [size]` - Render the last result as a size×size ASCII map
//! - `help` - Show available commands
//! - `quit` - Exit

use plume_core::{
    AnimationConfig, CaseStudy, GeoCoord, Meters, MetersPerSecond, PlumeModel, PlumeOutput,
    RampMode, SourceSpec,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_HEATMAP_SIZE: usize = 30;
const MAX_HEATMAP_SIZE: usize = 200;
const DEFAULT_SHOW_COUNT: usize = 10;

/// Editable parameters plus the cached last result
struct Session {
    model: PlumeModel,
    case: Option<CaseStudy>,
    origin: GeoCoord,
    emission_rate: f64,
    wind_speed: f64,
    wind_from: f64,
    release_height: f64,
    steps: usize,
    ramp: RampMode,
    /// Replaced by `run` and `animate` only
    last_result: Option<PlumeOutput>,
}

impl Session {
    fn new() -> Self {
        let case = CaseStudy::FukushimaDaiichi;
        Self {
            model: PlumeModel::default(),
            case: Some(case),
            origin: case.origin(),
            emission_rate: CaseStudy::DEFAULT_EMISSION_RATE,
            wind_speed: CaseStudy::DEFAULT_WIND_SPEED,
            wind_from: CaseStudy::DEFAULT_WIND_FROM,
            release_height: CaseStudy::DEFAULT_RELEASE_HEIGHT,
            steps: AnimationConfig::default().steps,
            ramp: RampMode::default(),
            last_result: None,
        }
    }

    fn source(&self) -> plume_core::Result<SourceSpec> {
        SourceSpec::from_scalars(
            self.origin.lat,
            self.origin.lon,
            self.emission_rate,
            self.wind_speed,
            self.wind_from,
            self.release_height,
        )
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║          Gaussian Plume Dispersion - Interactive          ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let mut session = Session::new();
    show_params(&session);

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("Type 'help' for available commands.\n");

    loop {
        let readline = rl.readline("plume> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "case" | "c" => {
                        if let Some(name) = parts.get(1) {
                            set_case(&mut session, name);
                        } else {
                            println!("Usage: case <fukushima|chernobyl>");
                        }
                    }
                    "set" => {
                        if let (Some(param), Some(value)) = (parts.get(1), parts.get(2)) {
                            set_param(&mut session, param, value);
                        } else {
                            println!("Usage: set <param> <value>  (lat, lon, q, u, from, h, steps, ramp)");
                        }
                    }
                    "params" | "p" => show_params(&session),
                    "run" | "r" => run_steady(&mut session),
                    "animate" | "a" => {
                        let steps = parts
                            .get(1)
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(session.steps);
                        run_animation(&mut session, steps);
                    }
                    "show" | "s" => {
                        let count = parts
                            .get(1)
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(DEFAULT_SHOW_COUNT);
                        show_result(&session, count);
                    }
                    "heatmap" | "hm" => show_heatmap(&session, heatmap_size(parts.get(1).copied())),
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => println!(
                        "Unknown command: {}. Type 'help' for available commands.",
                        parts[0]
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
}

fn set_case(session: &mut Session, name: &str) {
    match CaseStudy::from_name(name) {
        Some(case) => {
            session.case = Some(case);
            session.origin = case.origin();
            println!("Source moved to {} at {}", case, session.origin);
        }
        None => {
            let names: Vec<&str> = CaseStudy::ALL.iter().map(CaseStudy::name).collect();
            println!("Unknown case '{}'. Available: {}", name, names.join(", "));
        }
    }
}

fn set_param(session: &mut Session, param: &str, value: &str) {
    if param.eq_ignore_ascii_case("ramp") {
        session.ramp = match value.to_lowercase().as_str() {
            "spread" | "spread_only" => RampMode::SpreadOnly,
            "emission" | "spread_and_emission" => RampMode::SpreadAndEmission,
            _ => {
                println!("Usage: set ramp <spread|emission>");
                return;
            }
        };
        println!("ramp = {:?}", session.ramp);
        return;
    }

    if param.eq_ignore_ascii_case("steps") {
        match value.parse::<usize>() {
            Ok(steps) if steps > 0 => {
                session.steps = steps;
                println!("steps = {steps}");
            }
            _ => println!("steps must be a positive integer"),
        }
        return;
    }

    let Ok(number) = value.parse::<f64>() else {
        println!("Invalid number: {value}");
        return;
    };

    // Range checks happen when the source is built, so bad values surface on `run`
    match param.to_lowercase().as_str() {
        "lat" => {
            session.origin.lat = number;
            session.case = None;
        }
        "lon" => {
            session.origin.lon = number;
            session.case = None;
        }
        "q" | "emission" => session.emission_rate = number,
        "u" | "wind_speed" => session.wind_speed = number,
        "from" | "wind_from" => session.wind_from = number,
        "h" | "height" => session.release_height = number,
        _ => {
            println!("Unknown parameter '{param}'. Type 'help' for the list.");
            return;
        }
    }
    println!("{} = {}", param.to_lowercase(), number);
}

fn show_params(session: &Session) {
    println!("\n═══════════════ SOURCE PARAMETERS ═══════════════");
    match session.case {
        Some(case) => println!("Case study:      {}", case),
        None => println!("Case study:      (custom)"),
    }
    println!("Origin:          {}", session.origin);
    println!("Emission rate:   {:e} /s", session.emission_rate);
    println!(
        "Wind speed:      {:.1} m/s ({:.1} km/h)",
        session.wind_speed,
        MetersPerSecond::new(session.wind_speed).to_kmh()
    );
    println!(
        "Wind from:       {:.0}° (plume heads {:.0}°)",
        session.wind_from,
        (session.wind_from + 180.0).rem_euclid(360.0)
    );
    println!("Release height:  {:.0} m", session.release_height);
    println!("Animation:       {} steps, {:?}", session.steps, session.ramp);
    match &session.last_result {
        Some(result) => println!("Last result:     {} heat points", result.points.len()),
        None => println!("Last result:     none"),
    }
    println!("══════════════════════════════════════════════════\n");
}

fn run_steady(session: &mut Session) {
    let source = match session.source() {
        Ok(source) => source,
        Err(e) => {
            println!("Cannot run: {e}");
            return;
        }
    };

    let start = Instant::now();
    match session.model.compute_heat_points(&source) {
        Ok(output) => {
            println!(
                "Computed {} heat points in {:.1} ms",
                output.points.len(),
                start.elapsed().as_secs_f64() * 1000.0
            );
            print_summary(&output, session.model.config().meters_per_degree);
            session.last_result = Some(output);
        }
        Err(e) => println!("Run failed: {e}"),
    }
}

fn run_animation(session: &mut Session, steps: usize) {
    let source = match session.source() {
        Ok(source) => source,
        Err(e) => {
            println!("Cannot animate: {e}");
            return;
        }
    };
    let animation = AnimationConfig {
        steps,
        ramp: session.ramp,
        ..Default::default()
    };
    let sequencer = match session.model.sequencer(&source, animation) {
        Ok(sequencer) => sequencer,
        Err(e) => {
            println!("Cannot animate: {e}");
            return;
        }
    };

    println!("\n{:>5} {:>8} {:>8} {:>8}", "frame", "factor", "Q scale", "points");
    let mut last_frame = None;
    for frame in sequencer.frames() {
        match frame {
            Ok(frame) => {
                println!(
                    "{:>5} {:>8.3} {:>8.3} {:>8}",
                    frame.index,
                    frame.spread_factor,
                    frame.emission_scale,
                    frame.points.len()
                );
                last_frame = Some(frame);
            }
            Err(e) => {
                println!("Frame failed: {e}");
                return;
            }
        }
    }

    if let Some(frame) = last_frame {
        let output = frame.into_output(source);
        print_summary(&output, session.model.config().meters_per_degree);
        session.last_result = Some(output);
    }
}

fn print_summary(output: &PlumeOutput, meters_per_degree: f64) {
    println!("Peak concentration: {:.3e}", output.peak_concentration);
    if let Some(centroid) = output.centroid() {
        let offset = output.origin.offset_to(centroid, meters_per_degree);
        println!(
            "Centroid:           {} ({:.2} km toward {:.0}°)",
            centroid,
            Meters::new(offset.distance()).to_kilometers(),
            offset.bearing()
        );
    }
    for warning in &output.warnings {
        println!("Warning: {warning}");
    }
    println!();
}

fn show_result(session: &Session, count: usize) {
    let Some(result) = &session.last_result else {
        println!("No result yet. Use 'run' or 'animate' first.");
        return;
    };

    let mut points = result.points.clone();
    points.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    println!("\n═══════════════ LAST RESULT ═══════════════");
    println!("Source:  {}", result.source);
    println!("Points:  {}", result.points.len());
    println!("\n{:>12} {:>12} {:>8}", "lat", "lon", "weight");
    for p in points.iter().take(count) {
        println!("{:>12.5} {:>12.5} {:>8.4}", p.lat, p.lon, p.weight);
    }
    if points.len() > count {
        println!("  ... and {} more", points.len() - count);
    }
    println!("════════════════════════════════════════════\n");
}

/// Parse the `heatmap` size argument, defaulting when absent or malformed and
/// clamping into [2, `MAX_HEATMAP_SIZE`]
fn heatmap_size(arg: Option<&str>) -> usize {
    let requested = arg
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HEATMAP_SIZE);
    if requested > MAX_HEATMAP_SIZE {
        println!("Heatmap size limited to {MAX_HEATMAP_SIZE}");
    }
    requested.clamp(2, MAX_HEATMAP_SIZE)
}

fn show_heatmap(session: &Session, size: usize) {
    let Some(result) = &session.last_result else {
        println!("No result yet. Use 'run' or 'animate' first.");
        return;
    };
    if result.points.is_empty() {
        println!("Last result has no heat points to draw.");
        return;
    }

    let mpd = session.model.config().meters_per_degree;
    let origin = result.origin;

    // Square extent centered on the source, large enough for every point
    let reach = result
        .points
        .iter()
        .map(|p| {
            let o = origin.offset_to(p.coord(), mpd);
            o.north.abs().max(o.east.abs())
        })
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let cell = 2.0 * reach / size as f64;

    let mut grid = vec![vec![0.0_f64; size]; size];
    for p in &result.points {
        let o = origin.offset_to(p.coord(), mpd);
        let col = (((o.east + reach) / cell).floor() as usize).min(size - 1);
        let row = (((o.north + reach) / cell).floor() as usize).min(size - 1);
        grid[row][col] = grid[row][col].max(p.weight);
    }

    let source_cell = ((reach / cell).floor() as usize).min(size - 1);

    println!("\n═══════════════ PLUME HEATMAP ═══════════════");
    println!("Legend: S = source  · = none  ░ >0  ▒ >0.1  ▓ >0.3  █ >0.6 (weight)");
    println!(
        "North is up. Each cell is {:.2} km wide.\n",
        Meters::new(cell).to_kilometers()
    );

    for row in (0..size).rev() {
        let north_km = Meters::new(row as f64 * cell - reach).to_kilometers();
        print!("{:>7.1} │ ", north_km);
        for col in 0..size {
            if row == source_cell && col == source_cell {
                print!("S ");
                continue;
            }
            let w = grid[row][col];
            let c = if w > 0.6 {
                '█'
            } else if w > 0.3 {
                '▓'
            } else if w > 0.1 {
                '▒'
            } else if w > 0.0 {
                '░'
            } else {
                '·'
            };
            print!("{} ", c);
        }
        println!();
    }

    print!("        └");
    for _ in 0..size {
        print!("──");
    }
    println!();
    print!("          ");
    for col in (0..size).step_by(5) {
        print!("{:<10.1}", Meters::new(col as f64 * cell - reach).to_kilometers());
    }
    println!(" km east\n");

    let occupied = grid.iter().flatten().filter(|&&w| w > 0.0).count();
    println!("Occupied cells: {} / {}", occupied, size * size);
    println!("═════════════════════════════════════════════\n");
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  case <name>, c       - Use a case-study location (fukushima, chernobyl)");
    println!("  set <param> <value>  - Change a parameter:");
    println!("                         lat, lon    source position in degrees");
    println!("                         q           emission rate (> 0)");
    println!("                         u           wind speed in m/s (> 0)");
    println!("                         from        bearing the wind blows from, [0, 360)");
    println!("                         h           release height in meters (>= 0)");
    println!("                         steps       default animation frame count");
    println!("                         ramp        spread | emission");
    println!("  params, p            - Show current parameters");
    println!("  run, r               - Compute the steady plume");
    println!("  animate [n], a       - Run an n-frame spreading animation");
    println!("  show [n], s          - List the n heaviest points of the last result");
    println!("  heatmap [size], hm   - ASCII heat map of the last result (default 30, max 200)");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!("══════════════════════════════════════════════════\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heatmap_size_is_bounded() {
        assert_eq!(heatmap_size(None), DEFAULT_HEATMAP_SIZE);
        assert_eq!(heatmap_size(Some("abc")), DEFAULT_HEATMAP_SIZE);
        assert_eq!(heatmap_size(Some("40")), 40);
        assert_eq!(heatmap_size(Some("0")), 2);
        assert_eq!(heatmap_size(Some("100000000")), MAX_HEATMAP_SIZE);
    }
}
