//! Geolab CLI - geodesic computation over OBJ meshes.
//!
//! Usage: geolab <START_ID> <END_ID> <MODEL_PATH> [MODE]
//!
//! Runs one solver and writes its JSON record under ./frontend/public/.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geolab::engine::{self, EngineReport, Mode, OUTPUT_DIR};

#[derive(Parser)]
#[command(name = "geolab")]
#[command(version, about = "Geodesic computation engine", long_about = None)]
struct Cli {
    /// Source vertex id (OBJ `v`-line order).
    start_id: usize,

    /// Target vertex id.
    end_id: usize,

    /// Path to the OBJ model.
    model_path: PathBuf,

    /// Solver mode: "analytics", "heat", or empty for Dijkstra.
    #[arg(default_value = "")]
    mode: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Argument failures exit with 1, not clap's default of 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures.
            if err.use_stderr() {
                eprint!("{err}");
                return ExitCode::from(1);
            }
            print!("{err}");
            return ExitCode::SUCCESS;
        }
    };

    let Some(mode) = Mode::parse(&cli.mode) else {
        eprintln!("Error: unknown mode '{}' (expected \"analytics\" or \"heat\")", cli.mode);
        return ExitCode::from(1);
    };

    let report = match engine::run(cli.start_id, cli.end_id, &cli.model_path, mode) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(1);
        }
    };

    if let Err(err) = report.write(Path::new(OUTPUT_DIR), mode) {
        eprintln!("Error: {err}");
        return ExitCode::from(1);
    }

    print_summary(&report, mode);

    if report.error().is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn print_summary(report: &EngineReport, mode: Mode) {
    match report {
        EngineReport::Dijkstra(r) => {
            println!("--- geolab: dijkstra ---");
            match r.total_distance {
                Some(d) => println!("Target distance: {d}"),
                None => println!("Target distance: (unreachable)"),
            }
            let path: Vec<String> = r.path.iter().map(|v| v.to_string()).collect();
            println!("Path: {}", path.join(" "));
        }
        EngineReport::Analytics(r) => {
            match mode {
                Mode::Heat => println!("--- geolab: heat method ---"),
                _ => println!("--- geolab: analytics ---"),
            }
            if r.error.is_empty() {
                println!("Surface: {}", r.surface_type);
                println!("Curves: {}", r.curves.len());
            } else {
                println!("Error: {}", r.error);
            }
        }
    }
}
