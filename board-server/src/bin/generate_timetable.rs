//! Offline timetable generation CLI.
//!
//! Writes one service day of synthetic trains to a CSV file the server
//! loads at startup. Run once per service-day kind:
//!
//! ```text
//! generate-timetable --output data/timetable-weekday.csv --seed 1
//! generate-timetable --output data/timetable-holiday.csv --seed 2
//! ```

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use board_server::generator::{GeneratorConfig, generate};
use board_server::line::yokohama_line;
use board_server::timetable::write_csv_file;

#[derive(Parser)]
#[command(name = "generate-timetable")]
#[command(about = "Generate a synthetic timetable CSV for the line")]
struct Args {
    /// Output CSV path.
    #[arg(long, default_value = "data/timetable-weekday.csv")]
    output: PathBuf,

    /// RNG seed, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let line = yokohama_line();
    let config = GeneratorConfig::default();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let trains = generate(&line, &config, &mut rng).expect("generation failed");

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent).expect("failed to create output directory");
    }
    write_csv_file(&args.output, &line, &trains).expect("failed to write timetable");

    info!(
        trains = trains.len(),
        output = %args.output.display(),
        "timetable written"
    );
}
