use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use garage_monitor::duration::{format_elapsed, parse_duration};
use garage_monitor::report::{self, FleetSummary};
use garage_monitor::{CsvSource, FleetRegistry, Settings};

#[derive(Parser, Debug)]
#[command(name = "garage-monitor")]
#[command(about = "Score engine diagnostics for a fleet of cars and report alerts")]
struct Args {
    /// Path to the diagnostics CSV file (CarID,DiagnosticType,Value)
    #[arg(short, long, default_value = "diagnostics.csv")]
    file: PathBuf,

    /// Drift updates applied to each car in the multi-threaded pass
    #[arg(short, long)]
    updates: Option<usize>,

    /// Pause between drift updates (e.g., "10ms", "0.5s")
    #[arg(short, long)]
    delay: Option<String>,

    /// TOML settings file with [thresholds] and [drift] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the multi-threaded pass to a JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(updates) = args.updates {
        settings.drift.updates = updates;
    }
    if let Some(delay) = &args.delay {
        parse_duration(delay).with_context(|| format!("Invalid --delay: {}", delay))?;
        settings.drift.delay = delay.clone();
    }

    run(&args.file, &settings, args.export.as_deref())
}

/// Log to stderr so report output on stdout stays clean.
fn init_logging(verbose: bool) {
    let level = if verbose { "garage_monitor=debug" } else { "garage_monitor=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_fleet(path: &Path) -> Result<FleetRegistry> {
    let mut source = CsvSource::new(path);
    FleetRegistry::load(&mut source)
        .with_context(|| format!("Failed to load diagnostics from {}", path.display()))
}

/// Run the single-threaded pass, then reload and run the drift pass.
fn run(path: &Path, settings: &Settings, export: Option<&Path>) -> Result<()> {
    let delay = settings.drift.delay()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let fleet = load_fleet(path)?;
    writeln!(out, "--- Single-threaded Execution ---")?;
    let start = Instant::now();
    let reports = fleet.report_with(&settings.thresholds);
    report::write_report(&mut out, &reports)?;
    writeln!(
        out,
        "Single-threaded execution time: {}\n",
        format_elapsed(start.elapsed())
    )?;

    // Reload so both passes start from the same readings
    let fleet = load_fleet(path)?;
    writeln!(out, "--- Multi-threaded Execution ---")?;
    let start = Instant::now();
    let applied = fleet.simulate_drift(settings.drift.updates, delay);
    let reports = fleet.report_with(&settings.thresholds);
    report::write_report(&mut out, &reports)?;
    writeln!(
        out,
        "Multi-threaded execution time: {}\n",
        format_elapsed(start.elapsed())
    )?;
    info!("Applied {} drift updates across {} cars", applied, fleet.len());

    writeln!(out, "{}", FleetSummary::from_reports(&reports).render())?;

    if let Some(export_path) = export {
        report::export_to_file(export_path, &reports)
            .with_context(|| format!("Failed to export report to {}", export_path.display()))?;
        info!("Exported report to {}", export_path.display());
    }
    Ok(())
}
