//! Command-line interface for the measurement evaluation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::processors::pipeline::{self, DirectoryEvaluation};
use crate::report::render_report;
use crate::visualization;
use crate::EvalConfig;

#[derive(Parser, Debug)]
#[command(name = "uwb-eval")]
#[command(
    about = "Evaluate accuracy, precision and jitter of raw/filtered position logs",
    version
)]
pub struct Cli {
    /// Directory containing the measurement log files
    directory: PathBuf,

    /// Path to YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render reference positions and centroids to this PNG file
    #[arg(short, long)]
    plot: Option<PathBuf>,

    /// Evaluate files one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<60} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 37 {
            let head: String = value.chars().take(34).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<37} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

fn load_config(path: Option<&Path>) -> EvalConfig {
    match path {
        Some(path) => match EvalConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                EvalConfig::default()
            }
        },
        None => EvalConfig::default(),
    }
}

/// Parse arguments, run the evaluation and exit with status 1 on failure.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            eprintln!("Pass the directory holding the measurement .txt files as the first argument.");
            std::process::exit(1);
        }
    };

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    let mut config = load_config(cli.config.as_deref());
    if cli.sequential {
        config.processing.parallel = false;
    }

    if let Err(e) = cmd_evaluate(&cli.directory, cli.plot.as_deref(), &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn cmd_evaluate(directory: &Path, plot: Option<&Path>, config: &EvalConfig) -> Result<()> {
    let start = Instant::now();

    let spinner = create_spinner("Evaluating measurement files...");
    let result = pipeline::evaluate_directory(directory, config);
    spinner.finish_and_clear();

    let evaluation: DirectoryEvaluation =
        result.with_context(|| format!("Evaluation of {} failed", directory.display()))?;

    println!();
    print!("{}", render_report(&evaluation.summary, &config.report));

    if let Some(plot_path) = plot {
        visualization::plot_summary(
            plot_path,
            &evaluation.summary,
            "Positions accuracy visualization",
            &config.plot,
        )
        .with_context(|| format!("Failed to render plot {}", plot_path.display()))?;
    }

    let mut items = vec![
        ("Directory", directory.display().to_string()),
        ("Files evaluated", evaluation.summary.file_count.to_string()),
        ("Samples", evaluation.summary.sample_count.to_string()),
        ("Reference points", evaluation.summary.groups.len().to_string()),
        ("Parallel", config.processing.parallel.to_string()),
    ];
    if let Some(plot_path) = plot {
        items.push(("Plot", plot_path.display().to_string()));
    }
    items.push(("Duration", format!("{:.2?}", start.elapsed())));

    print_summary("Evaluation Complete", &items);
    Ok(())
}
