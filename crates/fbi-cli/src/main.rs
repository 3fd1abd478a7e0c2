//! fbi - Command Line Interface
//!
//! Decodes a blueprint string from a file, analyzes every blueprint it
//! contains, and prints one report per blueprint. Run with `--help` to see
//! all available options.

mod display;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use fbi_codec::LabeledBlueprint;
use fbi_core::{AnalysisConfig, Analyzer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for fbi.
#[derive(Parser, Debug)]
#[command(name = "fbi")]
#[command(version, about = "Steady-state throughput analysis for factory blueprints", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a blueprint or blueprint book
    Run {
        /// File holding an exported blueprint string
        file: PathBuf,

        /// Game data directory to use instead of the built-in catalog
        #[arg(long, value_name = "DIR")]
        data: Option<PathBuf>,

        /// Analysis tuning file (RON, JSON, or TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print results as JSON instead of text reports
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and succeed; usage errors fail.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    let Command::Run {
        file,
        data,
        config,
        json,
    } = command;

    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let root = fbi_codec::decode(&text).context("failed to decode blueprint")?;
    let blueprints = fbi_codec::flatten(&root);
    if blueprints.is_empty() {
        bail!("no blueprints found in {}", file.display());
    }

    let catalog = match &data {
        Some(dir) => fbi_data::load_catalog_dir(dir)
            .with_context(|| format!("failed to load game data from {}", dir.display()))?,
        None => fbi_data::builtin().context("failed to load built-in game data")?,
    };
    info!(
        machines = catalog.machine_count(),
        recipes = catalog.recipe_count(),
        "catalog loaded"
    );

    let config = match &config {
        Some(path) => fbi_data::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    debug!(?config, "analysis config");

    let analyzer = Analyzer::with_config(&catalog, config);
    let labels = report_labels(&blueprints, &file);

    if json {
        let results: Vec<_> = blueprints
            .iter()
            .zip(labels)
            .map(|(entry, label)| analyzer.analyze(&entry.blueprint, label))
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("\nProcessing {} blueprint(s)...\n", blueprints.len());
    let many = blueprints.len() > 1;
    for (entry, label) in blueprints.iter().zip(labels) {
        if many {
            println!("Processing: {label}");
        }
        let result = analyzer.analyze(&entry.blueprint, label);
        println!("{}", display::format_report(&result));
    }
    Ok(())
}

/// Report label for each blueprint. A lone blueprint falls back to the
/// file name; book entries fall back to their slot path.
fn report_labels(blueprints: &[LabeledBlueprint], file: &Path) -> Vec<String> {
    match blueprints {
        [single] if single.path.is_empty() => vec![single.label.clone().unwrap_or_else(|| {
            file.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string())
        })],
        _ => blueprints.iter().map(LabeledBlueprint::display_label).collect(),
    }
}
