//! radlens CLI - AI-assisted medical imaging analysis from the terminal.
//!
//! radlens forwards a medical image (JPG, PNG, or DICOM) to a multimodal
//! vision model with a structured radiological-review prompt and renders the
//! model's findings, with an optional literature reference lookup.
//!
//! # Usage
//!
//! ```bash
//! # Guided interactive mode
//! radlens
//!
//! # Analyze a single image
//! radlens analyze scan.dcm
//!
//! # Structured output to a file
//! radlens analyze chest.png --output report.json
//!
//! # View configuration
//! radlens config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// radlens - AI-assisted medical imaging analysis.
#[derive(Parser, Debug)]
#[command(name = "radlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a medical image and render the findings
    Analyze(cli::analyze::AnalyzeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match radlens_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `radlens config path`."
            );
            radlens_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("radlens v{}", radlens_core::VERSION);

    // Dispatch to the appropriate command handler; bare invocation starts
    // the guided interactive mode.
    match cli.command {
        Some(Commands::Analyze(args)) => cli::analyze::execute(args).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None => cli::interactive::run(&config).await,
    }
}
