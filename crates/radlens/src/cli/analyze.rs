//! The `radlens analyze` command.

use clap::{Args, ValueEnum};
use indicatif::ProgressBar;
use radlens_core::{
    render_markdown, AnalyzeOptions, Analyzer, Config, OutputFormat as CoreOutputFormat,
    OutputWriter, ProviderFactory,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

/// Supported output formats for `--output` files.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Supported vision model providers.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum Provider {
    /// Google Gemini (hosted, default)
    #[default]
    Gemini,
    /// Local Ollama instance
    Ollama,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::Ollama => write!(f, "ollama"),
        }
    }
}

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Medical image to analyze (JPG, PNG, or DICOM)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Write a structured report to this file (terminal rendering otherwise)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format for --output
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Vision model provider
    #[arg(long, value_enum, default_value = "gemini")]
    pub provider: Provider,

    /// Model name (provider-specific)
    #[arg(long)]
    pub model: Option<String>,

    /// Skip the literature reference lookup
    #[arg(long)]
    pub no_search: bool,

    /// Skip the sharpness check
    #[arg(long)]
    pub no_quality_check: bool,

    /// API key for the selected provider (session-only, set by interactive mode).
    #[arg(skip)]
    pub api_key: Option<String>,
}

/// Manual Default impl for constructing AnalyzeArgs outside of clap.
///
/// Values match the clap `#[arg(default_value = ...)]` annotations above.
/// Used by the interactive module to build AnalyzeArgs field-by-field.
impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            format: OutputFormat::Json,
            provider: Provider::Gemini,
            model: None,
            no_search: false,
            no_quality_check: false,
            api_key: None,
        }
    }
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    let provider = ProviderFactory::create(
        &args.provider.to_string(),
        &config.llm,
        args.model.as_deref(),
        args.api_key.as_deref(),
    )?;

    let options = AnalyzeOptions {
        quality_check: !args.no_quality_check,
        search: !args.no_search,
    };

    let pretty = config.output.pretty;
    let analyzer = Analyzer::new(config, provider);

    let spinner = analysis_spinner();
    let result = analyzer.analyze(&args.input, &options).await;
    spinner.finish_and_clear();
    let report = result?;

    if let Some(ref output_path) = args.output {
        let format = match args.format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        };
        let file = File::create(output_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), format, pretty);
        writer.write(&report)?;
        writer.flush()?;
        tracing::info!("Report written to {:?}", output_path);
    } else {
        println!("{}", render_markdown(&report));
    }

    Ok(())
}

/// Spinner shown on stderr while the model call is in flight.
fn analysis_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Analyzing image...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
