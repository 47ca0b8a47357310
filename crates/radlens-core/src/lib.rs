//! radlens core - AI-assisted medical imaging analysis.
//!
//! Takes a medical image (JPG, PNG, or DICOM), prepares it for upload, sends
//! it to a multimodal vision model with a structured radiological-review
//! prompt, optionally looks up literature references, and returns a report.
//!
//! # Flow
//!
//! ```text
//! Image → Validate → Decode → Quality check → Prepare → Model call →
//! Reference lookup → AnalysisReport
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use radlens_core::{Analyzer, AnalyzeOptions, Config, ProviderFactory};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let provider = ProviderFactory::create("gemini", &config.llm, None, None)?;
//!     let analyzer = Analyzer::new(config, provider);
//!
//!     let report = analyzer
//!         .analyze("./scan.dcm".as_ref(), &AnalyzeOptions::default())
//!         .await?;
//!     println!("{}", report.findings);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analyzer;
pub mod config;
pub mod error;
pub mod imaging;
pub mod llm;
pub mod output;
pub mod search;
pub mod types;

// Re-exports for convenient access
pub use analyzer::{AnalyzeOptions, Analyzer};
pub use config::Config;
pub use error::{AnalysisError, AnalysisResult, ConfigError, RadlensError, Result};
pub use llm::{AnalysisRequest, AnalysisResponse, ImageInput, ProviderFactory, VisionProvider};
pub use output::{render_markdown, OutputFormat, OutputWriter, DISCLAIMER};
pub use types::{AnalysisReport, ImageSummary, QualityCheck, Reference};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
