//! Error types for radlens.
//!
//! Errors are organized by stage so messages carry the context a user needs
//! to act on them (file paths, stage names, HTTP status codes).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for radlens operations.
#[derive(Error, Debug)]
pub enum RadlensError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Analysis errors (decode, model call, search)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Analysis errors, organized by stage.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Not a supported medical image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Raster image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// DICOM parsing or pixel-data conversion failed
    #[error("DICOM error for {path}: {message}")]
    Dicom { path: PathBuf, message: String },

    /// Re-encoding the prepared image failed
    #[error("Encode error: {message}")]
    Encode { message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// No API credential available for the selected provider
    #[error("{provider} API key not set. {hint}")]
    MissingCredential { provider: String, hint: String },

    /// Model call failed
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Reference lookup failed
    #[error("Search error: {message}")]
    Search { message: String },
}

/// Convenience type alias for radlens results.
pub type Result<T> = std::result::Result<T, RadlensError>;

/// Convenience type alias for analysis-stage results.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
