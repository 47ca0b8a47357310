//! Vision model integration: provider trait, prompt, and implementations.

pub mod gemini;
pub mod ollama;
pub mod prompt;
pub mod provider;

pub use provider::{
    AnalysisRequest, AnalysisResponse, ImageInput, ProviderFactory, VisionProvider,
};
