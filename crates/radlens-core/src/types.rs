//! Core data types for radlens analysis results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic facts about the analyzed source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Absolute path to the source file
    pub file_path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// Image width in pixels (after decode, before downscale)
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Detected format ("jpeg", "png", "dicom")
    pub format: String,

    /// File size in bytes
    pub file_size: u64,
}

/// Sharpness measurement for the uploaded image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityCheck {
    /// Variance of the Laplacian response over the grayscale image
    pub laplacian_variance: f64,

    /// True when the variance falls below the configured threshold
    pub blurry: bool,
}

/// A literature reference found during the research lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Page or article title
    pub title: String,

    /// Link to the source
    pub url: String,

    /// Short extract describing the result
    pub snippet: String,

    /// Publishing source, when the search API reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The complete output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Source image facts
    pub image: ImageSummary,

    /// Sharpness check result (absent when the check was disabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityCheck>,

    /// The model's markdown findings
    pub findings: String,

    /// Model identifier that produced the findings
    pub model: String,

    /// Round-trip latency of the model call in milliseconds
    pub latency_ms: u64,

    /// Token usage reported by the provider, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,

    /// Literature references (empty when the lookup was disabled or dry)
    pub references: Vec<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            image: ImageSummary {
                file_path: PathBuf::from("/scans/chest.png"),
                file_name: "chest.png".to_string(),
                width: 1024,
                height: 768,
                format: "png".to_string(),
                file_size: 84_210,
            },
            quality: Some(QualityCheck {
                laplacian_variance: 312.5,
                blurry: false,
            }),
            findings: "### 1. Image Type & Region\n- Chest X-ray".to_string(),
            model: "gemini-2.5-pro".to_string(),
            latency_ms: 2400,
            tokens_used: Some(1850),
            references: vec![],
        }
    }

    #[test]
    fn report_serializes_quality_when_present() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        assert!(json.contains("\"laplacian_variance\":312.5"));
        assert!(json.contains("\"tokens_used\":1850"));
    }

    #[test]
    fn report_skips_absent_optionals() {
        let mut report = sample_report();
        report.quality = None;
        report.tokens_used = None;
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("quality"));
        assert!(!json.contains("tokens_used"));
    }

    #[test]
    fn reference_skips_absent_source() {
        let reference = Reference {
            title: "Pneumothorax overview".to_string(),
            url: "https://example.org/ptx".to_string(),
            snippet: "A collapsed lung occurs when...".to_string(),
            source: None,
        };
        let json = serde_json::to_string(&reference).unwrap();
        assert!(!json.contains("source"));
    }

    #[test]
    fn report_roundtrip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.image.file_name, "chest.png");
        assert_eq!(parsed.model, "gemini-2.5-pro");
        assert!(parsed.quality.is_some());
    }
}
