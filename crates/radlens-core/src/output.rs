//! Output formatting: structured JSON/JSONL records and terminal markdown.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::AnalysisReport;

/// Disclaimer appended to every rendered report.
pub const DISCLAIMER: &str =
    "AI-generated output. Review by a certified medical professional is required.";

/// Output format options for file output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// A writer that serializes items to JSON or JSONL format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format; JSONL is always one compact
    /// object per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single item.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json if self.pretty => {
                serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
            }
            OutputFormat::Json | OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Render a report as terminal-ready markdown.
///
/// The model's findings come through verbatim; the research context and
/// the disclaimer are appended here.
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str("## Analysis Results\n\n");

    if report.quality.is_some_and(|q| q.blurry) {
        out.push_str("> Note: the image appears blurry. This may reduce analysis confidence.\n\n");
    }

    out.push_str(report.findings.trim_end());
    out.push('\n');

    if !report.references.is_empty() {
        out.push_str("\n## Research Context\n\n");
        for reference in &report.references {
            out.push_str(&format!("- {}\n  {}\n", reference.title, reference.url));
            if !reference.snippet.is_empty() && reference.snippet != reference.title {
                out.push_str(&format!("  {}\n", reference.snippet));
            }
            if let Some(source) = &reference.source {
                out.push_str(&format!("  ({source})\n"));
            }
        }
    }

    out.push_str(&format!("\n---\n{DISCLAIMER}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageSummary, QualityCheck, Reference};
    use std::path::PathBuf;

    fn report(references: Vec<Reference>, blurry: bool) -> AnalysisReport {
        AnalysisReport {
            image: ImageSummary {
                file_path: PathBuf::from("/scans/chest.png"),
                file_name: "chest.png".to_string(),
                width: 512,
                height: 512,
                format: "png".to_string(),
                file_size: 10_000,
            },
            quality: Some(QualityCheck {
                laplacian_variance: if blurry { 12.0 } else { 450.0 },
                blurry,
            }),
            findings: "### 1. Image Type & Region\n- Chest X-ray".to_string(),
            model: "gemini-2.5-pro".to_string(),
            latency_ms: 1800,
            tokens_used: None,
            references,
        }
    }

    #[test]
    fn test_render_includes_disclaimer() {
        let rendered = render_markdown(&report(vec![], false));
        assert!(rendered.contains(DISCLAIMER));
        assert!(rendered.contains("Chest X-ray"));
        assert!(!rendered.contains("Research Context"));
    }

    #[test]
    fn test_render_blur_note() {
        let rendered = render_markdown(&report(vec![], true));
        assert!(rendered.contains("appears blurry"));
    }

    #[test]
    fn test_render_references() {
        let references = vec![Reference {
            title: "Pneumothorax".to_string(),
            url: "https://en.wikipedia.org/wiki/Pneumothorax".to_string(),
            snippet: "An abnormal collection of air.".to_string(),
            source: Some("Wikipedia".to_string()),
        }];
        let rendered = render_markdown(&report(references, false));
        assert!(rendered.contains("## Research Context"));
        assert!(rendered.contains("- Pneumothorax"));
        assert!(rendered.contains("(Wikipedia)"));
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write(&report(vec![], false)).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"file_name\":\"chest.png\""));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_write_jsonl_is_single_line_per_item() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write(&report(vec![], false)).unwrap();
        writer.write(&report(vec![], true)).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.trim_end().split('\n').count(), 2);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("ndjson"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
