//! Single-shot analysis orchestration.
//!
//! One analysis is in flight at a time: validate → decode → quality check →
//! prepare → model call (under timeout) → optional reference lookup.

use std::path::Path;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::imaging::{check_sharpness, ImageDecoder, ImagePreparer, Validator};
use crate::llm::{AnalysisRequest, ImageInput, VisionProvider};
use crate::search::{derive_search_query, ReferenceSearch};
use crate::types::{AnalysisReport, ImageSummary};

/// Per-run switches for the analysis flow.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Run the sharpness check before upload
    pub quality_check: bool,
    /// Look up literature references after the model call
    pub search: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            quality_check: true,
            search: true,
        }
    }
}

/// Runs one image through the full analysis flow.
pub struct Analyzer {
    config: Config,
    provider: Box<dyn VisionProvider>,
}

impl Analyzer {
    /// Create an analyzer for the given provider.
    pub fn new(config: Config, provider: Box<dyn VisionProvider>) -> Self {
        Self { config, provider }
    }

    /// Name of the provider backing this analyzer.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Analyze a single medical image file.
    pub async fn analyze(
        &self,
        path: &Path,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisReport, AnalysisError> {
        Validator::new(self.config.limits.clone()).validate(path)?;

        let loaded = ImageDecoder::new(self.config.limits.clone())
            .decode(path)
            .await?;
        tracing::debug!(
            "Decoded {} ({}x{}, {})",
            path.display(),
            loaded.width,
            loaded.height,
            loaded.format
        );

        let quality = options
            .quality_check
            .then(|| check_sharpness(&loaded.image, self.config.imaging.blur_threshold));
        if quality.is_some_and(|q| q.blurry) {
            tracing::warn!(
                "Image appears blurry (Laplacian variance below {}), confidence may be reduced",
                self.config.imaging.blur_threshold
            );
        }

        let prepared = ImagePreparer::new(self.config.imaging.clone()).prepare(&loaded.image)?;
        let request = AnalysisRequest::radiology_review(
            ImageInput::from_bytes(&prepared.png_bytes, "png"),
            self.config.analysis.max_tokens,
            self.config.analysis.temperature,
        );

        tracing::info!("Requesting analysis from {}", self.provider.name());
        let timeout_ms = self.config.limits.llm_timeout_ms;
        let response = tokio::time::timeout(
            std::time::Duration::from_millis(timeout_ms),
            self.provider.generate(&request),
        )
        .await
        .map_err(|_| AnalysisError::Timeout {
            stage: "analysis".to_string(),
            timeout_ms,
        })??;
        tracing::info!(
            "Analysis complete ({} ms, model {})",
            response.latency_ms,
            response.model
        );

        let references = if options.search && self.config.search.enabled {
            self.lookup_references(&response.text).await
        } else {
            Vec::new()
        };

        Ok(AnalysisReport {
            image: ImageSummary {
                file_path: path.to_path_buf(),
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                width: loaded.width,
                height: loaded.height,
                format: loaded.format,
                file_size: loaded.file_size,
            },
            quality,
            findings: response.text,
            model: response.model,
            latency_ms: response.latency_ms,
            tokens_used: response.tokens_used,
            references,
        })
    }

    /// Best-effort reference lookup. A failed lookup degrades to an empty
    /// list rather than failing the whole analysis.
    async fn lookup_references(&self, findings: &str) -> Vec<crate::types::Reference> {
        let Some(query) = derive_search_query(findings) else {
            tracing::debug!("No usable search query in findings, skipping reference lookup");
            return Vec::new();
        };

        let search = match ReferenceSearch::new(
            &self.config.search,
            self.config.limits.search_timeout_ms,
        ) {
            Ok(search) => search,
            Err(e) => {
                tracing::warn!("Reference lookup unavailable: {e}");
                return Vec::new();
            }
        };

        match search.lookup(&query).await {
            Ok(references) => {
                tracing::debug!("Found {} reference(s)", references.len());
                references
            }
            Err(e) => {
                tracing::warn!("Reference lookup failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::AnalysisResponse;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// A configurable mock vision provider.
    struct MockProvider {
        text: String,
        delay: Option<Duration>,
        call_count: Arc<AtomicU32>,
    }

    impl MockProvider {
        fn with_findings(text: &str) -> Self {
            Self {
                text: text.to_string(),
                delay: None,
                call_count: Arc::new(AtomicU32::new(0)),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn call_count_handle(&self) -> Arc<AtomicU32> {
            self.call_count.clone()
        }
    }

    #[async_trait]
    impl VisionProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn generate(
            &self,
            _request: &AnalysisRequest,
        ) -> Result<AnalysisResponse, AnalysisError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(AnalysisResponse {
                text: self.text.clone(),
                model: "mock-v1".to_string(),
                tokens_used: Some(42),
                latency_ms: 10,
            })
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(60)
        }
    }

    fn write_png(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let img = DynamicImage::new_rgb8(64, 48);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        std::fs::write(&path, buffer.into_inner()).unwrap();
        path
    }

    fn no_search_options() -> AnalyzeOptions {
        AnalyzeOptions {
            quality_check: true,
            search: false,
        }
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "chest.png");

        let provider = MockProvider::with_findings("### 1. Image Type & Region\n- Chest X-ray");
        let analyzer = Analyzer::new(Config::default(), Box::new(provider));
        let report = analyzer.analyze(&path, &no_search_options()).await.unwrap();

        assert_eq!(report.image.file_name, "chest.png");
        assert_eq!(report.image.format, "png");
        assert_eq!(report.model, "mock-v1");
        assert_eq!(report.tokens_used, Some(42));
        assert!(report.findings.contains("Chest X-ray"));
        assert!(report.references.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_flags_flat_image_as_blurry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "flat.png");

        let provider = MockProvider::with_findings("findings");
        let analyzer = Analyzer::new(Config::default(), Box::new(provider));
        let report = analyzer.analyze(&path, &no_search_options()).await.unwrap();

        // A uniform image has zero Laplacian variance
        let quality = report.quality.unwrap();
        assert!(quality.blurry);
        assert_eq!(quality.laplacian_variance, 0.0);
    }

    #[tokio::test]
    async fn test_analyze_quality_check_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "scan.png");

        let provider = MockProvider::with_findings("findings");
        let analyzer = Analyzer::new(Config::default(), Box::new(provider));
        let options = AnalyzeOptions {
            quality_check: false,
            search: false,
        };
        let report = analyzer.analyze(&path, &options).await.unwrap();
        assert!(report.quality.is_none());
    }

    #[tokio::test]
    async fn test_analyze_missing_file() {
        let provider = MockProvider::with_findings("unreachable");
        let call_count = provider.call_count_handle();
        let analyzer = Analyzer::new(Config::default(), Box::new(provider));

        let err = analyzer
            .analyze(Path::new("/nonexistent/scan.png"), &no_search_options())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::FileNotFound(_)));
        // The provider is never called when validation fails
        assert_eq!(call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_model_call_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "slow.png");

        let provider =
            MockProvider::with_findings("too slow").with_delay(Duration::from_secs(5));
        let mut config = Config::default();
        config.limits.llm_timeout_ms = 50;

        let analyzer = Analyzer::new(config, Box::new(provider));
        let err = analyzer
            .analyze(&path, &no_search_options())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Timeout { ref stage, .. } if stage == "analysis"
        ));
    }
}
