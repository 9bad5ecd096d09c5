//! File extraction capability used by the scenario controller.

use std::error::Error as _;
use std::path::Path;

use crate::config::schema::ExtractionConfig;
use crate::error::ProcessError;
use crate::processor::ProcessorRegistry;
use crate::sanitize::redact_path;
use crate::scenario::model::ProcessedFile;

/// Turns one uploaded file into a [`ProcessedFile`]. Never fails: every
/// problem is encoded as a failure record.
pub trait FileExtractor {
    fn extract(&self, path: &Path) -> ProcessedFile;
}

impl<E: FileExtractor + ?Sized> FileExtractor for &E {
    fn extract(&self, path: &Path) -> ProcessedFile {
        (**self).extract(path)
    }
}

/// Extractor backed by the format-specific document processors.
pub struct RegistryExtractor {
    registry: ProcessorRegistry,
    max_file_bytes: u64,
}

impl RegistryExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            registry: ProcessorRegistry::new(config),
            max_file_bytes: config.max_file_bytes,
        }
    }

    fn try_extract(&self, path: &Path) -> Result<String, ProcessError> {
        let size = std::fs::metadata(path)
            .map_err(|e| ProcessError::ReadDocument {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();
        if size > self.max_file_bytes {
            return Err(ProcessError::TooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }

        let content = self.registry.process(path)?;
        Ok(content.text)
    }
}

impl Default for RegistryExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl FileExtractor for RegistryExtractor {
    fn extract(&self, path: &Path) -> ProcessedFile {
        let _span = tracing::info_span!("extractor.extract", file = %redact_path(path)).entered();
        let source_path = path.to_string_lossy().to_string();

        match self.try_extract(path) {
            Ok(text) => {
                tracing::debug!(chars = text.chars().count(), "Extraction succeeded");
                ProcessedFile::extracted(source_path, text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Extraction failed");
                ProcessedFile::failed(source_path, e.to_string(), Some(debug_info(path, &e)))
            }
        }
    }
}

/// Diagnostic detail for a failed extraction: detected MIME type, size on
/// disk and the underlying cause, if any.
fn debug_info(path: &Path, error: &ProcessError) -> String {
    let mime = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let size = std::fs::metadata(path)
        .map(|m| format!("{} bytes", m.len()))
        .unwrap_or_else(|_| "unavailable".to_string());

    let mut info = format!(
        "path: {}; mime type: {}; size: {}",
        path.display(),
        mime,
        size
    );
    if let Some(cause) = error.source() {
        info.push_str(&format!("; cause: {}", cause));
    }
    info
}
