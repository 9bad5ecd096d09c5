//! Format-specific text extraction for uploaded documents.

pub mod docx;
pub mod extractor;
pub mod image;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod pdf;
pub mod text;

use std::path::Path;

use crate::config::schema::{DocumentFormat, ExtractionConfig};
use crate::error::ProcessError;

pub use extractor::{FileExtractor, RegistryExtractor};

/// Text pulled out of a single document.
pub struct ProcessedContent {
    pub text: String,
    pub format: DocumentFormat,
}

/// One document format's extraction routine.
pub trait DocumentProcessor: Send + Sync {
    fn process(&self, path: &Path) -> Result<ProcessedContent, ProcessError>;
    fn supports(&self, format: DocumentFormat) -> bool;
}

/// Routes a file to the processor for its extension.
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            processors: vec![
                Box::new(text::TextProcessor::new()),
                Box::new(docx::DocxProcessor::new()),
                Box::new(pdf::PdfProcessor::new()),
                Box::new(image_processor(config)),
            ],
        }
    }

    /// The processor responsible for `format`, if any.
    pub fn processor_for(&self, format: DocumentFormat) -> Option<&dyn DocumentProcessor> {
        self.processors
            .iter()
            .find(|p| p.supports(format))
            .map(|p| p.as_ref())
    }

    pub fn process(&self, path: &Path) -> Result<ProcessedContent, ProcessError> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let unsupported = || ProcessError::UnsupportedFormat(extension.to_string());

        let format = DocumentFormat::from_extension(extension).ok_or_else(unsupported)?;
        let processor = self.processor_for(format).ok_or_else(unsupported)?;
        processor.process(path)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

#[cfg(feature = "ocr")]
fn image_processor(config: &ExtractionConfig) -> image::ImageProcessor {
    if config.ocr.enabled {
        image::ImageProcessor::with_ocr(ocr::TextRecognizer::from_config(&config.ocr))
    } else {
        image::ImageProcessor::new_without_ocr()
    }
}

#[cfg(not(feature = "ocr"))]
fn image_processor(config: &ExtractionConfig) -> image::ImageProcessor {
    if config.ocr.enabled {
        tracing::debug!("OCR enabled in config but not compiled in; images will be described");
    }
    image::ImageProcessor::new_without_ocr()
}
