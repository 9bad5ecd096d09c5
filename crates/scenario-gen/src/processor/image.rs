use std::path::Path;

use image::GenericImageView;

use crate::config::schema::DocumentFormat;
use crate::error::ProcessError;
#[cfg(feature = "ocr")]
use crate::processor::ocr::TextRecognizer;
use crate::processor::{DocumentProcessor, ProcessedContent};

/// Extracts text from images with OCR when available. Without OCR, or when
/// OCR finds no text, the image is described by its name, size and pixel layout.
pub struct ImageProcessor {
    #[cfg(feature = "ocr")]
    ocr: Option<TextRecognizer>,
}

impl ImageProcessor {
    #[cfg(feature = "ocr")]
    pub fn with_ocr(ocr: TextRecognizer) -> Self {
        Self { ocr: Some(ocr) }
    }

    pub fn new_without_ocr() -> Self {
        Self {
            #[cfg(feature = "ocr")]
            ocr: None,
        }
    }

    #[cfg(feature = "ocr")]
    fn recognize(&self, img: &image::DynamicImage) -> Result<Option<String>, ProcessError> {
        match &self.ocr {
            Some(ocr) => ocr.recognize(img),
            None => Ok(None),
        }
    }

    #[cfg(not(feature = "ocr"))]
    fn recognize(&self, _img: &image::DynamicImage) -> Result<Option<String>, ProcessError> {
        Ok(None)
    }
}

impl DocumentProcessor for ImageProcessor {
    fn process(&self, path: &Path) -> Result<ProcessedContent, ProcessError> {
        let _span = tracing::info_span!("processor.image").entered();

        let image_data = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let img = image::load_from_memory(&image_data)
            .map_err(|e| ProcessError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        let text = match self.recognize(&img)? {
            Some(text) => text,
            None => describe_image(path, &img),
        };

        Ok(ProcessedContent {
            text,
            format: DocumentFormat::Image,
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Image)
    }
}

fn describe_image(path: &Path, img: &image::DynamicImage) -> String {
    let (width, height) = img.dimensions();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    format!(
        "Image {}: {}x{} pixels, {:?} color. No text was recognized.",
        filename,
        width,
        height,
        img.color()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_image_format() {
        let processor = ImageProcessor::new_without_ocr();
        assert!(processor.supports(DocumentFormat::Image));
        assert!(!processor.supports(DocumentFormat::Pdf));
        assert!(!processor.supports(DocumentFormat::Text));
        assert!(!processor.supports(DocumentFormat::Docx));
    }

    #[test]
    fn test_image_without_ocr_is_described() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        image::RgbImage::new(4, 3).save(&path).unwrap();

        let processed = ImageProcessor::new_without_ocr().process(&path).unwrap();
        assert_eq!(processed.format, DocumentFormat::Image);
        assert!(processed.text.starts_with("Image screen.png: 4x3 pixels"));
    }

    #[test]
    fn test_invalid_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = ImageProcessor::new_without_ocr().process(&path);
        assert!(matches!(result, Err(ProcessError::ImageProcessing(_))));
    }
}
