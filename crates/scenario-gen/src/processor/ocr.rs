//! Tesseract text recognition for uploaded screenshots and scans.

use std::io::Cursor;

use image::DynamicImage;

use crate::config::schema::OcrConfig;
use crate::error::ProcessError;

/// Runs Tesseract over decoded images. A fresh engine is created per call,
/// so the recognizer itself is cheap to share.
#[derive(Debug, Clone)]
pub struct TextRecognizer {
    languages: String,
    dpi: u32,
}

impl TextRecognizer {
    pub fn from_config(config: &OcrConfig) -> Self {
        let languages = match config.languages.as_slice() {
            [] => "eng".to_string(),
            langs => langs.join("+"),
        };
        Self {
            languages,
            dpi: config.dpi,
        }
    }

    /// Tesseract language string, e.g. `eng+deu`.
    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// Returns the recognized text, or `None` when the image holds none.
    pub fn recognize(&self, img: &DynamicImage) -> Result<Option<String>, ProcessError> {
        let _span = tracing::debug_span!("processor.ocr", languages = %self.languages).entered();

        // LepTess only accepts encoded images.
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| ProcessError::OcrFailed(format!("PNG encoding: {}", e)))?;

        let mut engine = leptess::LepTess::new(None, &self.languages)
            .map_err(|e| ProcessError::OcrFailed(format!("Tesseract init ({}): {}", self.languages, e)))?;
        engine
            .set_image_from_mem(png.get_ref())
            .map_err(|e| ProcessError::OcrFailed(e.to_string()))?;
        engine.set_source_resolution(i32::try_from(self.dpi).unwrap_or(i32::MAX));

        let text = engine
            .get_utf8_text()
            .map_err(|e| ProcessError::OcrFailed(e.to_string()))?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("OCR found no text");
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}
