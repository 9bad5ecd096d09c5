//! Scenario text generation.
//!
//! Two backends are available: an offline [`TemplateGenerator`] and a
//! [`ChatGenerator`] that talks to an OpenAI-compatible chat-completions
//! endpoint. [`build_generator`] picks one from configuration.

pub mod chat;
pub mod template;

use thiserror::Error;

use crate::config::schema::{GeneratorBackend, GeneratorConfig};
use crate::error::ConfigError;
use crate::scenario::model::ProcessedFile;

pub use chat::ChatGenerator;
pub use template::TemplateGenerator;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Nothing to generate from: criteria and extracted files are empty")]
    NoInput,

    #[error("Request to generator endpoint failed: {0}")]
    Http(String),

    #[error("Generator endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse generator response: {0}")]
    ResponseParse(String),

    #[error("Generator returned an empty scenario")]
    EmptyResponse,
}

/// Produces scenario text from criteria and the processed files of the
/// current scenario.
pub trait Generator {
    fn generate(&self, criteria: &str, files: &[ProcessedFile]) -> Result<String, GeneratorError>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, criteria: &str, files: &[ProcessedFile]) -> Result<String, GeneratorError> {
        (**self).generate(criteria, files)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, criteria: &str, files: &[ProcessedFile]) -> Result<String, GeneratorError> {
        (**self).generate(criteria, files)
    }
}

/// Builds the configured backend. The chat backend resolves its API key here,
/// so a missing key is reported at startup rather than on first use.
pub fn build_generator(config: &GeneratorConfig) -> Result<Box<dyn Generator>, ConfigError> {
    match config.backend {
        GeneratorBackend::Template => {
            tracing::info!("Using offline template generator");
            Ok(Box::new(TemplateGenerator::new()))
        }
        GeneratorBackend::Chat => {
            let generator = ChatGenerator::from_config(config)?;
            tracing::info!(model = %config.model, "Using chat-completions generator");
            Ok(Box::new(generator))
        }
    }
}
