//! Error types shared across the crate.
//!
//! Each layer has its own enum; [`ScenarioError`] is what the controller
//! hands back to callers.

use std::path::PathBuf;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::generator::GeneratorError;
use crate::secrets::SecretError;

pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Any failure of a controller operation.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Shown to the user verbatim.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// A precondition of a controller operation was not met. The editing
/// state is left as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("You must enter a scenario name to continue.")]
    EmptyName,
    #[error("Please create a new scenario first.")]
    NoScenario,
    #[error("Please create a new scenario and give it a name first.")]
    NameRequired,
    #[error("Please upload files (images or documents) first.")]
    FilesRequired,
    #[error("There is no generated scenario to export.")]
    NothingToExport,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The document matched the schema but its values do not fit together.
    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Failed to resolve API key: {0}")]
    Secret(#[from] SecretError),
}

/// Why a single uploaded file produced no text. The message ends up in the
/// file's failure record.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Cannot read '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Failed to process DOCX: {0}")]
    DocxProcessing(String),

    #[error("Failed to process image: {0}")]
    ImageProcessing(String),

    #[error("Text recognition failed: {0}")]
    OcrFailed(String),

    #[error("The document contains no readable text")]
    EmptyDocument,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot create export directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The finished temp file could not replace the destination.
    #[error("Cannot move '{from}' into place at '{to}': {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
