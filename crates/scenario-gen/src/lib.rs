pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod logging;
pub mod processor;
pub mod sanitize;
pub mod scenario;
pub mod secrets;
pub mod storage;

pub use config::{load_config, load_config_from_str, Config, DocumentFormat};
pub use db::{DatabaseError, ScenarioStore, SqliteScenarioStore};
pub use error::{ConfigError, ExportError, ProcessError, Result, ScenarioError, ValidationError};
pub use generator::{build_generator, Generator, GeneratorError};
pub use logging::init_logging;
pub use processor::{FileExtractor, RegistryExtractor};
pub use scenario::{
    ClearOutcome, DefaultController, HistoryItem, HistoryLookup, Phase, ProcessedFile,
    ScenarioController, UploadReport,
};
pub use secrets::{resolve_secret, SecretError};
