use std::path::Path;

use crate::config::schema::{Config, GeneratorBackend};
use crate::error::ConfigError;
use crate::secrets::has_secret_source;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let generator = &config.generator;
    if generator.backend == GeneratorBackend::Chat
        && !(generator.endpoint.starts_with("http://") || generator.endpoint.starts_with("https://"))
    {
        return Err(ConfigError::Validation {
            message: format!(
                "Generator endpoint must be an http(s) URL, got '{}'",
                generator.endpoint
            ),
        });
    }

    if generator.backend == GeneratorBackend::Chat
        && !has_secret_source(
            generator.api_key.as_deref(),
            generator.api_key_file.as_deref(),
            generator.api_key_env_var.as_deref(),
        )
    {
        return Err(ConfigError::Validation {
            message: "Chat backend needs one of api_key, api_key_file or api_key_env_var".to_string(),
        });
    }

    if generator.context_window == 0 {
        return Err(ConfigError::Validation {
            message: "Generator context_window must be greater than zero".to_string(),
        });
    }

    Ok(())
}
