//! Data units shared by the controller, the collaborators and the store.

use serde::{Deserialize, Serialize};

/// Result of running the file extractor over one uploaded file.
///
/// Serialized as a flat object: `source_path` plus either `extracted_info`
/// or `error`/`debug_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFile {
    pub source_path: String,
    #[serde(flatten)]
    pub outcome: Extraction,
}

/// Success or failure of a single extraction. A file is never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extraction {
    Failed {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        debug_info: Option<String>,
    },
    Extracted {
        extracted_info: String,
    },
}

impl ProcessedFile {
    pub fn extracted(source_path: impl Into<String>, extracted_info: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            outcome: Extraction::Extracted {
                extracted_info: extracted_info.into(),
            },
        }
    }

    pub fn failed(
        source_path: impl Into<String>,
        error: impl Into<String>,
        debug_info: Option<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            outcome: Extraction::Failed {
                error: error.into(),
                debug_info,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Extraction::Extracted { .. })
    }

    pub fn extracted_info(&self) -> Option<&str> {
        match &self.outcome {
            Extraction::Extracted { extracted_info } => Some(extracted_info),
            Extraction::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Extraction::Failed { error, .. } => Some(error),
            Extraction::Extracted { .. } => None,
        }
    }

    pub fn debug_info(&self) -> Option<&str> {
        match &self.outcome {
            Extraction::Failed { debug_info, .. } => debug_info.as_deref(),
            Extraction::Extracted { .. } => None,
        }
    }
}

/// A scenario built by a successful generate, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewScenario {
    pub name: String,
    pub criteria: String,
    pub generated_text: String,
    pub processed_files: Vec<ProcessedFile>,
}

/// A persisted scenario. `created_at` is assigned by the store (UTC,
/// `YYYY-MM-DD HH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioRecord {
    pub name: String,
    pub criteria: String,
    pub generated_text: String,
    pub processed_files: Vec<ProcessedFile>,
    pub created_at: String,
}

/// One raw row of the store's history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub name: String,
    pub created_at: String,
}

/// Lifecycle phase of the in-progress scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No scenario started; editing is disabled.
    #[default]
    Empty,
    /// A name exists; criteria and uploads may be edited.
    Named,
    /// Output is displayed, either freshly generated or reloaded from history.
    Generated,
}

impl Phase {
    pub fn is_editable(self) -> bool {
        self != Phase::Empty
    }
}
