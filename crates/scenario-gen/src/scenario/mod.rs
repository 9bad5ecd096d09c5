pub mod controller;
pub mod history;
pub mod merge;
pub mod model;

pub use controller::{
    ClearOutcome, DefaultController, HistoryLookup, ScenarioController, CLEAR_HISTORY_PROMPT,
};
pub use history::HistoryItem;
pub use merge::{merge_extractions, FileFailure, UploadReport};
pub use model::{HistoryEntry, NewScenario, Phase, ProcessedFile, ScenarioRecord};
