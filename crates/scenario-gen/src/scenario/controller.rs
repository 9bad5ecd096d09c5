//! Lifecycle of the scenario being edited: naming, uploads, generation,
//! export and history.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::{DatabaseError, ScenarioStore, SqliteScenarioStore};
use crate::error::{Result, ValidationError};
use crate::generator::{build_generator, Generator};
use crate::processor::{FileExtractor, RegistryExtractor};
use crate::sanitize::redact_path;
use crate::scenario::history::{self, HistoryItem};
use crate::scenario::merge::{merge_extractions, UploadReport};
use crate::scenario::model::{NewScenario, Phase, ProcessedFile, ScenarioRecord};
use crate::storage::export_text;

/// Question put to the confirmation gate before history is purged.
pub const CLEAR_HISTORY_PROMPT: &str =
    "Are you sure you want to clear the scenario history? This will delete all stored data.";

/// Outcome of [`ScenarioController::select_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLookup {
    Loaded,
    NotFound,
}

impl HistoryLookup {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            HistoryLookup::Loaded => None,
            HistoryLookup::NotFound => Some("Scenario not found."),
        }
    }
}

/// Outcome of [`ScenarioController::clear_history`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
}

#[derive(Debug, Default)]
struct EditingState {
    phase: Phase,
    name: String,
    criteria: String,
    output: String,
    processed_files: Vec<ProcessedFile>,
}

impl EditingState {
    fn clear_fields(&mut self) {
        self.name.clear();
        self.criteria.clear();
        self.output.clear();
        self.processed_files.clear();
    }
}

/// Owns the in-progress scenario and drives the extractor, generator and
/// store on its behalf. Every operation runs to completion before the next.
pub struct ScenarioController<E, G, S> {
    extractor: E,
    generator: G,
    store: S,
    state: EditingState,
    history: Vec<HistoryItem>,
}

impl<E, G, S> ScenarioController<E, G, S>
where
    E: FileExtractor,
    G: Generator,
    S: ScenarioStore,
{
    /// Creates a controller in the `Empty` phase and loads the history.
    pub fn new(extractor: E, generator: G, store: S) -> Result<Self> {
        let mut controller = Self {
            extractor,
            generator,
            store,
            state: EditingState::default(),
            history: Vec::new(),
        };
        controller.refresh_history()?;
        Ok(controller)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn criteria(&self) -> &str {
        &self.state.criteria
    }

    pub fn output(&self) -> &str {
        &self.state.output
    }

    pub fn processed_files(&self) -> &[ProcessedFile] {
        &self.state.processed_files
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a fresh scenario. Surrounding whitespace is dropped from the
    /// name; a blank name is rejected and leaves everything as it was.
    pub fn start_new(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        self.state.clear_fields();
        self.state.name = name.to_string();
        self.state.phase = Phase::Named;
        tracing::info!(name = %name, "Started new scenario");
        Ok(())
    }

    pub fn set_criteria(&mut self, criteria: &str) -> Result<()> {
        self.require_editable()?;
        self.state.criteria = criteria.to_string();
        Ok(())
    }

    /// Edits the name field. A blank name is accepted here and rejected by
    /// [`generate`](Self::generate).
    pub fn rename(&mut self, name: &str) -> Result<()> {
        self.require_editable()?;
        self.state.name = name.to_string();
        Ok(())
    }

    /// Runs the extractor over `paths` in order, replacing any earlier
    /// uploads, and appends the successful extractions to the criteria.
    ///
    /// Individual file failures do not stop the batch; they are listed in
    /// the returned report. An empty batch changes nothing and returns `None`.
    pub fn upload<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Option<UploadReport>> {
        self.require_editable()?;
        if paths.is_empty() {
            return Ok(None);
        }

        let _span = tracing::info_span!("scenario.upload", files = paths.len()).entered();

        let files: Vec<ProcessedFile> = paths
            .iter()
            .map(|p| {
                let path = p.as_ref();
                tracing::debug!(file = %redact_path(path), "Extracting");
                self.extractor.extract(path)
            })
            .collect();

        let merged = merge_extractions(&self.state.criteria, &files);
        self.state.criteria = merged.criteria;
        self.state.processed_files = files;

        if merged.report.is_failed() {
            tracing::warn!("Upload finished with extraction errors");
        } else {
            tracing::info!("Upload analyzed");
        }
        Ok(Some(merged.report))
    }

    /// Generates, displays and saves a scenario.
    ///
    /// The displayed output is `Scenario Name: <name>` followed by a blank
    /// line and the generator's text. A generator failure leaves the state
    /// untouched. A store failure keeps the new output displayed.
    pub fn generate(&mut self) -> Result<&str> {
        if self.state.name.trim().is_empty() {
            return Err(ValidationError::NameRequired.into());
        }
        if self.state.processed_files.is_empty() {
            return Err(ValidationError::FilesRequired.into());
        }

        let _span = tracing::info_span!(
            "scenario.generate",
            name = %self.state.name,
            files = self.state.processed_files.len()
        )
        .entered();

        let text = self
            .generator
            .generate(&self.state.criteria, &self.state.processed_files)?;

        self.state.output = format!("Scenario Name: {}\n\n{}", self.state.name, text);
        self.state.phase = Phase::Generated;

        let record = self.store.save(&NewScenario {
            name: self.state.name.clone(),
            criteria: self.state.criteria.clone(),
            generated_text: self.state.output.clone(),
            processed_files: self.state.processed_files.clone(),
        })?;
        tracing::info!(created_at = %record.created_at, "Scenario saved");

        self.refresh_history()?;
        Ok(&self.state.output)
    }

    /// Writes the displayed output to `destination`, replacing any file there.
    pub fn export(&self, destination: &Path) -> Result<PathBuf> {
        if self.state.output.is_empty() {
            return Err(ValidationError::NothingToExport.into());
        }

        let _span =
            tracing::info_span!("scenario.export", file = %redact_path(destination)).entered();
        Ok(export_text(destination, &self.state.output)?)
    }

    /// Reloads a saved scenario by exact name.
    ///
    /// When no record matches, the editing fields are cleared but the phase
    /// only drops back to `Named`; an `Empty` controller stays `Empty`.
    pub fn select_history(&mut self, name: &str) -> Result<HistoryLookup> {
        let _span = tracing::info_span!("scenario.select_history", name = %name).entered();

        match self.store.fetch(name)? {
            Some(record) => {
                self.load_record(record);
                Ok(HistoryLookup::Loaded)
            }
            None => {
                tracing::info!("Scenario not found");
                self.state.clear_fields();
                if self.state.phase.is_editable() {
                    self.state.phase = Phase::Named;
                }
                Ok(HistoryLookup::NotFound)
            }
        }
    }

    /// Deletes every saved scenario once `confirm` agrees, then resets the
    /// controller to `Empty`. `confirm` receives [`CLEAR_HISTORY_PROMPT`].
    pub fn clear_history<F>(&mut self, confirm: F) -> Result<ClearOutcome>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_HISTORY_PROMPT) {
            return Ok(ClearOutcome::Declined);
        }

        let _span = tracing::info_span!("scenario.clear_history").entered();
        self.store.purge()?;
        self.refresh_history()?;

        self.state.clear_fields();
        self.state.phase = Phase::Empty;
        tracing::info!("Scenario history cleared");
        Ok(ClearOutcome::Cleared)
    }

    fn load_record(&mut self, record: ScenarioRecord) {
        self.state.name = record.name;
        self.state.criteria = record.criteria;
        self.state.output = record.generated_text;
        self.state.processed_files = record.processed_files;
        self.state.phase = Phase::Generated;
    }

    fn refresh_history(&mut self) -> Result<()> {
        let entries = self.store.list()?;
        self.history = history::project(&entries);
        Ok(())
    }

    fn require_editable(&self) -> Result<()> {
        if self.state.phase.is_editable() {
            Ok(())
        } else {
            Err(ValidationError::NoScenario.into())
        }
    }
}

/// Controller wired to the document processors, the configured generator
/// backend and the SQLite history.
pub type DefaultController =
    ScenarioController<RegistryExtractor, Box<dyn Generator>, SqliteScenarioStore>;

impl DefaultController {
    /// Builds every collaborator from `config` and opens the history database.
    pub fn from_config(config: &Config) -> Result<Self> {
        let extractor = RegistryExtractor::new(&config.extraction);
        let generator = build_generator(&config.generator)?;
        let path = config.database_path().ok_or(DatabaseError::NoPath)?;
        let store = SqliteScenarioStore::open(&path)?;
        Self::new(extractor, generator, store)
    }
}
