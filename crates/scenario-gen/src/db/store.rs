//! Durable keyed storage for scenario records.

use std::path::Path;

use super::{scenario_repo, Database, DatabaseError};
use crate::scenario::model::{HistoryEntry, NewScenario, ScenarioRecord};

/// Storage capability used by the scenario controller.
///
/// Every call is a single atomic operation: a saved record is visible to the
/// next `list`/`fetch`, and `purge` never leaves a partial listing behind.
/// Names are unique; saving an existing name replaces that record.
pub trait ScenarioStore {
    /// Persists a scenario and returns it with its store-assigned `created_at`.
    fn save(&self, scenario: &NewScenario) -> Result<ScenarioRecord, DatabaseError>;

    /// Lists `(name, created_at)` pairs in insertion order.
    fn list(&self) -> Result<Vec<HistoryEntry>, DatabaseError>;

    fn fetch(&self, name: &str) -> Result<Option<ScenarioRecord>, DatabaseError>;

    fn purge(&self) -> Result<(), DatabaseError>;
}

impl<S: ScenarioStore + ?Sized> ScenarioStore for &S {
    fn save(&self, scenario: &NewScenario) -> Result<ScenarioRecord, DatabaseError> {
        (**self).save(scenario)
    }

    fn list(&self) -> Result<Vec<HistoryEntry>, DatabaseError> {
        (**self).list()
    }

    fn fetch(&self, name: &str) -> Result<Option<ScenarioRecord>, DatabaseError> {
        (**self).fetch(name)
    }

    fn purge(&self) -> Result<(), DatabaseError> {
        (**self).purge()
    }
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteScenarioStore {
    db: Database,
}

impl SqliteScenarioStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl ScenarioStore for SqliteScenarioStore {
    fn save(&self, scenario: &NewScenario) -> Result<ScenarioRecord, DatabaseError> {
        let record = scenario_repo::insert(&self.db, scenario)?;
        log::debug!(
            "Saved scenario '{}' at {} with {} file(s)",
            record.name,
            record.created_at,
            record.processed_files.len()
        );
        Ok(record)
    }

    fn list(&self) -> Result<Vec<HistoryEntry>, DatabaseError> {
        scenario_repo::list(&self.db)
    }

    fn fetch(&self, name: &str) -> Result<Option<ScenarioRecord>, DatabaseError> {
        scenario_repo::find_by_name(&self.db, name)
    }

    fn purge(&self) -> Result<(), DatabaseError> {
        let deleted = scenario_repo::purge(&self.db)?;
        log::info!("Purged {} scenario(s) from history", deleted);
        Ok(())
    }
}
