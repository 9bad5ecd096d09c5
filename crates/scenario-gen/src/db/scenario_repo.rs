//! Scenario repository: CRUD operations for the `scenarios` table.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};
use crate::scenario::model::{HistoryEntry, NewScenario, ProcessedFile, ScenarioRecord};

/// A raw scenario row. Columns are read by name, never by position.
#[derive(Debug, Clone)]
pub struct ScenarioRow {
    pub id: i64,
    pub name: String,
    pub criteria: String,
    pub scenario: String,
    pub processed_files: String,
    pub created_at: String,
}

impl ScenarioRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            criteria: row.get("criteria")?,
            scenario: row.get("scenario")?,
            processed_files: row.get("processed_files")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn into_record(self) -> Result<ScenarioRecord, DatabaseError> {
        let processed_files: Vec<ProcessedFile> = serde_json::from_str(&self.processed_files)
            .map_err(|e| DatabaseError::ProcessedFiles {
                name: self.name.clone(),
                source: e,
            })?;

        Ok(ScenarioRecord {
            name: self.name,
            criteria: self.criteria,
            generated_text: self.scenario,
            processed_files,
            created_at: self.created_at,
        })
    }
}

/// Inserts a scenario, replacing any existing scenario with the same name.
///
/// Delete and insert run in one transaction, so the replacement gets a fresh
/// `created_at` and moves to the end of the listing.
pub fn insert(db: &Database, scenario: &NewScenario) -> Result<ScenarioRecord, DatabaseError> {
    let processed_files = serde_json::to_string(&scenario.processed_files).map_err(|e| {
        DatabaseError::ProcessedFiles {
            name: scenario.name.clone(),
            source: e,
        }
    })?;

    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let replaced = tx.execute(
            "DELETE FROM scenarios WHERE name = ?1",
            params![scenario.name],
        )?;
        if replaced > 0 {
            log::info!("Replacing existing scenario '{}'", scenario.name);
        }

        tx.execute(
            "INSERT INTO scenarios (name, criteria, scenario, processed_files)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                scenario.name,
                scenario.criteria,
                scenario.generated_text,
                processed_files,
            ],
        )?;
        let id = tx.last_insert_rowid();

        let row = tx.query_row(
            "SELECT * FROM scenarios WHERE id = ?1",
            params![id],
            ScenarioRow::from_row,
        )?;

        tx.commit()?;
        row.into_record()
    })
}

/// Lists `(name, created_at)` for every scenario in insertion order.
pub fn list(db: &Database) -> Result<Vec<HistoryEntry>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT name, created_at FROM scenarios ORDER BY id ASC")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(HistoryEntry {
                    name: row.get("name")?,
                    created_at: row.get("created_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    })
}

/// Finds a scenario by its exact name.
pub fn find_by_name(db: &Database, name: &str) -> Result<Option<ScenarioRecord>, DatabaseError> {
    let row = db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM scenarios WHERE name = ?1",
                params![name],
                ScenarioRow::from_row,
            )
            .optional()?;
        Ok(row)
    })?;

    row.map(ScenarioRow::into_record).transpose()
}

/// Deletes every scenario. Returns the number of rows removed.
pub fn purge(db: &Database) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM scenarios", [])?;
        Ok(deleted)
    })
}
