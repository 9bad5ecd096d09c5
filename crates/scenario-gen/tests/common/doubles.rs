//! Test doubles for the controller's collaborators.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use scenario_gen::db::DatabaseError;
use scenario_gen::scenario::{HistoryEntry, NewScenario, ScenarioRecord};
use scenario_gen::{Generator, GeneratorError, ProcessedFile, ScenarioStore};

/// Generator returning a fixed text, or failing on demand.
pub struct FakeGenerator {
    reply: Option<String>,
    calls: Cell<usize>,
    seen: RefCell<Vec<(String, usize)>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: Cell::new(0),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// `(criteria, file count)` of every call, in order.
    pub fn seen(&self) -> Vec<(String, usize)> {
        self.seen.borrow().clone()
    }
}

impl Generator for FakeGenerator {
    fn generate(&self, criteria: &str, files: &[ProcessedFile]) -> Result<String, GeneratorError> {
        self.calls.set(self.calls.get() + 1);
        self.seen
            .borrow_mut()
            .push((criteria.to_string(), files.len()));
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GeneratorError::Status {
                status: 503,
                body: "model overloaded".to_string(),
            }),
        }
    }
}

/// Wraps a store and counts mutating calls. `fail_saves` makes every save
/// fail without touching the inner store.
pub struct CountingStore<S> {
    inner: S,
    saves: Cell<usize>,
    purges: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl<S: ScenarioStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            saves: Cell::new(0),
            purges: Cell::new(0),
            fail_saves: Cell::new(false),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn purges(&self) -> usize {
        self.purges.get()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ScenarioStore> ScenarioStore for CountingStore<S> {
    fn save(&self, scenario: &NewScenario) -> Result<ScenarioRecord, DatabaseError> {
        self.saves.set(self.saves.get() + 1);
        if self.fail_saves.get() {
            return Err(DatabaseError::LockPoisoned);
        }
        self.inner.save(scenario)
    }

    fn list(&self) -> Result<Vec<HistoryEntry>, DatabaseError> {
        self.inner.list()
    }

    fn fetch(&self, name: &str) -> Result<Option<ScenarioRecord>, DatabaseError> {
        self.inner.fetch(name)
    }

    fn purge(&self) -> Result<(), DatabaseError> {
        self.purges.set(self.purges.get() + 1);
        self.inner.purge()
    }
}
