//! Isolated environment for controller tests: input files, export targets
//! and a SQLite history database under one temp directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use scenario_gen::config::ExtractionConfig;
use scenario_gen::{RegistryExtractor, SqliteScenarioStore};

pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub export_dir: PathBuf,
    pub db_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let input_dir = base.join("input");
        let export_dir = base.join("exports");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            db_path: base.join("data").join("scenarios.db"),
            temp_dir,
            input_dir,
            export_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_input(&self, filename: &str, content: &[u8]) -> PathBuf {
        let path = self.input_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    pub fn write_text_input(&self, filename: &str, content: &str) -> PathBuf {
        self.write_input(filename, content.as_bytes())
    }

    pub fn export_path(&self, filename: &str) -> PathBuf {
        self.export_dir.join(filename)
    }

    /// Opens (or reopens) the file-backed store.
    pub fn open_store(&self) -> SqliteScenarioStore {
        SqliteScenarioStore::open(&self.db_path).expect("Failed to open store")
    }

    /// Real document extractor with OCR turned off.
    pub fn extractor(&self) -> RegistryExtractor {
        let mut config = ExtractionConfig::default();
        config.ocr.enabled = false;
        RegistryExtractor::new(&config)
    }
}
