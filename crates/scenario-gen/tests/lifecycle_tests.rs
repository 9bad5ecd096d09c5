//! End-to-end tests for the scenario lifecycle: name, upload, generate,
//! export, reload and purge, with the real extractor and a SQLite store.

mod common;

use common::{CountingStore, FakeGenerator, TestHarness};

use scenario_gen::processor::FileExtractor;
use scenario_gen::{
    ClearOutcome, HistoryLookup, Phase, RegistryExtractor, ScenarioController, ScenarioError,
    ScenarioStore, SqliteScenarioStore, ValidationError,
};

type Controller =
    ScenarioController<RegistryExtractor, FakeGenerator, CountingStore<SqliteScenarioStore>>;

fn controller(harness: &TestHarness, generator: FakeGenerator) -> Controller {
    let store = CountingStore::new(harness.open_store());
    ScenarioController::new(harness.extractor(), generator, store).unwrap()
}

fn validation_error<T: std::fmt::Debug>(result: Result<T, ScenarioError>) -> ValidationError {
    match result {
        Err(ScenarioError::Validation(e)) => e,
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_name_required() {
    let harness = TestHarness::new();
    let mut c = controller(&harness, FakeGenerator::replying("steps"));

    let err = validation_error(c.start_new(""));
    assert_eq!(err, ValidationError::EmptyName);
    assert_eq!(err.to_string(), "You must enter a scenario name to continue.");
    assert_eq!(c.phase(), Phase::Empty);

    c.start_new("S1").unwrap();
    assert_eq!(c.phase(), Phase::Named);
    assert_eq!(c.name(), "S1");
    assert!(c.criteria().is_empty());
    assert!(c.output().is_empty());
    assert!(c.processed_files().is_empty());
}

#[test]
fn test_generate_preconditions() {
    let harness = TestHarness::new();
    let mut c = controller(&harness, FakeGenerator::replying("steps"));
    c.start_new("S1").unwrap();

    let err = validation_error(c.generate());
    assert_eq!(err.to_string(), "Please upload files (images or documents) first.");
    assert_eq!(c.store().saves(), 0);

    let file = harness.write_text_input("story.txt", "As a user I can reset my password");
    c.upload(&[file]).unwrap();
    c.generate().unwrap();
    assert_eq!(c.store().saves(), 1);
}

#[test]
fn test_per_file_isolation() {
    let harness = TestHarness::new();
    let ok = harness.write_text_input("ok.txt", "Password reset link expires after 24 hours");
    let bad = harness.write_input("bad.pdf", b"this is not a pdf document");

    let mut c = controller(&harness, FakeGenerator::replying("steps"));
    c.start_new("Reset").unwrap();
    let report = c.upload(&[&ok, &bad]).unwrap().unwrap();

    let files = c.processed_files();
    assert_eq!(files.len(), 2);
    assert!(files[0].is_success());
    assert!(!files[1].is_success());

    assert!(c.criteria().contains(
        "Extracted information from files:\n\nFile 1:\nPassword reset link expires after 24 hours\n"
    ));
    assert!(!c.criteria().contains("File 2:"));

    assert!(report.is_failed());
    let message = report.message();
    assert!(message.starts_with("Errors occurred during file analysis:\n\nFile 2: "));
    assert!(message.contains(files[1].error().unwrap()));
    assert!(message.contains("Debug: path: "));
    assert!(message.contains("application/pdf"));
}

#[test]
fn test_successful_upload_message() {
    let harness = TestHarness::new();
    let a = harness.write_text_input("a.txt", "alpha");
    let b = harness.write_text_input("b.md", "beta");

    let mut c = controller(&harness, FakeGenerator::replying("steps"));
    c.start_new("S1").unwrap();
    let report = c.upload(&[a, b]).unwrap().unwrap();

    assert!(!report.is_failed());
    assert_eq!(
        report.message(),
        "2 file(s) uploaded and analyzed successfully. \
         Please adjust the criteria if necessary before generating the scenario."
    );
}

#[test]
fn test_idempotent_reload_across_reopen() {
    let harness = TestHarness::new();
    let file = harness.write_text_input("login.txt", "Account locks after three failures");

    let (criteria, output, files) = {
        let mut c = controller(&harness, FakeGenerator::replying("1. Enter a wrong password"));
        c.start_new("Lockout").unwrap();
        c.set_criteria("Lock the account").unwrap();
        c.upload(&[&file]).unwrap();
        c.generate().unwrap();
        (
            c.criteria().to_string(),
            c.output().to_string(),
            c.processed_files().to_vec(),
        )
    };
    assert_eq!(output, "Scenario Name: Lockout\n\n1. Enter a wrong password");

    let mut c = controller(&harness, FakeGenerator::replying("unused"));
    assert_eq!(c.history().len(), 1);
    assert!(c.history()[0].label.starts_with("Lockout - Created: "));

    assert_eq!(c.select_history("Lockout").unwrap(), HistoryLookup::Loaded);
    assert_eq!(c.phase(), Phase::Generated);
    assert_eq!(c.name(), "Lockout");
    assert_eq!(c.criteria(), criteria);
    assert_eq!(c.output(), output);
    assert_eq!(c.processed_files(), files.as_slice());
}

#[test]
fn test_purge_completeness() {
    let harness = TestHarness::new();
    let file = harness.write_text_input("a.txt", "alpha");

    let mut c = controller(&harness, FakeGenerator::replying("steps"));
    for name in ["One", "Two", "Three"] {
        c.start_new(name).unwrap();
        c.upload(&[&file]).unwrap();
        c.generate().unwrap();
    }
    assert_eq!(c.history().len(), 3);

    assert_eq!(c.clear_history(|_| false).unwrap(), ClearOutcome::Declined);
    assert_eq!(c.store().purges(), 0);
    assert_eq!(c.history().len(), 3);

    assert_eq!(c.clear_history(|_| true).unwrap(), ClearOutcome::Cleared);
    assert_eq!(c.store().purges(), 1);
    assert!(c.history().is_empty());
    assert!(c.store().list().unwrap().is_empty());
    assert_eq!(c.phase(), Phase::Empty);

    for name in ["One", "Two", "Three", "anything"] {
        assert_eq!(c.select_history(name).unwrap(), HistoryLookup::NotFound);
    }
    assert_eq!(c.phase(), Phase::Empty);
}

#[test]
fn test_round_trip_export() {
    let harness = TestHarness::new();
    let file = harness.write_text_input("a.txt", "alpha");

    let mut c = controller(
        &harness,
        FakeGenerator::replying("Schritt 1: Seite öffnen\n\tErwartet: Anmeldung ✓\r\n"),
    );
    c.start_new("Unicode").unwrap();
    c.upload(&[file]).unwrap();
    c.generate().unwrap();

    let dest = harness.export_path("unicode.txt");
    std::fs::create_dir_all(&harness.export_dir).unwrap();
    std::fs::write(&dest, "previous export").unwrap();

    let written = c.export(&dest).unwrap();

    assert_eq!(written, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), c.output().as_bytes());
}

#[test]
fn test_export_without_output() {
    let harness = TestHarness::new();
    let c = controller(&harness, FakeGenerator::replying("steps"));
    let dest = harness.export_path("none.txt");

    let err = validation_error(c.export(&dest));
    assert_eq!(err, ValidationError::NothingToExport);
    assert!(!dest.exists());
}

#[test]
fn test_timestamp_fallback() {
    let harness = TestHarness::new();
    let store = harness.open_store();
    store
        .database()
        .with_conn(|conn| {
            conn.execute(
                "INSERT INTO scenarios (name, criteria, scenario, processed_files, created_at)
                 VALUES (?1, '', 'Scenario Name: Legacy', '[]', ?2)",
                ["Legacy", "sometime last week"],
            )?;
            Ok(())
        })
        .unwrap();

    let c = controller(&harness, FakeGenerator::replying("steps"));

    assert_eq!(c.history().len(), 1);
    assert_eq!(c.history()[0].created, "sometime last week");
    assert_eq!(c.history()[0].label, "Legacy - Created: sometime last week");
}

#[test]
fn test_generator_failure_leaves_state() {
    let harness = TestHarness::new();
    let file = harness.write_text_input("a.txt", "alpha");

    let mut c = controller(&harness, FakeGenerator::failing());
    c.start_new("S1").unwrap();
    c.upload(&[file]).unwrap();
    let criteria = c.criteria().to_string();

    let result = c.generate();
    assert!(matches!(result, Err(ScenarioError::Generator(_))));

    assert_eq!(c.phase(), Phase::Named);
    assert!(c.output().is_empty());
    assert_eq!(c.criteria(), criteria);
    assert_eq!(c.store().saves(), 0);
    assert!(c.history().is_empty());
}

#[test]
fn test_store_failure_preserves_output() {
    let harness = TestHarness::new();
    let file = harness.write_text_input("a.txt", "alpha");

    let mut c = controller(&harness, FakeGenerator::replying("steps"));
    c.start_new("S1").unwrap();
    c.upload(&[file]).unwrap();
    c.store().fail_saves(true);

    let result = c.generate();
    assert!(matches!(result, Err(ScenarioError::Database(_))));
    assert_eq!(c.output(), "Scenario Name: S1\n\nsteps");
    assert!(c.history().is_empty());

    c.store().fail_saves(false);
    c.generate().unwrap();
    assert_eq!(c.history().len(), 1);
}

#[test]
fn test_generator_sees_merged_criteria() {
    let harness = TestHarness::new();
    let file = harness.write_text_input("notes.txt", "Cart total includes VAT");

    let mut c = controller(&harness, FakeGenerator::replying("steps"));
    c.start_new("Cart").unwrap();
    c.set_criteria("Totals are correct").unwrap();
    c.upload(&[file]).unwrap();
    c.generate().unwrap();

    let (criteria, count) = last_generator_call(&c);
    assert!(criteria.starts_with("Totals are correct\n\nExtracted information from files:"));
    assert!(criteria.contains("Cart total includes VAT"));
    assert_eq!(count, 1);
}

fn last_generator_call(c: &Controller) -> (String, usize) {
    c.generator()
        .seen()
        .pop()
        .expect("generator was not called")
}

#[test]
fn test_legacy_doc_upload_is_failure_record() {
    let harness = TestHarness::new();
    let doc = harness.write_input("legacy.doc", b"\xd0\xcf\x11\xe0");

    let file = harness.extractor().extract(&doc);
    assert_eq!(file.error(), Some("Unsupported document format: doc"));
}
