//! Folds a batch of extraction results into the criteria text.

use crate::scenario::model::ProcessedFile;

pub(crate) const EXTRACTED_HEADER: &str = "Extracted information from files:";
const NO_DEBUG_INFO: &str = "No debug information available.";

/// One failing file of an upload batch. `index` is 1-based within the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub index: usize,
    pub source_path: String,
    pub error: String,
    pub debug_info: Option<String>,
}

/// Summary of an upload batch for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    /// Every file was analyzed.
    Analyzed { count: usize },
    /// At least one file failed. Successful files were still merged.
    Failed {
        count: usize,
        failures: Vec<FileFailure>,
    },
}

impl UploadReport {
    pub fn is_failed(&self) -> bool {
        matches!(self, UploadReport::Failed { .. })
    }

    pub fn message(&self) -> String {
        match self {
            UploadReport::Analyzed { count } => format!(
                "{} file(s) uploaded and analyzed successfully. \
                 Please adjust the criteria if necessary before generating the scenario.",
                count
            ),
            UploadReport::Failed { failures, .. } => {
                let details: Vec<String> = failures
                    .iter()
                    .map(|f| {
                        format!(
                            "File {}: {}\nDebug: {}",
                            f.index,
                            f.error,
                            f.debug_info.as_deref().unwrap_or(NO_DEBUG_INFO)
                        )
                    })
                    .collect();
                format!(
                    "Errors occurred during file analysis:\n\n{}",
                    details.join("\n\n")
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub criteria: String,
    pub report: UploadReport,
}

/// Appends every successful extraction to `criteria` under a `File <i>:`
/// heading and builds the batch report. Indices follow upload order, so a
/// failed file leaves a gap in the appended block.
pub fn merge_extractions(criteria: &str, files: &[ProcessedFile]) -> MergeOutcome {
    let extracted: Vec<String> = files
        .iter()
        .enumerate()
        .filter_map(|(i, file)| {
            file.extracted_info()
                .map(|info| format!("File {}:\n{}\n", i + 1, info))
        })
        .collect();

    let merged = format!(
        "{}\n\n{}\n\n{}",
        criteria,
        EXTRACTED_HEADER,
        extracted.join("\n")
    );

    let failures: Vec<FileFailure> = files
        .iter()
        .enumerate()
        .filter_map(|(i, file)| {
            file.error().map(|error| FileFailure {
                index: i + 1,
                source_path: file.source_path.clone(),
                error: error.to_string(),
                debug_info: file.debug_info().map(str::to_string),
            })
        })
        .collect();

    let report = if failures.is_empty() {
        UploadReport::Analyzed { count: files.len() }
    } else {
        UploadReport::Failed {
            count: files.len(),
            failures,
        }
    };

    MergeOutcome {
        criteria: merged,
        report,
    }
}
