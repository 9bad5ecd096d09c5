//! Offline scenario outline, used when no model endpoint is configured.

use std::path::Path;

use super::{Generator, GeneratorError};
use crate::scenario::merge::EXTRACTED_HEADER;
use crate::scenario::model::ProcessedFile;

/// Longest excerpt of a document quoted under "Test Data".
const EXCERPT_CHARS: usize = 160;

/// Builds a deterministic scenario from the criteria lines and the
/// successfully extracted files. Each criterion becomes one test step.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for TemplateGenerator {
    fn generate(&self, criteria: &str, files: &[ProcessedFile]) -> Result<String, GeneratorError> {
        let _span = tracing::info_span!("generator.template", files = files.len()).entered();

        let criteria_lines = criterion_lines(criteria);
        let documents: Vec<(String, &str)> = files
            .iter()
            .filter_map(|f| f.extracted_info().map(|info| (display_name(&f.source_path), info)))
            .collect();

        if criteria_lines.is_empty() && documents.is_empty() {
            return Err(GeneratorError::NoInput);
        }

        let mut out = String::new();

        out.push_str("Objective:\n");
        match criteria_lines.first() {
            Some(first) => out.push_str(&format!("Verify that {}\n", lower_first(first))),
            None => out.push_str("Verify the behaviour described in the supplied documents\n"),
        }

        out.push_str("\nPreconditions:\n");
        if documents.is_empty() {
            out.push_str("- The system under test is deployed and reachable\n");
        } else {
            let names: Vec<&str> = documents.iter().map(|(name, _)| name.as_str()).collect();
            out.push_str(&format!("- Reference documents reviewed: {}\n", names.join(", ")));
        }

        out.push_str("\nTest Steps:\n");
        if criteria_lines.is_empty() {
            for (i, (name, _)) in documents.iter().enumerate() {
                out.push_str(&format!(
                    "{}. Exercise the behaviour described in {}\n   Expected: the system behaves as documented\n",
                    i + 1,
                    name
                ));
            }
        } else {
            for (i, line) in criteria_lines.iter().enumerate() {
                out.push_str(&format!(
                    "{}. {}\n   Expected: the criterion is satisfied\n",
                    i + 1,
                    line
                ));
            }
        }

        if !documents.is_empty() {
            out.push_str("\nTest Data:\n");
            for (name, info) in &documents {
                out.push_str(&format!("- {}: {}\n", name, excerpt(info)));
            }
        }

        Ok(out.trim_end().to_string())
    }
}

/// Non-empty criteria lines, stopping at the appended extraction block so
/// file content is not turned into steps.
fn criterion_lines(criteria: &str) -> Vec<String> {
    let own = criteria
        .split_once(EXTRACTED_HEADER)
        .map(|(before, _)| before)
        .unwrap_or(criteria);

    own.lines()
        .map(|l| l.trim().trim_start_matches(['-', '*']).trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn display_name(source_path: &str) -> String {
    Path::new(source_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source_path)
        .to_string()
}

fn excerpt(info: &str) -> String {
    let flat = info.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_become_steps() {
        let text = TemplateGenerator::new()
            .generate("User can log in\n- Locked after 3 failures", &[])
            .unwrap();

        assert!(text.starts_with("Objective:\nVerify that user can log in"));
        assert!(text.contains("1. User can log in"));
        assert!(text.contains("2. Locked after 3 failures"));
        assert!(!text.contains("Test Data:"));
    }

    #[test]
    fn test_extraction_block_is_not_a_step() {
        let criteria = "Checkout works\n\nExtracted information from files:\n\nFile 1:\nCart page\n";
        let files = [ProcessedFile::extracted("/tmp/cart.txt", "Cart page")];

        let text = TemplateGenerator::new().generate(criteria, &files).unwrap();

        assert!(text.contains("1. Checkout works"));
        assert!(!text.contains("2."));
        assert!(text.contains("Reference documents reviewed: cart.txt"));
        assert!(text.contains("- cart.txt: Cart page"));
    }

    #[test]
    fn test_failed_files_are_ignored() {
        let files = [
            ProcessedFile::failed("/tmp/bad.pdf", "Failed to process PDF", None),
            ProcessedFile::extracted("/tmp/search.md", "Search returns results"),
        ];

        let text = TemplateGenerator::new().generate("", &files).unwrap();

        assert!(!text.contains("bad.pdf"));
        assert!(text.contains("1. Exercise the behaviour described in search.md"));
    }

    #[test]
    fn test_no_input_is_error() {
        let files = [ProcessedFile::failed("/tmp/bad.pdf", "broken", None)];
        let result = TemplateGenerator::new().generate("   \n", &files);
        assert!(matches!(result, Err(GeneratorError::NoInput)));
    }

    #[test]
    fn test_long_documents_are_excerpted() {
        let long = "word ".repeat(100);
        let files = [ProcessedFile::extracted("notes.txt", long)];
        let text = TemplateGenerator::new().generate("Criterion", &files).unwrap();
        assert!(text.trim_end().ends_with("..."));
    }

    #[test]
    fn test_output_is_deterministic() {
        let files = [ProcessedFile::extracted("a.txt", "alpha")];
        let first = TemplateGenerator::new().generate("Do it", &files).unwrap();
        let second = TemplateGenerator::new().generate("Do it", &files).unwrap();
        assert_eq!(first, second);
    }
}
