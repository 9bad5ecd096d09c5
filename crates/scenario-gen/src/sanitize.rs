//! Helpers for sanitizing data before it enters tracing span attributes
//! or model prompts.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals the file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Escapes chat-template control sequences so user text cannot open or close
/// a message role inside a prompt.
///
/// Covers ChatML tokens (`<|...|>`), sequence boundaries (`<s>`, `</s>`) and
/// Llama-style `[INST]`/`<<SYS>>` markers.
pub fn sanitize_for_prompt(text: &str) -> String {
    text.replace("<|", "< |")
        .replace("|>", "| >")
        .replace("<s>", "< s >")
        .replace("</s>", "< / s >")
        .replace("[INST]", "[ INST ]")
        .replace("[/INST]", "[ / INST ]")
        .replace("<<SYS>>", "< < SYS > >")
        .replace("<</SYS>>", "< < / SYS > >")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_path_returns_filename() {
        assert_eq!(
            redact_path(Path::new("/home/user/Documents/requirements.pdf")),
            "requirements.pdf"
        );
    }

    #[test]
    fn test_redact_path_no_filename() {
        assert_eq!(redact_path(Path::new("/")), "<unknown>");
    }

    #[test]
    fn test_sanitize_chatml_tokens() {
        assert_eq!(
            sanitize_for_prompt("<|im_start|>system"),
            "< |im_start| >system"
        );
    }

    #[test]
    fn test_sanitize_llama_markers() {
        assert_eq!(
            sanitize_for_prompt("[INST] do this [/INST]"),
            "[ INST ] do this [ / INST ]"
        );
        assert_eq!(sanitize_for_prompt("<s>hi</s>"), "< s >hi< / s >");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        let text = "Given a user with 3 failed logins, when they retry, then lock.";
        assert_eq!(sanitize_for_prompt(text), text);
    }
}
