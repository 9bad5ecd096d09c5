use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Writes `text` to `destination`, replacing any existing file.
///
/// The content goes to a hidden sibling file first and is renamed into
/// place, so the destination either keeps its old content or holds the
/// complete new text.
pub fn export_text(destination: &Path, text: &str) -> Result<PathBuf, ExportError> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_directory(&dir)?;

    let file_name = destination
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("scenario.txt");

    let temp_path = write_temp_sibling(&dir, file_name, text.as_bytes())?;

    if let Err(e) = std::fs::rename(&temp_path, destination) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(ExportError::MoveFile {
            from: temp_path,
            to: destination.to_path_buf(),
            source: e,
        });
    }

    tracing::info!(bytes = text.len(), "Scenario exported");
    Ok(destination.to_path_buf())
}

/// Creates `.{file_name}.tmp`, or a numbered variant when a stale temp
/// file is in the way, and writes `content` to it.
fn write_temp_sibling(dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf, ExportError> {
    let mut last_path = dir.join(format!(".{}.tmp", file_name));

    for counter in 1..=100 {
        let try_path = if counter == 1 {
            last_path.clone()
        } else {
            dir.join(format!(".{}.{}.tmp", file_name, counter))
        };

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&try_path)
        {
            Ok(mut file) => {
                let written = file.write_all(content).and_then(|_| file.sync_all());
                if let Err(e) = written {
                    drop(file);
                    let _ = std::fs::remove_file(&try_path);
                    return Err(ExportError::WriteFile {
                        path: try_path,
                        source: e,
                    });
                }
                return Ok(try_path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                last_path = try_path;
                continue;
            }
            Err(e) => {
                return Err(ExportError::WriteFile {
                    path: try_path,
                    source: e,
                });
            }
        }
    }

    Err(ExportError::WriteFile {
        path: last_path,
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "no free temporary file name",
        ),
    })
}

fn ensure_directory(path: &Path) -> Result<(), ExportError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| ExportError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
