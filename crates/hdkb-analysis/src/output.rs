//! Writers for generated JSON tables and text reports.

use std::fs;
use std::path::Path;

use hdkb_core::errors::OutputError;
use serde::Serialize;

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| OutputError::Write {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Pretty JSON (2-space indent, non-ASCII kept as-is) with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| OutputError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    json.push('\n');
    write_text(path, &json)
}

pub fn write_text(path: &Path, text: &str) -> Result<(), OutputError> {
    ensure_parent(path)?;
    fs::write(path, text).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote output");
    Ok(())
}
