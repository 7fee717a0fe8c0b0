//! Single-file copy, move and delete with path-carrying errors.

use std::fs;
use std::path::{Path, PathBuf};

use hdkb_core::errors::ArticleError;

/// Outcome of a best-effort batch of file operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    /// Operations that succeeded (or would have, in a dry run).
    pub completed: usize,
    pub dry_run: bool,
    /// Destination (or deleted) path per completed operation.
    pub targets: Vec<PathBuf>,
}

impl TransferSummary {
    pub fn dry(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, target: PathBuf) {
        self.completed += 1;
        self.targets.push(target);
    }
}

pub fn ensure_dir(dir: &Path) -> Result<(), ArticleError> {
    fs::create_dir_all(dir).map_err(|source| ArticleError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Copy, overwriting any existing destination.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), ArticleError> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| ArticleError::Transfer {
            action: "copy",
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}

/// Rename, falling back to copy-then-delete across filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<(), ArticleError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    let fail = |source| ArticleError::Transfer {
        action: "move",
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    fs::copy(from, to).map_err(fail)?;
    fs::remove_file(from).map_err(fail)
}

pub fn remove_file(path: &Path) -> Result<(), ArticleError> {
    fs::remove_file(path).map_err(|source| ArticleError::Io {
        path: path.to_path_buf(),
        source,
    })
}
