//! Cleanup of `副本` copies that Windows leaves next to the original.

use std::fs;
use std::path::{Path, PathBuf};

use hdkb_core::constants::COPY_SUFFIXES;
use hdkb_core::errors::{ArticleError, PipelineResult};

use super::scan::list_markdown;
use super::transfer::{self, TransferSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// A copy kept because its size differs from the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptCopy {
    pub copy: CopyFile,
    pub original: String,
    pub original_size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CopyCleanupPlan {
    pub total_files: usize,
    pub to_delete: Vec<CopyFile>,
    pub kept: Vec<KeptCopy>,
}

pub fn is_copy(name: &str) -> bool {
    COPY_SUFFIXES.iter().any(|s| name.contains(s))
}

/// The file name with every copy suffix removed.
pub fn base_name(name: &str) -> String {
    COPY_SUFFIXES
        .iter()
        .fold(name.to_string(), |acc, suffix| acc.replace(suffix, ""))
}

/// Group `.md` files in `dir` by base name and decide what to delete.
///
/// In each group the original comes first; a copy with the same byte size
/// is deleted, a copy with a different size is kept and listed.
pub fn plan(dir: &Path) -> Result<CopyCleanupPlan, ArticleError> {
    let mut files = Vec::new();
    for path in list_markdown(dir, &[])? {
        let size = fs::metadata(&path)
            .map_err(|source| ArticleError::Io {
                path: path.clone(),
                source,
            })?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(CopyFile { name, path, size });
    }

    let mut plan = CopyCleanupPlan {
        total_files: files.len(),
        ..Default::default()
    };

    let mut groups: std::collections::BTreeMap<String, Vec<CopyFile>> = Default::default();
    for file in files {
        groups.entry(base_name(&file.name)).or_default().push(file);
    }

    for (_, mut group) in groups {
        if group.len() < 2 {
            continue;
        }
        // Stable: originals first, name order otherwise.
        group.sort_by_key(|f| is_copy(&f.name));
        let mut iter = group.into_iter();
        let Some(original) = iter.next() else {
            continue;
        };
        for candidate in iter.filter(|f| is_copy(&f.name)) {
            if candidate.size == original.size {
                plan.to_delete.push(candidate);
            } else {
                plan.kept.push(KeptCopy {
                    copy: candidate,
                    original: original.name.clone(),
                    original_size: original.size,
                });
            }
        }
    }

    tracing::info!(
        files = plan.total_files,
        delete = plan.to_delete.len(),
        kept = plan.kept.len(),
        "copy cleanup planned"
    );
    Ok(plan)
}

/// Delete the planned copies, best-effort.
pub fn apply(plan: &CopyCleanupPlan, dry_run: bool) -> PipelineResult<TransferSummary> {
    let mut result = PipelineResult::new(TransferSummary::dry(dry_run));
    for file in &plan.to_delete {
        if dry_run {
            tracing::info!(path = %file.path.display(), "would delete");
            result.data.record(file.path.clone());
            continue;
        }
        match transfer::remove_file(&file.path) {
            Ok(()) => result.data.record(file.path.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "delete failed");
                result.add_error(e);
            }
        }
    }
    result
}

impl CopyCleanupPlan {
    pub fn render_text(&self, applied: &TransferSummary) -> String {
        let mut out = String::new();
        out.push_str("副本文件清理报告\n");
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
        out.push_str(&format!("原始文件数: {}\n", self.total_files));
        let verb = if applied.dry_run { "将删除副本" } else { "已删除副本" };
        out.push_str(&format!("{verb}: {}\n", applied.completed));
        out.push_str(&format!("保留的不同大小副本: {}\n", self.kept.len()));
        out.push_str(&format!(
            "最终文件数: {}\n\n",
            self.total_files - applied.completed
        ));

        if !self.to_delete.is_empty() {
            out.push_str("删除的文件:\n");
            for (i, f) in self.to_delete.iter().enumerate() {
                out.push_str(&format!("  {}. {} ({} bytes)\n", i + 1, f.name, f.size));
            }
        }
        if !self.kept.is_empty() {
            out.push_str("\n保留的不同大小副本:\n");
            for (i, k) in self.kept.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {} ({} bytes) vs {} ({} bytes)\n",
                    i + 1,
                    k.copy.name,
                    k.copy.size,
                    k.original,
                    k.original_size
                ));
            }
        }
        out
    }
}
