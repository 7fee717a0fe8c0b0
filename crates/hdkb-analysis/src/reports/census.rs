//! Knowledge-base census: tree listing plus file-type totals.

use std::fs;
use std::path::{Path, PathBuf};

use hdkb_core::errors::PipelineError;
use walkdir::WalkDir;

/// Human-readable size with one decimal: `512.0B`, `1.5KB`, ... `TB`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1}{unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1}TB")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CensusEntryKind {
    /// Number of files directly inside.
    Directory { file_count: usize },
    /// `extension` includes the dot, empty when there is none.
    File { size: u64, extension: String },
    Unreadable { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusEntry {
    pub depth: usize,
    pub name: String,
    pub kind: CensusEntryKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CensusTotals {
    pub total_files: usize,
    pub txt_files: usize,
    pub md_files: usize,
    pub docx_files: usize,
    pub total_size: u64,
    /// Entries whose directory listing or metadata could not be read.
    pub unreadable: usize,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBaseCensus {
    pub root: PathBuf,
    pub entries: Vec<CensusEntry>,
    pub totals: CensusTotals,
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

fn direct_file_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
                .count()
        })
        .unwrap_or(0)
}

fn list_tree(dir: &Path, depth: usize, entries: &mut Vec<CensusEntry>) {
    let mut names: Vec<(String, PathBuf)> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| {
                e.map_err(|e| tracing::warn!(dir = %dir.display(), error = %e, "skipping directory entry"))
                    .ok()
            })
            .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
            .collect(),
        Err(e) => {
            entries.push(CensusEntry {
                depth,
                name: dir.display().to_string(),
                kind: CensusEntryKind::Unreadable {
                    message: e.to_string(),
                },
            });
            return;
        }
    };
    names.sort();

    for (name, path) in names {
        if path.is_dir() {
            entries.push(CensusEntry {
                depth,
                name,
                kind: CensusEntryKind::Directory {
                    file_count: direct_file_count(&path),
                },
            });
            list_tree(&path, depth + 1, entries);
        } else {
            let kind = match fs::metadata(&path) {
                Ok(meta) => CensusEntryKind::File {
                    size: meta.len(),
                    extension: extension_of(&name),
                },
                Err(e) => CensusEntryKind::Unreadable {
                    message: format!("{name}: {e}"),
                },
            };
            entries.push(CensusEntry { depth, name, kind });
        }
    }
}

/// Walk `root` once for the tree and once for totals.
pub fn census(root: &Path) -> Result<KnowledgeBaseCensus, PipelineError> {
    fs::read_dir(root).map_err(|e| PipelineError::input(root, e))?;

    let mut entries = Vec::new();
    list_tree(root, 0, &mut entries);

    let mut totals = CensusTotals::default();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "census walk error");
                totals.unreadable += 1;
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        // Follows symlinks, so a dangling link counts as unreadable.
        let meta = match fs::metadata(entry.path()) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "cannot stat file");
                totals.unreadable += 1;
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }
        totals.total_files += 1;
        totals.total_size += meta.len();
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".txt") {
            totals.txt_files += 1;
        } else if name.ends_with(".md") {
            totals.md_files += 1;
        } else if name.ends_with(".docx") {
            totals.docx_files += 1;
        }
    }

    tracing::info!(
        files = totals.total_files,
        size = totals.total_size,
        unreadable = totals.unreadable,
        "knowledge base census finished"
    );
    Ok(KnowledgeBaseCensus {
        root: root.to_path_buf(),
        entries,
        totals,
    })
}

impl KnowledgeBaseCensus {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("知识库结构分析\n");
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
        out.push_str(&format!("根目录: {}\n\n", self.root.display()));
        out.push_str("知识库结构:\n");
        out.push_str(&format!("{}\n", "-".repeat(80)));
        for entry in &self.entries {
            let indent = "  ".repeat(entry.depth);
            match &entry.kind {
                CensusEntryKind::Directory { file_count } => {
                    out.push_str(&format!(
                        "{indent}[目录] {}/ ({file_count} 个文件)\n",
                        entry.name
                    ));
                }
                CensusEntryKind::File { size, extension } => {
                    out.push_str(&format!(
                        "{indent}[文件] {} ({}) {extension}\n",
                        entry.name,
                        format_size(*size)
                    ));
                }
                CensusEntryKind::Unreadable { message } => {
                    out.push_str(&format!("{indent}[错误] 无法访问: {message}\n"));
                }
            }
        }

        let t = &self.totals;
        out.push_str(&format!("\n{}\n统计信息\n{}\n", "=".repeat(80), "=".repeat(80)));
        out.push_str(&format!("总文件数: {}\n", t.total_files));
        out.push_str(&format!("TXT文件: {}\n", t.txt_files));
        out.push_str(&format!("MD文件: {}\n", t.md_files));
        out.push_str(&format!("DOCX文件: {}\n", t.docx_files));
        out.push_str(&format!("总大小: {}\n", format_size(t.total_size)));
        if t.unreadable > 0 {
            out.push_str(&format!("无法读取: {}\n", t.unreadable));
        }
        out
    }
}
