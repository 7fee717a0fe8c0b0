//! Article discovery.

use std::fs;
use std::path::{Path, PathBuf};

use hdkb_core::errors::ArticleError;
use walkdir::WalkDir;

use super::front_matter::{self, FrontMatter};

/// How an article is told apart from others.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArticleIdentity {
    Url(String),
    FileName(String),
}

impl std::fmt::Display for ArticleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::FileName(name) => write!(f, "file:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub path: PathBuf,
    pub file_name: String,
    /// Name of the file's grandparent directory.
    pub collection: String,
    pub front_matter: FrontMatter,
}

impl Article {
    pub fn identity(&self) -> ArticleIdentity {
        match &self.front_matter.source_url {
            Some(url) => ArticleIdentity::Url(url.clone()),
            None => ArticleIdentity::FileName(self.file_name.clone()),
        }
    }

    /// Front-matter title, else the file name.
    pub fn display_title(&self) -> &str {
        self.front_matter.title.as_deref().unwrap_or(&self.file_name)
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Collections whose name does not start with this are ignored. Empty keeps all.
    pub collection_prefix: String,
    /// File names never treated as articles.
    pub skip_files: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ArticleScan {
    /// Readable articles inside matching collections, in walk order.
    pub articles: Vec<Article>,
    /// Every `.md` file seen, including skipped ones.
    pub total_files: usize,
    pub outside_collection: usize,
    pub unreadable: Vec<ArticleError>,
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn collection_of(path: &Path) -> Option<String> {
    path.parent()?
        .parent()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Walk `root` in file-name order and read every article of a matching collection.
///
/// Only a missing or unreadable `root` is an error; per-file failures are
/// collected in [`ArticleScan::unreadable`].
pub fn scan_collection(root: &Path, options: &ScanOptions) -> Result<ArticleScan, ArticleError> {
    fs::read_dir(root).map_err(|source| ArticleError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut scan = ArticleScan::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!(path = %path.display(), error = %err, "cannot walk entry");
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                scan.unreadable.push(ArticleError::Io { path, source });
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if options.skip_files.iter().any(|s| *s == file_name) {
            continue;
        }
        scan.total_files += 1;

        let path = entry.into_path();
        let collection = collection_of(&path).unwrap_or_default();
        if !collection.starts_with(&options.collection_prefix) {
            scan.outside_collection += 1;
            continue;
        }

        match fs::read_to_string(&path) {
            Ok(content) => scan.articles.push(Article {
                front_matter: front_matter::extract(&content),
                path,
                file_name,
                collection,
            }),
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "skipping unreadable article");
                scan.unreadable.push(ArticleError::Io { path, source });
            }
        }
    }

    tracing::info!(
        files = scan.total_files,
        articles = scan.articles.len(),
        outside_collection = scan.outside_collection,
        unreadable = scan.unreadable.len(),
        "article scan finished"
    );
    Ok(scan)
}

/// `.md` files directly inside `dir`, sorted by name, minus `skip_files`.
pub fn list_markdown(dir: &Path, skip_files: &[String]) -> Result<Vec<PathBuf>, ArticleError> {
    let read = fs::read_dir(dir).map_err(|source| ArticleError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = read
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_markdown(p))
        .filter(|p| {
            p.file_name()
                .map(|n| !skip_files.iter().any(|s| n == s.as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
