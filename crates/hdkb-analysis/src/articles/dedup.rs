//! URL de-duplication of scanned articles.

use std::path::{Path, PathBuf};

use hdkb_core::errors::PipelineResult;
use hdkb_core::types::FxHashMap;

use super::scan::{Article, ArticleIdentity, ArticleScan};
use super::transfer::{self, TransferSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateArticle {
    pub path: PathBuf,
    pub identity: ArticleIdentity,
    /// The earlier article that was kept instead.
    pub kept: PathBuf,
}

#[derive(Debug, Default)]
pub struct DedupOutcome {
    /// Survivors in walk order.
    pub kept: Vec<Article>,
    pub duplicates: Vec<DuplicateArticle>,
    pub total_files: usize,
    pub outside_collection: usize,
    pub unreadable: usize,
}

impl DedupOutcome {
    pub fn unique_urls(&self) -> usize {
        self.kept
            .iter()
            .filter(|a| a.front_matter.source_url.is_some())
            .count()
    }

    pub fn without_url(&self) -> usize {
        self.kept.len() - self.unique_urls()
    }

    pub fn render_text(&self, copied: &TransferSummary) -> String {
        let mut out = String::new();
        out.push_str("文章去重报告\n");
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
        out.push_str(&format!("扫描文件总数: {}\n", self.total_files));
        out.push_str(&format!("不在目标合集: {}\n", self.outside_collection));
        out.push_str(&format!("读取失败: {}\n", self.unreadable));
        out.push_str(&format!("独立URL数量: {}\n", self.unique_urls()));
        out.push_str(&format!("没有URL的文章: {}\n", self.without_url()));
        out.push_str(&format!("去重后保留: {} 篇\n", self.kept.len()));
        out.push_str(&format!("去除重复: {} 篇\n", self.duplicates.len()));
        if copied.dry_run {
            out.push_str(&format!("将复制: {} 篇 (dry run)\n", copied.completed));
        } else {
            out.push_str(&format!("已复制: {} 篇\n", copied.completed));
        }

        if !self.duplicates.is_empty() {
            out.push_str("\n重复文章:\n");
            for (i, dup) in self.duplicates.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {}\n     {} (保留 {})\n",
                    i + 1,
                    dup.path.display(),
                    dup.identity,
                    dup.kept.display()
                ));
            }
        }
        out
    }
}

/// First article seen per identity survives.
///
/// Articles without a `source_url` are keyed by file name, since they all
/// land in one flat destination folder.
pub fn deduplicate(scan: ArticleScan) -> DedupOutcome {
    let mut outcome = DedupOutcome {
        total_files: scan.total_files,
        outside_collection: scan.outside_collection,
        unreadable: scan.unreadable.len(),
        ..Default::default()
    };
    let mut seen: FxHashMap<ArticleIdentity, PathBuf> = FxHashMap::default();

    for article in scan.articles {
        let identity = article.identity();
        if let Some(kept) = seen.get(&identity) {
            tracing::debug!(path = %article.path.display(), %identity, "duplicate article");
            outcome.duplicates.push(DuplicateArticle {
                path: article.path,
                identity,
                kept: kept.clone(),
            });
            continue;
        }
        seen.insert(identity, article.path.clone());
        outcome.kept.push(article);
    }

    tracing::info!(
        kept = outcome.kept.len(),
        duplicates = outcome.duplicates.len(),
        "articles deduplicated"
    );
    outcome
}

/// Copy survivors into `dest` by file name. Failures are collected, not fatal.
pub fn copy_kept(outcome: &DedupOutcome, dest: &Path, dry_run: bool) -> PipelineResult<TransferSummary> {
    let mut result = PipelineResult::new(TransferSummary::dry(dry_run));
    if !dry_run {
        if let Err(e) = transfer::ensure_dir(dest) {
            result.add_error(e);
            return result;
        }
    }

    for article in &outcome.kept {
        let target = dest.join(&article.file_name);
        if dry_run {
            tracing::info!(from = %article.path.display(), to = %target.display(), "would copy");
            result.data.record(target);
            continue;
        }
        match transfer::copy_file(&article.path, &target) {
            Ok(()) => result.data.record(target),
            Err(e) => {
                tracing::warn!(error = %e, "copy failed");
                result.add_error(e);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::front_matter::FrontMatter;

    fn article(path: &str, url: Option<&str>) -> Article {
        let path = PathBuf::from(path);
        Article {
            file_name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path,
            collection: "王骁老师".to_string(),
            front_matter: FrontMatter {
                source_url: url.map(String::from),
                title: None,
            },
        }
    }

    fn scan(articles: Vec<Article>) -> ArticleScan {
        ArticleScan {
            total_files: articles.len(),
            articles,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_url_first_wins() {
        let outcome = deduplicate(scan(vec![
            article("a/x/1.md", Some("https://u/1")),
            article("b/x/2.md", Some("https://u/1")),
            article("b/x/3.md", Some("https://u/3")),
        ]));
        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.kept[0].file_name, "1.md");
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.duplicates[0].kept, PathBuf::from("a/x/1.md"));
    }

    #[test]
    fn test_no_url_articles_keyed_by_file_name() {
        let outcome = deduplicate(scan(vec![
            article("a/x/same.md", None),
            article("b/x/same.md", None),
            article("b/x/other.md", None),
        ]));
        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.without_url(), 2);
        assert_eq!(outcome.unique_urls(), 0);
    }

    #[test]
    fn test_copy_kept_and_dry_run() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let path = src.path().join("1.md");
        std::fs::write(&path, "正文").unwrap();
        let mut a = article("1.md", Some("https://u/1"));
        a.path = path;
        let outcome = deduplicate(scan(vec![a]));

        let out_dir = dest.path().join("out");
        let dry = copy_kept(&outcome, &out_dir, true);
        assert_eq!(dry.data.completed, 1);
        assert!(!out_dir.exists());

        let real = copy_kept(&outcome, &out_dir, false);
        assert!(real.is_clean());
        assert_eq!(std::fs::read_to_string(out_dir.join("1.md")).unwrap(), "正文");
        assert!(outcome.render_text(&real.data).contains("去重后保留: 1 篇"));
    }

    #[test]
    fn test_copy_failure_is_collected() {
        let dest = tempfile::tempdir().unwrap();
        let outcome = deduplicate(scan(vec![article("/nonexistent/x/gone.md", None)]));
        let result = copy_kept(&outcome, dest.path(), false);
        assert_eq!(result.data.completed, 0);
        assert_eq!(result.error_count(), 1);
    }
}
