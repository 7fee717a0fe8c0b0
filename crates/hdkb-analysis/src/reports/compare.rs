//! URL-keyed diff between an old article folder and the new free/paid split.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hdkb_core::errors::ArticleError;
use serde::Serialize;

use crate::articles::{front_matter, list_markdown};

/// Only the head of each file is searched for front matter.
pub const FRONT_MATTER_WINDOW: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRef {
    pub title: String,
    pub file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Paid,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "免费",
            Self::Paid => "收费",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedArticle {
    pub url: String,
    pub tier: Tier,
    pub article: ArticleRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingArticle {
    pub url: String,
    pub article: ArticleRef,
}

#[derive(Debug, Default, Serialize)]
pub struct ArticleSetDiff {
    pub old_count: usize,
    pub free_count: usize,
    pub paid_count: usize,
    pub new_total: usize,
    /// In the new folders but not the old one, ordered by URL.
    pub added: Vec<AddedArticle>,
    /// In the old folder but neither new one, ordered by URL.
    pub missing: Vec<MissingArticle>,
    /// Files in any of the three folders that could not be read.
    #[serde(skip)]
    pub unreadable: Vec<ArticleError>,
}

impl ArticleSetDiff {
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.missing.is_empty()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("文章新旧版本对比报告\n");
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
        out.push_str(&format!("旧版文章数: {} 篇\n", self.old_count));
        out.push_str(&format!("新版免费文章: {} 篇\n", self.free_count));
        out.push_str(&format!("新版收费文章: {} 篇\n", self.paid_count));
        out.push_str(&format!("新版总计: {} 篇\n", self.new_total));
        out.push_str(&format!("读取失败: {} 个\n\n", self.unreadable.len()));

        if !self.added.is_empty() {
            out.push_str(&format!("新版多出来的文章 ({} 篇):\n", self.added.len()));
            for (i, a) in self.added.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. [{}] {}\n",
                    i + 1,
                    a.tier.label(),
                    a.article.title
                ));
            }
            out.push('\n');
        }
        if !self.missing.is_empty() {
            out.push_str(&format!("新版缺失的文章 ({} 篇):\n", self.missing.len()));
            for (i, m) in self.missing.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, m.article.title));
            }
        }
        if self.is_identical() {
            out.push_str("两个版本的文章URL完全一致\n");
        }
        out
    }
}

/// `source_url` → article for every `.md` file in one folder.
#[derive(Debug, Default)]
pub struct UrlIndex {
    pub urls: BTreeMap<String, ArticleRef>,
    pub unreadable: Vec<ArticleError>,
}

/// Index every `.md` file in `dir` that carries a `source_url`.
///
/// A missing `dir` is an error; unreadable files are collected.
pub fn url_index(dir: &Path) -> Result<UrlIndex, ArticleError> {
    let mut index = UrlIndex::default();
    for path in list_markdown(dir, &[])? {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "skipping unreadable article");
                index.unreadable.push(ArticleError::Io { path, source });
                continue;
            }
        };
        let head: String = content.chars().take(FRONT_MATTER_WINDOW).collect();
        let fm = front_matter::extract(&head);
        let Some(url) = fm.source_url else {
            continue;
        };
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        index.urls.insert(
            url,
            ArticleRef {
                title: fm.title.unwrap_or_else(|| file.clone()),
                file,
            },
        );
    }
    Ok(index)
}

pub fn compare_sets(old: &Path, free: &Path, paid: &Path) -> Result<ArticleSetDiff, ArticleError> {
    let UrlIndex {
        urls: old_urls,
        unreadable: mut old_unreadable,
    } = url_index(old)?;
    let UrlIndex {
        urls: free_urls,
        unreadable: free_unreadable,
    } = url_index(free)?;
    let UrlIndex {
        urls: paid_urls,
        unreadable: paid_unreadable,
    } = url_index(paid)?;
    old_unreadable.extend(free_unreadable);
    old_unreadable.extend(paid_unreadable);

    let mut new_all: BTreeMap<&str, (Tier, &ArticleRef)> = BTreeMap::new();
    for (url, a) in &free_urls {
        new_all.insert(url, (Tier::Free, a));
    }
    for (url, a) in &paid_urls {
        new_all.insert(url, (Tier::Paid, a));
    }

    let added = new_all
        .iter()
        .filter(|(url, _)| !old_urls.contains_key(**url))
        .map(|(url, (tier, a))| AddedArticle {
            url: url.to_string(),
            tier: *tier,
            article: (*a).clone(),
        })
        .collect();
    let missing = old_urls
        .iter()
        .filter(|(url, _)| !new_all.contains_key(url.as_str()))
        .map(|(url, a)| MissingArticle {
            url: url.clone(),
            article: a.clone(),
        })
        .collect();

    Ok(ArticleSetDiff {
        old_count: old_urls.len(),
        free_count: free_urls.len(),
        paid_count: paid_urls.len(),
        new_total: new_all.len(),
        added,
        missing,
        unreadable: old_unreadable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(dir: &Path, file: &str, url: &str, title: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(file),
            format!("---\ntitle: \"{title}\"\nsource_url: \"{url}\"\n---\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_added_and_missing() {
        let root = tempfile::tempdir().unwrap();
        let (old, free, paid) = (
            root.path().join("old"),
            root.path().join("free"),
            root.path().join("paid"),
        );
        article(&old, "a.md", "https://u/a", "甲");
        article(&old, "b.md", "https://u/b", "乙");
        article(&free, "a.md", "https://u/a", "甲");
        article(&paid, "c.md", "https://u/c", "丙");

        let diff = compare_sets(&old, &free, &paid).unwrap();
        assert_eq!(diff.old_count, 2);
        assert_eq!(diff.new_total, 2);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].tier, Tier::Paid);
        assert_eq!(diff.missing.len(), 1);
        assert_eq!(diff.missing[0].article.title, "乙");

        let text = diff.render_text();
        assert!(text.contains("1. [收费] 丙"));
        assert!(text.contains("新版缺失的文章 (1 篇)"));
    }

    #[test]
    fn test_identical_sets() {
        let root = tempfile::tempdir().unwrap();
        let (old, free, paid) = (
            root.path().join("old"),
            root.path().join("free"),
            root.path().join("paid"),
        );
        article(&old, "a.md", "https://u/a", "甲");
        article(&free, "renamed.md", "https://u/a", "甲");
        fs::create_dir_all(&paid).unwrap();

        let diff = compare_sets(&old, &free, &paid).unwrap();
        assert!(diff.is_identical());
        assert!(diff.render_text().contains("完全一致"));
    }

    #[test]
    fn test_url_beyond_window_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{}\nsource_url: \"https://late\"\n", "字".repeat(FRONT_MATTER_WINDOW));
        fs::write(dir.path().join("late.md"), body).unwrap();
        assert!(url_index(dir.path()).unwrap().urls.is_empty());
    }

    #[test]
    fn test_unreadable_old_article_is_collected() {
        let root = tempfile::tempdir().unwrap();
        let (old, free, paid) = (
            root.path().join("old"),
            root.path().join("free"),
            root.path().join("paid"),
        );
        article(&old, "a.md", "https://u/a", "甲");
        article(&free, "a.md", "https://u/a", "甲");
        fs::create_dir_all(&paid).unwrap();
        // Not UTF-8.
        fs::write(old.join("broken.md"), [0xff, 0xfe, 0xfd]).unwrap();

        let diff = compare_sets(&old, &free, &paid).unwrap();
        assert_eq!(diff.unreadable.len(), 1);
        assert!(matches!(&diff.unreadable[0], ArticleError::Io { path, .. } if path.ends_with("broken.md")));
        assert_eq!(diff.old_count, 1);
        assert!(diff.is_identical());
        assert!(diff.render_text().contains("读取失败: 1 个"));
    }
}
