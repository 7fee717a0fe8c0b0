//! Paid/free sorting of a flat article folder and the stricter recheck.

use std::fs;
use std::path::{Path, PathBuf};

use hdkb_core::errors::{ArticleError, PipelineResult};

use super::front_matter;
use super::policy::{PaidClassifier, PaidEvidence, Verdict};
use super::scan::list_markdown;
use super::transfer::{self, TransferSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArticle {
    pub path: PathBuf,
    pub file_name: String,
    /// Front-matter title, else the file name.
    pub title: String,
    pub verdict: Verdict,
}

impl ClassifiedArticle {
    pub fn is_paid(&self) -> bool {
        self.verdict.is_paid()
    }

    pub fn evidence(&self) -> Option<&PaidEvidence> {
        match &self.verdict {
            Verdict::Paid(ev) => Some(ev),
            Verdict::Free => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ClassificationReport {
    pub policy: String,
    pub policy_version: u32,
    pub articles: Vec<ClassifiedArticle>,
    pub unreadable: Vec<ArticleError>,
}

impl ClassificationReport {
    pub fn paid(&self) -> impl Iterator<Item = &ClassifiedArticle> {
        self.articles.iter().filter(|a| a.is_paid())
    }

    pub fn free(&self) -> impl Iterator<Item = &ClassifiedArticle> {
        self.articles.iter().filter(|a| !a.is_paid())
    }

    pub fn paid_count(&self) -> usize {
        self.paid().count()
    }

    pub fn free_count(&self) -> usize {
        self.articles.len() - self.paid_count()
    }

    /// Numbered list of paid titles.
    pub fn render_paid_list(&self) -> String {
        let mut out = String::new();
        out.push_str("收费文章列表\n");
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
        out.push_str(&format!("策略: {} v{}\n", self.policy, self.policy_version));
        out.push_str(&format!(
            "收费: {} 篇  免费: {} 篇  读取失败: {}\n\n",
            self.paid_count(),
            self.free_count(),
            self.unreadable.len()
        ));
        for (i, article) in self.paid().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, article.title));
        }
        out
    }
}

/// Read and classify every `.md` file directly inside `dir`.
///
/// A missing `dir` is an error; unreadable files are collected.
pub fn classify_dir(
    dir: &Path,
    classifier: &PaidClassifier,
    context_chars: usize,
    skip_files: &[String],
) -> Result<ClassificationReport, ArticleError> {
    let mut report = ClassificationReport {
        policy: classifier.name().to_string(),
        policy_version: classifier.version(),
        ..Default::default()
    };

    for path in list_markdown(dir, skip_files)? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "skipping unreadable article");
                report.unreadable.push(ArticleError::Io { path, source });
                continue;
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = front_matter::extract(&content)
            .title
            .unwrap_or_else(|| file_name.clone());
        let verdict = classifier.classify(&content, context_chars);
        if let Verdict::Paid(ev) = &verdict {
            tracing::debug!(%title, pattern = %ev.pattern, "paid");
        }
        report.articles.push(ClassifiedArticle {
            path,
            file_name,
            title,
            verdict,
        });
    }

    tracing::info!(
        policy = %report.policy,
        paid = report.paid_count(),
        free = report.free_count(),
        "articles classified"
    );
    Ok(report)
}

fn move_all<'a>(
    articles: impl Iterator<Item = &'a ClassifiedArticle>,
    dest: &Path,
    result: &mut PipelineResult<TransferSummary>,
) {
    let dry_run = result.data.dry_run;
    for article in articles {
        let target = dest.join(&article.file_name);
        if dry_run {
            tracing::info!(from = %article.path.display(), to = %target.display(), "would move");
            result.data.record(target);
            continue;
        }
        match transfer::move_file(&article.path, &target) {
            Ok(()) => result.data.record(target),
            Err(e) => {
                tracing::warn!(error = %e, "move failed");
                result.add_error(e);
            }
        }
    }
}

/// Move each classified article into the paid or free folder.
pub fn sort_into(
    report: &ClassificationReport,
    paid_dir: &Path,
    free_dir: &Path,
    dry_run: bool,
) -> PipelineResult<TransferSummary> {
    let mut result = PipelineResult::new(TransferSummary::dry(dry_run));
    if !dry_run {
        for dir in [paid_dir, free_dir] {
            if let Err(e) = transfer::ensure_dir(dir) {
                result.add_error(e);
                return result;
            }
        }
    }
    move_all(report.paid(), paid_dir, &mut result);
    move_all(report.free(), free_dir, &mut result);
    result
}

#[derive(Debug, Default)]
pub struct RecheckOutcome {
    /// The paid folder, reclassified with the strict policy.
    pub report: ClassificationReport,
    /// False positives moved back to the free folder.
    pub moved: PipelineResult<TransferSummary>,
}

impl RecheckOutcome {
    pub fn confirmed(&self) -> impl Iterator<Item = &ClassifiedArticle> {
        self.report.paid()
    }

    pub fn false_positives(&self) -> impl Iterator<Item = &ClassifiedArticle> {
        self.report.free()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("收费文章列表（严格核实后）\n");
        out.push_str(&format!("{}\n\n", "=".repeat(80)));
        out.push_str(&format!(
            "策略: {} v{}\n",
            self.report.policy, self.report.policy_version
        ));
        out.push_str(&format!("总计: {} 篇\n", self.report.paid_count()));
        out.push_str(&format!(
            "误判移回免费: {} 篇{}\n\n",
            self.report.free_count(),
            if self.moved.data.dry_run { " (dry run)" } else { "" }
        ));
        for (i, article) in self.confirmed().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, article.title));
            if let Some(ev) = article.evidence() {
                out.push_str(&format!("   → ...{}...\n", ev.context));
            }
        }
        if self.report.free_count() > 0 {
            out.push_str("\n误判文章:\n");
            for article in self.false_positives() {
                out.push_str(&format!("  - {}\n", article.title));
            }
        }
        out
    }
}

/// Reclassify the paid folder with `strict`; move whatever it clears to `free_dir`.
pub fn recheck(
    paid_dir: &Path,
    free_dir: &Path,
    strict: &PaidClassifier,
    context_chars: usize,
    skip_files: &[String],
    dry_run: bool,
) -> Result<RecheckOutcome, ArticleError> {
    let report = classify_dir(paid_dir, strict, context_chars, skip_files)?;
    let mut moved = PipelineResult::new(TransferSummary::dry(dry_run));
    if !dry_run && report.free_count() > 0 {
        if let Err(e) = transfer::ensure_dir(free_dir) {
            moved.add_error(e);
            return Ok(RecheckOutcome { report, moved });
        }
    }
    move_all(report.free(), free_dir, &mut moved);

    tracing::info!(
        confirmed = report.paid_count(),
        false_positives = report.free_count(),
        "paid folder rechecked"
    );
    Ok(RecheckOutcome { report, moved })
}
