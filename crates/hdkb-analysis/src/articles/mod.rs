//! Article housekeeping: scan, URL de-duplication, paid/free classification
//! and `副本` copy cleanup.
//!
//! Every per-file operation is best-effort. Failures are logged, collected
//! into the result, and the loop moves on.

pub mod classify;
pub mod copies;
pub mod dedup;
pub mod front_matter;
pub mod policy;
pub mod scan;
pub mod transfer;

pub use classify::{
    classify_dir, recheck, sort_into, ClassificationReport, ClassifiedArticle, RecheckOutcome,
};
pub use copies::{CopyCleanupPlan, CopyFile, KeptCopy};
pub use dedup::{copy_kept, deduplicate, DedupOutcome, DuplicateArticle};
pub use front_matter::FrontMatter;
pub use policy::{KeywordPolicy, PaidClassifier, PaidEvidence, PolicySet, Verdict};
pub use scan::{list_markdown, scan_collection, Article, ArticleIdentity, ArticleScan, ScanOptions};
pub use transfer::TransferSummary;
