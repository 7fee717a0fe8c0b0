//! Config-driven pipeline runs: read inputs, extract, validate, write outputs.
//!
//! Each `run_*` resolves its paths from [`HdkbConfig`], fails fast on a missing
//! top-level input, and returns a summary carrying the files it wrote plus any
//! non-fatal per-file errors.

use std::fs;
use std::path::{Path, PathBuf};

use hdkb_core::config::PathsConfig;
use hdkb_core::errors::{ArticleError, ConfigError, PipelineError, PipelineResult};
use hdkb_core::types::Center;
use hdkb_core::HdkbConfig;

use crate::articles::{
    self, copies, CopyCleanupPlan, DedupOutcome, PaidClassifier, PolicySet, RecheckOutcome,
    ScanOptions, TransferSummary,
};
use crate::channels::{self, ChannelExtraction, ChannelStats, MergeSummary, MergedChannel};
use crate::connections::{self, CenterConnectionIndex};
use crate::crosses::{self, CrossStats, ReconciliationReport};
use crate::output::{write_json, write_text};
use crate::reference::GateReference;
use crate::reports::{self, ArticleSetDiff, KnowledgeBaseCensus};

pub const GATE_CENTERS_FILE: &str = "gate_centers.json";
pub const GATE_OPPOSITES_FILE: &str = "gate_opposites.json";
pub const CHANNELS_LISTING_FILE: &str = "channels_listing.json";
pub const CHANNELS_CHAPTER_FILE: &str = "channels_chapter.json";
pub const CHANNELS_COMPLETE_FILE: &str = "channels_36_complete.json";
pub const CROSSES_FILE: &str = "incarnation_crosses.json";
pub const CROSSES_REPORT_FILE: &str = "crosses_analysis.txt";
pub const CENTER_CONNECTIONS_FILE: &str = "center_connections.json";
pub const CHANNELS_WITH_CENTERS_FILE: &str = "channels_with_centers.json";
pub const CONNECTIONS_REPORT_FILE: &str = "center_connections.txt";
pub const DEDUP_REPORT_FILE: &str = "dedup_report.txt";
pub const PAID_LIST_FILE: &str = "paid_articles.txt";
pub const RECHECK_REPORT_FILE: &str = "paid_articles_rechecked.txt";
pub const COPY_CLEANUP_REPORT_FILE: &str = "copy_cleanup_report.txt";
pub const COMPARISON_REPORT_FILE: &str = "article_comparison.txt";
pub const CENSUS_REPORT_FILE: &str = "knowledge_base_census.txt";

/// Configured gate table, or the embedded one.
pub fn load_reference(config: &HdkbConfig) -> Result<GateReference, PipelineError> {
    let reference = match &config.reference.gate_table {
        Some(path) => GateReference::from_file(path)?,
        None => GateReference::builtin()?,
    };
    tracing::debug!(version = reference.version(), "gate reference loaded");
    Ok(reference)
}

/// Configured policy file, or the embedded policies.
pub fn load_policies(config: &HdkbConfig) -> Result<PolicySet, PipelineError> {
    let policies = match &config.classify.policy_file {
        Some(path) => PolicySet::from_file(path)?,
        None => PolicySet::builtin()?,
    };
    Ok(policies)
}

fn read_input(path: &Path) -> Result<String, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::input(path, e))?;
    Ok(text.replace("\r\n", "\n"))
}

fn require<'a>(value: &'a Option<PathBuf>, field: &str) -> Result<&'a Path, PipelineError> {
    Ok(PathsConfig::require(value, field)?)
}

struct Outputs {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl Outputs {
    fn new(config: &HdkbConfig) -> Self {
        Self {
            dir: config.paths.effective_output_dir(),
            written: Vec::new(),
        }
    }

    fn json<T: serde::Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), PipelineError> {
        let path = self.dir.join(name);
        write_json(&path, value)?;
        tracing::info!(path = %path.display(), "wrote table");
        self.written.push(path);
        Ok(())
    }

    fn text(&mut self, name: &str, text: &str) -> Result<(), PipelineError> {
        let path = self.dir.join(name);
        write_text(&path, text)?;
        tracing::info!(path = %path.display(), "wrote report");
        self.written.push(path);
        Ok(())
    }
}

// ---- Reference tables ----

#[derive(Debug, Clone)]
pub struct GatesSummary {
    pub reference_version: u32,
    pub center_sizes: Vec<(Center, usize)>,
    pub outputs: Vec<PathBuf>,
}

/// Write the gate → center and gate → opposite tables.
pub fn run_gates(config: &HdkbConfig) -> Result<GatesSummary, PipelineError> {
    let reference = load_reference(config)?;
    let mut out = Outputs::new(config);
    out.json(GATE_CENTERS_FILE, &reference.gate_center_records())?;
    out.json(GATE_OPPOSITES_FILE, &reference.gate_opposite_records())?;
    Ok(GatesSummary {
        reference_version: reference.version(),
        center_sizes: reference.center_sizes(),
        outputs: out.written,
    })
}

// ---- Channels ----

#[derive(Debug, Clone)]
pub struct ChannelsSummary {
    pub listing: Option<ChannelStats>,
    pub chapter: Option<ChannelStats>,
    /// Canonical keys each configured source lacks.
    pub listing_missing: Vec<String>,
    pub chapter_missing: Vec<String>,
    /// Extracted keys outside the canonical 36, dropped by the merge.
    pub listing_non_canonical: Vec<String>,
    pub chapter_non_canonical: Vec<String>,
    pub merge: MergeSummary,
    pub outputs: Vec<PathBuf>,
}

/// Extract from whichever channel sources are configured and merge them over
/// the canonical 36. The chapter source is primary.
pub fn run_channels(config: &HdkbConfig) -> Result<ChannelsSummary, PipelineError> {
    let paths = &config.paths;
    if paths.channel_listing.is_none() && paths.channel_chapter.is_none() {
        return Err(ConfigError::MissingValue {
            field: "paths.channel_chapter or paths.channel_listing".to_string(),
        }
        .into());
    }
    let reference = load_reference(config)?;
    let mut out = Outputs::new(config);

    let listing = match &paths.channel_listing {
        Some(path) => {
            let extraction = channels::extract_listing(&read_input(path)?);
            out.json(CHANNELS_LISTING_FILE, &extraction.records)?;
            Some(extraction)
        }
        None => None,
    };
    let chapter = match &paths.channel_chapter {
        Some(path) => {
            let extraction = channels::extract_chapter(&read_input(path)?);
            out.json(CHANNELS_CHAPTER_FILE, &extraction.records)?;
            Some(extraction)
        }
        None => None,
    };

    let empty = ChannelExtraction::default();
    let merged: Vec<MergedChannel> = channels::merge(
        chapter.as_ref().unwrap_or(&empty),
        listing.as_ref().unwrap_or(&empty),
        reference.canonical_channels(),
    );
    let merge = MergeSummary::from_channels(&merged);
    out.json(CHANNELS_COMPLETE_FILE, &merged)?;

    tracing::info!(
        combined = merge.combined,
        primary_only = merge.primary_only,
        secondary_only = merge.secondary_only,
        missing = merge.missing.len(),
        "channels merged"
    );
    let missing_of = |e: &Option<ChannelExtraction>| {
        e.as_ref()
            .map(|e| e.missing_canonical(&reference))
            .unwrap_or_default()
    };
    let non_canonical_of = |e: &Option<ChannelExtraction>| -> Vec<String> {
        e.as_ref()
            .map(|e| e.non_canonical(&reference).into_iter().map(|r| r.key.clone()).collect())
            .unwrap_or_default()
    };
    let listing_non_canonical = non_canonical_of(&listing);
    let chapter_non_canonical = non_canonical_of(&chapter);
    for key in listing_non_canonical.iter().chain(&chapter_non_canonical) {
        tracing::warn!(channel = %key, "extracted channel is not canonical; dropped from merge");
    }
    Ok(ChannelsSummary {
        listing: listing.as_ref().map(|e| e.stats),
        chapter: chapter.as_ref().map(|e| e.stats),
        listing_missing: missing_of(&listing),
        chapter_missing: missing_of(&chapter),
        listing_non_canonical,
        chapter_non_canonical,
        merge,
        outputs: out.written,
    })
}

// ---- Crosses ----

#[derive(Debug, Clone)]
pub struct CrossesSummary {
    pub stats: CrossStats,
    pub report: ReconciliationReport,
    pub outputs: Vec<PathBuf>,
}

pub fn run_crosses(config: &HdkbConfig) -> Result<CrossesSummary, PipelineError> {
    let source = require(&config.paths.crosses_source, "crosses_source")?;
    let text = read_input(source)?;
    let extraction = crosses::extract_crosses(&text, config.crosses.effective_dedup_key());
    let report = extraction.reconcile();
    if !report.is_clean() {
        tracing::warn!(
            total = report.total,
            discrepancies = report.discrepancies.len(),
            "cross counts do not reconcile"
        );
    }

    let mut out = Outputs::new(config);
    out.json(CROSSES_FILE, &extraction.records)?;
    out.text(CROSSES_REPORT_FILE, &report.render_text())?;
    Ok(CrossesSummary {
        stats: extraction.stats,
        report,
        outputs: out.written,
    })
}

// ---- Center connections ----

#[derive(Debug, Clone)]
pub struct ConnectionsSummary {
    pub connection_count: usize,
    pub channel_count: usize,
    /// Keys of the motor-to-throat connections.
    pub motor_to_throat: Vec<String>,
    pub outputs: Vec<PathBuf>,
}

/// Build the index from the merged channel table a previous `run_channels`
/// wrote into the output directory.
pub fn run_connections(config: &HdkbConfig) -> Result<ConnectionsSummary, PipelineError> {
    let reference = load_reference(config)?;
    let mut out = Outputs::new(config);
    let input = out.dir.join(CHANNELS_COMPLETE_FILE);
    let merged: Vec<MergedChannel> =
        serde_json::from_str(&read_input(&input)?).map_err(|e| PipelineError::InputInvalid {
            path: input.clone(),
            message: e.to_string(),
        })?;

    let index: CenterConnectionIndex = connections::build(&merged, &reference);
    out.json(CENTER_CONNECTIONS_FILE, &index.connections)?;
    out.json(CHANNELS_WITH_CENTERS_FILE, &index.channels_with_centers)?;
    out.text(CONNECTIONS_REPORT_FILE, &index.render_text())?;

    Ok(ConnectionsSummary {
        connection_count: index.connections.len(),
        channel_count: index.channel_count(),
        motor_to_throat: index.motor_to_throat().iter().map(|c| c.key()).collect(),
        outputs: out.written,
    })
}

// ---- Articles ----

#[derive(Debug, Default)]
pub struct DedupSummary {
    pub outcome: DedupOutcome,
    pub copied: TransferSummary,
    pub outputs: Vec<PathBuf>,
}

pub fn run_dedup(config: &HdkbConfig) -> Result<PipelineResult<DedupSummary>, PipelineError> {
    let source = require(&config.paths.articles_source, "articles_source")?;
    let dest = require(&config.paths.articles_output, "articles_output")?;
    let options = ScanOptions {
        collection_prefix: config.articles.effective_collection_prefix().to_string(),
        skip_files: config.articles.effective_skip_files(),
    };

    let mut scan = articles::scan_collection(source, &options).map_err(article_input_error)?;
    let unreadable = std::mem::take(&mut scan.unreadable);
    let unreadable_count = unreadable.len();
    let mut outcome = articles::deduplicate(scan);
    outcome.unreadable = unreadable_count;

    let copied = articles::copy_kept(&outcome, dest, config.articles.effective_dry_run());
    let mut out = Outputs::new(config);
    out.text(DEDUP_REPORT_FILE, &outcome.render_text(&copied.data))?;

    let mut result = PipelineResult::new(DedupSummary {
        outcome,
        copied: copied.data,
        outputs: out.written,
    });
    for e in unreadable {
        result.add_error(e);
    }
    result.errors.extend(copied.errors);
    Ok(result)
}

fn classifier(policies: &PolicySet, name: &str) -> Result<PaidClassifier, PipelineError> {
    Ok(policies.classifier(name)?)
}

#[derive(Debug, Default)]
pub struct ClassifySummary {
    pub policy: String,
    pub paid: usize,
    pub free: usize,
    pub moved: TransferSummary,
    pub outputs: Vec<PathBuf>,
}

/// Classify the deduplicated folder and move each article into paid or free.
pub fn run_classify(config: &HdkbConfig) -> Result<PipelineResult<ClassifySummary>, PipelineError> {
    let source = require(&config.paths.articles_output, "articles_output")?;
    let paid_dir = require(&config.paths.paid_dir, "paid_dir")?;
    let free_dir = require(&config.paths.free_dir, "free_dir")?;
    let policies = load_policies(config)?;
    let classifier = classifier(&policies, config.classify.effective_policy())?;

    let mut report = articles::classify_dir(
        source,
        &classifier,
        config.classify.effective_context_chars(),
        &config.articles.effective_skip_files(),
    )
    .map_err(article_input_error)?;
    let moved = articles::sort_into(&report, paid_dir, free_dir, config.articles.effective_dry_run());

    let mut out = Outputs::new(config);
    out.text(PAID_LIST_FILE, &report.render_paid_list())?;

    let mut result = PipelineResult::new(ClassifySummary {
        policy: format!("{} v{}", report.policy, report.policy_version),
        paid: report.paid_count(),
        free: report.free_count(),
        moved: moved.data,
        outputs: out.written,
    });
    for e in report.unreadable.drain(..) {
        result.add_error(e);
    }
    result.errors.extend(moved.errors);
    Ok(result)
}

#[derive(Debug, Default)]
pub struct RecheckSummary {
    pub outcome: RecheckOutcome,
    pub outputs: Vec<PathBuf>,
}

/// Re-examine the paid folder with the recheck policy.
pub fn run_recheck(config: &HdkbConfig) -> Result<PipelineResult<RecheckSummary>, PipelineError> {
    let paid_dir = require(&config.paths.paid_dir, "paid_dir")?;
    let free_dir = require(&config.paths.free_dir, "free_dir")?;
    let policies = load_policies(config)?;
    let strict = classifier(&policies, config.classify.effective_recheck_policy())?;

    let mut outcome = articles::recheck(
        paid_dir,
        free_dir,
        &strict,
        config.classify.effective_context_chars(),
        &config.articles.effective_skip_files(),
        config.articles.effective_dry_run(),
    )
    .map_err(article_input_error)?;

    let mut out = Outputs::new(config);
    out.text(RECHECK_REPORT_FILE, &outcome.render_text())?;

    let mut errors: Vec<PipelineError> = outcome
        .report
        .unreadable
        .drain(..)
        .map(PipelineError::from)
        .collect();
    errors.append(&mut outcome.moved.errors);

    let mut result = PipelineResult::new(RecheckSummary {
        outcome,
        outputs: out.written,
    });
    result.errors = errors;
    Ok(result)
}

#[derive(Debug, Default)]
pub struct CleanCopiesSummary {
    pub plan: CopyCleanupPlan,
    pub deleted: TransferSummary,
    pub outputs: Vec<PathBuf>,
}

pub fn run_clean_copies(
    config: &HdkbConfig,
) -> Result<PipelineResult<CleanCopiesSummary>, PipelineError> {
    let dir = require(&config.paths.copies_dir, "copies_dir")?;
    let plan = copies::plan(dir).map_err(article_input_error)?;
    let applied = copies::apply(&plan, config.articles.effective_dry_run());

    let mut out = Outputs::new(config);
    out.text(COPY_CLEANUP_REPORT_FILE, &plan.render_text(&applied.data))?;

    let mut result = PipelineResult::new(CleanCopiesSummary {
        plan,
        deleted: applied.data,
        outputs: out.written,
    });
    result.errors = applied.errors;
    Ok(result)
}

// ---- Reports ----

#[derive(Debug, Default)]
pub struct CompareSummary {
    pub diff: ArticleSetDiff,
    pub outputs: Vec<PathBuf>,
}

pub fn run_compare(config: &HdkbConfig) -> Result<PipelineResult<CompareSummary>, PipelineError> {
    let old = require(&config.paths.old_articles_dir, "old_articles_dir")?;
    let free = require(&config.paths.free_dir, "free_dir")?;
    let paid = require(&config.paths.paid_dir, "paid_dir")?;
    let mut diff = reports::compare_sets(old, free, paid).map_err(article_input_error)?;

    let mut out = Outputs::new(config);
    out.text(COMPARISON_REPORT_FILE, &diff.render_text())?;
    tracing::info!(
        added = diff.added.len(),
        missing = diff.missing.len(),
        unreadable = diff.unreadable.len(),
        "article sets compared"
    );
    let unreadable = std::mem::take(&mut diff.unreadable);
    let mut result = PipelineResult::new(CompareSummary {
        diff,
        outputs: out.written,
    });
    for e in unreadable {
        result.add_error(e);
    }
    Ok(result)
}

#[derive(Debug)]
pub struct CensusSummary {
    pub census: KnowledgeBaseCensus,
    pub outputs: Vec<PathBuf>,
}

pub fn run_census(config: &HdkbConfig) -> Result<CensusSummary, PipelineError> {
    let root = require(&config.paths.knowledge_base, "knowledge_base")?;
    let census = reports::census(root)?;
    let mut out = Outputs::new(config);
    out.text(CENSUS_REPORT_FILE, &census.render_text())?;
    Ok(CensusSummary {
        census,
        outputs: out.written,
    })
}

/// A missing top-level folder is an input error, not an article error.
fn article_input_error(e: ArticleError) -> PipelineError {
    match e {
        ArticleError::Io { path, source } => PipelineError::input(path, source),
        other => other.into(),
    }
}
