//! hdkb: command-line front end for the knowledge-base pipelines.
//!
//! Each subcommand loads the layered configuration, runs one pipeline and
//! prints a short summary. Generated tables and reports land in the output
//! directory; logs go to stderr (`HDKB_LOG` controls the filter).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hdkb_analysis::pipelines;
use hdkb_core::config::{CliOverrides, CrossDedupKey};
use hdkb_core::errors::{HdkbErrorCode, PipelineError, PipelineResult};
use hdkb_core::HdkbConfig;

#[derive(Parser, Debug)]
#[command(name = "hdkb")]
#[command(version, about = "Human Design knowledge-base extraction toolkit")]
struct Cli {
    /// Project root where hdkb.toml is looked up
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Report what would be copied, moved or deleted without touching files
    #[arg(long, global = true)]
    dry_run: bool,

    /// Directory for generated tables and reports (overrides config)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the gate → center and gate → opposite tables
    Gates,
    /// Extract channels from the configured sources and merge the canonical 36
    Channels,
    /// Extract incarnation crosses and reconcile the counts
    Crosses {
        /// Dedup key: `typed` (type + gates) or `gates`
        #[arg(long, value_parser = parse_dedup_key)]
        dedup_key: Option<CrossDedupKey>,
    },
    /// Group the merged channels by the pair of centers they join
    Connections,
    /// Deduplicate collected articles by source URL and copy the survivors
    Dedup,
    /// Sort the deduplicated articles into paid and free folders
    Classify {
        /// Keyword policy name (see the policy file)
        #[arg(long)]
        policy: Option<String>,
    },
    /// Recheck the paid folder with the strict policy
    Recheck,
    /// Delete `副本` copies that are byte-identical in size to their original
    CleanCopies,
    /// Compare the old article folder against the new free/paid split
    Compare,
    /// List the knowledge base tree with file-type totals
    Census,
}

fn parse_dedup_key(s: &str) -> Result<CrossDedupKey, String> {
    s.parse()
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let (cross_dedup_key, classify_policy) = match &self.command {
            Command::Crosses { dedup_key } => (*dedup_key, None),
            Command::Classify { policy } => (None, policy.clone()),
            _ => (None, None),
        };
        CliOverrides {
            output_dir: self.output_dir.clone(),
            dry_run: self.dry_run.then_some(true),
            cross_dedup_key,
            classify_policy,
        }
    }
}

/// Log each non-fatal error and return the data.
fn report_errors<T: Default>(result: PipelineResult<T>) -> T {
    if !result.is_clean() {
        for error in &result.errors {
            tracing::warn!("{}", error.tagged());
        }
        println!("  {} non-fatal error(s), see log", result.error_count());
    }
    result.data
}

fn print_outputs(outputs: &[PathBuf]) {
    for path in outputs {
        println!("  wrote {}", path.display());
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.root, &cli.overrides())?;
    tracing::debug!(command = ?cli.command, "running");

    match &cli.command {
        Command::Gates => {
            let summary = pipelines::run_gates(&config).map_err(tagged)?;
            println!("gate reference v{}", summary.reference_version);
            for (center, size) in &summary.center_sizes {
                println!("  {:<12} {size}", center.id());
            }
            print_outputs(&summary.outputs);
        }
        Command::Channels => {
            let summary = pipelines::run_channels(&config).map_err(tagged)?;
            if let Some(stats) = summary.listing {
                println!(
                    "listing: {} headers, {} duplicates, {} invalid, {} canonical missing",
                    stats.headers_matched,
                    stats.duplicates_skipped,
                    stats.invalid_skipped,
                    summary.listing_missing.len()
                );
            }
            if let Some(stats) = summary.chapter {
                println!(
                    "chapter: {} entries, {} duplicates, {} invalid, {} canonical missing",
                    stats.headers_matched,
                    stats.duplicates_skipped,
                    stats.invalid_skipped,
                    summary.chapter_missing.len()
                );
            }
            let non_canonical: Vec<&str> = summary
                .listing_non_canonical
                .iter()
                .chain(&summary.chapter_non_canonical)
                .map(String::as_str)
                .collect();
            if !non_canonical.is_empty() {
                println!("non-canonical (dropped): {}", non_canonical.join(", "));
            }
            let m = &summary.merge;
            println!(
                "merged: {} combined, {} primary only, {} secondary only, {} missing",
                m.combined,
                m.primary_only,
                m.secondary_only,
                m.missing.len()
            );
            if !m.is_complete() {
                println!("  missing: {}", m.missing.join(", "));
            }
            print_outputs(&summary.outputs);
        }
        Command::Crosses { .. } => {
            let summary = pipelines::run_crosses(&config).map_err(tagged)?;
            let s = &summary.stats;
            println!(
                "crosses: {} records (expected {}), {} headers, {} unmatched, {} rejected",
                summary.report.total,
                summary.report.expected_total,
                s.headers_seen,
                s.skipped_headers(),
                s.rejected_gates
            );
            println!(
                "  dedup by {}: dropped {}; typed would keep {}, gates would keep {}",
                s.dedup_key.name(),
                s.duplicates_dropped,
                s.unique_typed,
                s.unique_gates
            );
            if !summary.report.is_clean() {
                println!(
                    "  {} name discrepancies, {} key collisions",
                    summary.report.discrepancies.len(),
                    summary.report.key_collisions.len()
                );
            }
            print_outputs(&summary.outputs);
        }
        Command::Connections => {
            let summary = pipelines::run_connections(&config).map_err(tagged)?;
            println!(
                "{} connections over {} channels",
                summary.connection_count, summary.channel_count
            );
            println!("  motor → throat: {}", summary.motor_to_throat.join(", "));
            print_outputs(&summary.outputs);
        }
        Command::Dedup => {
            let summary = report_errors(pipelines::run_dedup(&config).map_err(tagged)?);
            println!(
                "kept {} of {} files, {} duplicates, {} copied{}",
                summary.outcome.kept.len(),
                summary.outcome.total_files,
                summary.outcome.duplicates.len(),
                summary.copied.completed,
                dry_suffix(summary.copied.dry_run)
            );
            print_outputs(&summary.outputs);
        }
        Command::Classify { .. } => {
            let summary = report_errors(pipelines::run_classify(&config).map_err(tagged)?);
            println!(
                "{}: {} paid, {} free, {} moved{}",
                summary.policy,
                summary.paid,
                summary.free,
                summary.moved.completed,
                dry_suffix(summary.moved.dry_run)
            );
            print_outputs(&summary.outputs);
        }
        Command::Recheck => {
            let summary = report_errors(pipelines::run_recheck(&config).map_err(tagged)?);
            let outcome = &summary.outcome;
            println!(
                "{} confirmed paid, {} moved back to free{}",
                outcome.report.paid_count(),
                outcome.report.free_count(),
                dry_suffix(outcome.moved.data.dry_run)
            );
            print_outputs(&summary.outputs);
        }
        Command::CleanCopies => {
            let summary = report_errors(pipelines::run_clean_copies(&config).map_err(tagged)?);
            println!(
                "{} files, {} copies deleted, {} different-size copies kept{}",
                summary.plan.total_files,
                summary.deleted.completed,
                summary.plan.kept.len(),
                dry_suffix(summary.deleted.dry_run)
            );
            print_outputs(&summary.outputs);
        }
        Command::Compare => {
            let summary = report_errors(pipelines::run_compare(&config).map_err(tagged)?);
            let d = &summary.diff;
            println!(
                "old {} / new {} (free {}, paid {}): {} added, {} missing",
                d.old_count,
                d.new_total,
                d.free_count,
                d.paid_count,
                d.added.len(),
                d.missing.len()
            );
            print_outputs(&summary.outputs);
        }
        Command::Census => {
            let summary = pipelines::run_census(&config).map_err(tagged)?;
            let t = &summary.census.totals;
            println!(
                "{} files ({} txt, {} md, {} docx), {}, {} unreadable",
                t.total_files,
                t.txt_files,
                t.md_files,
                t.docx_files,
                hdkb_analysis::reports::format_size(t.total_size),
                t.unreadable
            );
            print_outputs(&summary.outputs);
        }
    }
    Ok(())
}

fn load_config(root: &Path, overrides: &CliOverrides) -> anyhow::Result<HdkbConfig> {
    HdkbConfig::load(root, Some(overrides))
        .map_err(|e| anyhow::anyhow!(e.tagged()))
        .with_context(|| format!("loading configuration from {}", root.display()))
}

fn tagged(error: PipelineError) -> anyhow::Error {
    anyhow::anyhow!(error.tagged())
}

fn dry_suffix(dry_run: bool) -> &'static str {
    if dry_run {
        " (dry run)"
    } else {
        ""
    }
}

fn main() -> ExitCode {
    hdkb_core::tracing::init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
