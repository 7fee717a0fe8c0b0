//! Incarnation-cross extraction and reconciliation.
//!
//! Extraction is a single regex pass producing records in discovery order.
//! Reconciliation checks the result against the 16×4 / 32×2 / 64×1 totals
//! and never fails the run.

pub mod extractor;
pub mod reconcile;
pub mod types;

pub use extractor::{clean_name, extract_crosses};
pub use reconcile::{
    juxtaposition_coverage, key_collisions, reconcile, Discrepancy, JuxtapositionCoverage,
    KeyCollision, NameGroup, ReconciliationReport, TypeSummary,
};
pub use types::{CrossExtraction, CrossGates, CrossRecord, CrossStats, CrossType};
