//! hdkb-analysis: extraction and housekeeping pipelines.
//!
//! - Reference: gate → center / opposite tables and the canonical channel list
//! - Channels: listing and chapter extractors, left-biased canonical merge
//! - Crosses: incarnation-cross extraction and reconciliation
//! - Connections: center-pair → channel index
//! - Articles: front-matter scan, URL de-duplication, paid/free classification, copy cleanup
//! - Reports: article-set comparison and knowledge-base census
//! - Pipelines: config-driven read → extract → validate → write runs

pub mod articles;
pub mod channels;
pub mod connections;
pub mod crosses;
pub mod output;
pub mod pipelines;
pub mod reference;
pub mod reports;

pub use channels::{ChannelExtraction, ChannelRecord, MergedChannel};
pub use connections::CenterConnectionIndex;
pub use crosses::{CrossExtraction, CrossRecord, CrossType, ReconciliationReport};
pub use reference::{ChannelKey, GateReference};
