//! Read-only analysis reports over article folders and the knowledge base.

pub mod census;
pub mod compare;

pub use census::{census, format_size, CensusEntry, CensusEntryKind, CensusTotals, KnowledgeBaseCensus};
pub use compare::{
    compare_sets, url_index, AddedArticle, ArticleRef, ArticleSetDiff, MissingArticle, Tier, UrlIndex,
};
