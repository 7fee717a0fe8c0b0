//! Channel extraction and canonical merge.
//!
//! Two independent text sources are read with their own extractors, then
//! merged left-biased over the 36 canonical channels from the reference.

pub mod chapter;
pub mod listing;
pub mod merge;
pub mod types;

pub use chapter::extract_chapter;
pub use listing::extract_listing;
pub use merge::merge;
pub use types::{
    ChannelExtraction, ChannelLike, ChannelRecord, ChannelSource, ChannelStats, MergeSummary,
    MergedChannel,
};
