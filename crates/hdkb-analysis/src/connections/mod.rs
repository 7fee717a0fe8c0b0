//! Center-connection index: which channels join which pair of centers.

pub mod builder;
pub mod types;

pub use builder::build;
pub use types::{CenterConnection, CenterConnectionIndex, ChannelWithCenters, ConnectedChannel};
