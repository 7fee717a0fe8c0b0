//! Gate reference tables: gate → center, gate → opposite, canonical channels.
//!
//! Loaded once from a versioned TOML data file and validated at load time,
//! so every lookup afterwards is infallible.

pub mod loader;
pub mod types;

pub use types::{ChannelKey, GateCenterRecord, GateInfo, GateOppositeRecord, GateReference};
