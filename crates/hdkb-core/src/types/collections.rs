//! Re-exports of the hash collections used across the workspace.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use std::collections::BTreeMap;
