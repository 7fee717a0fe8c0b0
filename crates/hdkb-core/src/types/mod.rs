//! Domain primitives and collection re-exports.

pub mod center;
pub mod collections;
pub mod gate;

pub use center::Center;
pub use collections::{FxHashMap, FxHashSet};
pub use gate::{Gate, InvalidGate};
