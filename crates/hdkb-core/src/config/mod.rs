//! Configuration system for hdkb.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod articles_config;
pub mod classify_config;
pub mod crosses_config;
pub mod hdkb_config;
pub mod paths_config;
pub mod reference_config;

pub use articles_config::ArticlesConfig;
pub use classify_config::ClassifyConfig;
pub use crosses_config::{CrossDedupKey, CrossesConfig};
pub use hdkb_config::{CliOverrides, HdkbConfig};
pub use paths_config::PathsConfig;
pub use reference_config::ReferenceConfig;
