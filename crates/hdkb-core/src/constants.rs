//! Shared constants for the hdkb toolkit.

// ---- Domain totals ----

/// Number of gates in the system.
pub const GATE_COUNT: usize = 64;

/// Number of energy centers.
pub const CENTER_COUNT: usize = 9;

/// Number of canonically recognized channels.
pub const CANONICAL_CHANNEL_COUNT: usize = 36;

/// Total incarnation crosses: 16×4 + 32×2 + 64×1.
pub const CROSS_TOTAL: usize = 192;

// ---- Compiled defaults ----

/// Default directory for generated JSON tables and reports.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Project-level config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "hdkb.toml";

/// User-level config directory name under the home directory.
pub const USER_CONFIG_DIR: &str = ".hdkb";

/// Default article collection prefix (collections are named after the author).
pub const DEFAULT_COLLECTION_PREFIX: &str = "王骁老师";

/// Files never treated as articles.
pub const DEFAULT_SKIP_FILES: [&str; 1] = ["README.md"];

/// Default policy for the first classification pass.
pub const DEFAULT_CLASSIFY_POLICY: &str = "loose";

/// Default policy for the recheck pass.
pub const DEFAULT_RECHECK_POLICY: &str = "strict";

/// Characters of context shown on each side of a paid marker.
pub const DEFAULT_CONTEXT_CHARS: usize = 20;

/// Default log filter when `HDKB_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "hdkb=info";

/// Placeholder name for canonical channels that no source provided.
pub const MISSING_CHANNEL_NAME: &str = "【缺失】";

/// Suffixes Windows Explorer appends to duplicated files.
pub const COPY_SUFFIXES: [&str; 2] = [" - 副本", "- 副本"];
