//! Top-level hdkb configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    ArticlesConfig, ClassifyConfig, CrossDedupKey, CrossesConfig, PathsConfig, ReferenceConfig,
};
use crate::constants::{PROJECT_CONFIG_FILE, USER_CONFIG_DIR};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`HDKB_*`)
/// 3. Project config (`hdkb.toml` in the project root)
/// 4. User config (`~/.hdkb/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HdkbConfig {
    pub paths: PathsConfig,
    pub reference: ReferenceConfig,
    pub crosses: CrossesConfig,
    pub articles: ArticlesConfig,
    pub classify: ClassifyConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub cross_dedup_key: Option<CrossDedupKey>,
    pub classify_policy: Option<String>,
}

impl HdkbConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(path = %user_config_path.display(), error = %err, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &HdkbConfig) -> Result<(), ConfigError> {
        for (field, value) in [
            ("classify.policy", &config.classify.policy),
            ("classify.recheck_policy", &config.classify.recheck_policy),
        ] {
            if let Some(name) = value {
                if name.trim().is_empty() {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must not be empty".to_string(),
                    });
                }
            }
        }
        if config.classify.context_chars == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "classify.context_chars".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref dir) = config.paths.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "paths.output_dir".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.hdkb/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(USER_CONFIG_DIR).join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut HdkbConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: HdkbConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut HdkbConfig, other: &HdkbConfig) {
        // Paths
        let paths = &other.paths;
        for (dst, src) in [
            (&mut base.paths.knowledge_base, &paths.knowledge_base),
            (&mut base.paths.crosses_source, &paths.crosses_source),
            (&mut base.paths.channel_listing, &paths.channel_listing),
            (&mut base.paths.channel_chapter, &paths.channel_chapter),
            (&mut base.paths.articles_source, &paths.articles_source),
            (&mut base.paths.articles_output, &paths.articles_output),
            (&mut base.paths.paid_dir, &paths.paid_dir),
            (&mut base.paths.free_dir, &paths.free_dir),
            (&mut base.paths.old_articles_dir, &paths.old_articles_dir),
            (&mut base.paths.copies_dir, &paths.copies_dir),
            (&mut base.paths.output_dir, &paths.output_dir),
        ] {
            if src.is_some() {
                *dst = src.clone();
            }
        }

        // Reference
        if other.reference.gate_table.is_some() {
            base.reference.gate_table = other.reference.gate_table.clone();
        }

        // Crosses
        if other.crosses.dedup_key.is_some() {
            base.crosses.dedup_key = other.crosses.dedup_key;
        }

        // Articles
        if other.articles.collection_prefix.is_some() {
            base.articles.collection_prefix = other.articles.collection_prefix.clone();
        }
        if !other.articles.skip_files.is_empty() {
            base.articles.skip_files = other.articles.skip_files.clone();
        }
        if other.articles.dry_run.is_some() {
            base.articles.dry_run = other.articles.dry_run;
        }

        // Classify
        if other.classify.policy.is_some() {
            base.classify.policy = other.classify.policy.clone();
        }
        if other.classify.recheck_policy.is_some() {
            base.classify.recheck_policy = other.classify.recheck_policy.clone();
        }
        if other.classify.policy_file.is_some() {
            base.classify.policy_file = other.classify.policy_file.clone();
        }
        if other.classify.context_chars.is_some() {
            base.classify.context_chars = other.classify.context_chars;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `HDKB_OUTPUT_DIR`, `HDKB_CROSSES_DEDUP_KEY`, etc. Unparseable values are ignored.
    fn apply_env_overrides(config: &mut HdkbConfig) {
        if let Some(val) = std::env::var_os("HDKB_OUTPUT_DIR") {
            config.paths.output_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = std::env::var_os("HDKB_KNOWLEDGE_BASE") {
            config.paths.knowledge_base = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("HDKB_CROSSES_DEDUP_KEY") {
            match val.parse::<CrossDedupKey>() {
                Ok(key) => config.crosses.dedup_key = Some(key),
                Err(message) => tracing::warn!(%message, "ignoring HDKB_CROSSES_DEDUP_KEY"),
            }
        }
        if let Ok(val) = std::env::var("HDKB_ARTICLES_COLLECTION_PREFIX") {
            config.articles.collection_prefix = Some(val);
        }
        if let Ok(val) = std::env::var("HDKB_ARTICLES_DRY_RUN") {
            if let Ok(v) = val.parse::<bool>() {
                config.articles.dry_run = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HDKB_CLASSIFY_POLICY") {
            config.classify.policy = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut HdkbConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.output_dir {
            config.paths.output_dir = Some(v.clone());
        }
        if let Some(v) = cli.dry_run {
            config.articles.dry_run = Some(v);
        }
        if let Some(v) = cli.cross_dedup_key {
            config.crosses.dedup_key = Some(v);
        }
        if let Some(ref v) = cli.classify_policy {
            config.classify.policy = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
