//! Versioned keyword policies and the compiled paid-article classifier.

use std::path::Path;

use hdkb_core::errors::ArticleError;
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};

static BUILTIN_POLICIES: &str = include_str!("../../data/paid_policies.toml");

/// A named, versioned list of patterns. Any match marks an article paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordPolicy {
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub description: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicySet {
    #[serde(default)]
    pub version: u32,
    pub policies: Vec<KeywordPolicy>,
}

impl PolicySet {
    pub fn builtin() -> Result<Self, ArticleError> {
        Self::from_toml_str(BUILTIN_POLICIES, "<builtin>")
    }

    pub fn from_file(path: &Path) -> Result<Self, ArticleError> {
        let content = std::fs::read_to_string(path).map_err(|source| ArticleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ArticleError> {
        toml::from_str(content).map_err(|e| ArticleError::InvalidPolicy {
            policy: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Result<&KeywordPolicy, ArticleError> {
        self.policies
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ArticleError::UnknownPolicy {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.policies.iter().map(|p| p.name.as_str()).collect()
    }

    /// Look up and compile in one step.
    pub fn classifier(&self, name: &str) -> Result<PaidClassifier, ArticleError> {
        PaidClassifier::compile(self.get(name)?)
    }
}

/// Where a paid marker was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaidEvidence {
    pub pattern: String,
    /// Surrounding text with line breaks flattened to spaces.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Paid(PaidEvidence),
    Free,
}

impl Verdict {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid(_))
    }
}

/// A policy compiled into case-insensitive regexes.
#[derive(Debug, Clone)]
pub struct PaidClassifier {
    name: String,
    version: u32,
    set: RegexSet,
    patterns: Vec<Regex>,
}

impl PaidClassifier {
    pub fn compile(policy: &KeywordPolicy) -> Result<Self, ArticleError> {
        let invalid = |message: String| ArticleError::InvalidPolicy {
            policy: policy.name.clone(),
            message,
        };
        if policy.patterns.is_empty() {
            return Err(invalid("policy has no patterns".to_string()));
        }
        let set = RegexSetBuilder::new(&policy.patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| invalid(e.to_string()))?;
        let patterns = policy
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| invalid(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: policy.name.clone(),
            version: policy.version,
            set,
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_paid(&self, content: &str) -> bool {
        self.set.is_match(content)
    }

    /// First matching pattern in policy order, with `context_chars` characters
    /// of text on each side.
    pub fn classify(&self, content: &str, context_chars: usize) -> Verdict {
        let Some(idx) = self.set.matches(content).iter().next() else {
            return Verdict::Free;
        };
        let regex = &self.patterns[idx];
        let context = regex
            .find(content)
            .map(|m| context_around(content, m.start(), m.end(), context_chars))
            .unwrap_or_default();
        Verdict::Paid(PaidEvidence {
            pattern: regex.as_str().to_string(),
            context,
        })
    }
}

fn context_around(content: &str, start: usize, end: usize, chars: usize) -> String {
    let from = content[..start]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let to = content[end..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| end + i)
        .unwrap_or(content.len());
    content[from..to]
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
