//! Front-matter fields read by direct pattern search.

use once_cell::sync::Lazy;
use regex::Regex;

static SOURCE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"source_url:\s*"([^"]+)""#).unwrap());
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"title:\s*"([^"]+)""#).unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub source_url: Option<String>,
    pub title: Option<String>,
}

/// First `source_url: "…"` and `title: "…"` anywhere in the content.
pub fn extract(content: &str) -> FrontMatter {
    FrontMatter {
        source_url: SOURCE_URL.captures(content).map(|c| c[1].to_string()),
        title: TITLE.captures(content).map(|c| c[1].to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_fields() {
        let content = "---\ntitle: \"人类图入门\"\nsource_url:  \"https://mp.weixin.qq.com/s/abc\"\n---\n正文";
        let fm = extract(content);
        assert_eq!(fm.title.as_deref(), Some("人类图入门"));
        assert_eq!(fm.source_url.as_deref(), Some("https://mp.weixin.qq.com/s/abc"));
    }

    #[test]
    fn test_missing_and_empty_fields() {
        assert_eq!(extract("正文而已"), FrontMatter::default());
        // Empty quotes do not count as a value.
        assert_eq!(extract("source_url: \"\"").source_url, None);
    }

    #[test]
    fn test_unquoted_value_is_ignored() {
        assert_eq!(extract("source_url: https://example.com").source_url, None);
    }
}
