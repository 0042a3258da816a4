use serde::{Deserialize, Serialize};

/// Structured judgment returned by the remote classifier for one URL.
///
/// Only `url` and `domain` are guaranteed; every indicator is optional and
/// an absent indicator counts as "not set". The record is immutable once
/// received; it is cached and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub url: String,
    pub domain: String,
    #[serde(default)]
    pub is_in_openphish: Option<bool>,
    #[serde(default)]
    pub has_number_substitution: Option<bool>,
    #[serde(default)]
    pub has_special_characters: Option<bool>,
    #[serde(default)]
    pub domain_age: Option<SuspicionDetail>,
    #[serde(default)]
    pub uses_dynamic_dns: Option<bool>,
    #[serde(default)]
    pub ssl_info: Option<SuspicionDetail>,
    #[serde(default)]
    pub redirects: Option<SuspicionDetail>,
    #[serde(default)]
    pub brand_similarity: Option<SuspicionDetail>,
    #[serde(default)]
    pub content_analysis: Option<SuspicionDetail>,
}

/// Nested indicator payload. The classifier attaches free-form detail next
/// to the `is_suspicious` flag; everything beyond the flag is carried
/// opaquely for the detail view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuspicionDetail {
    #[serde(default)]
    pub is_suspicious: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SuspicionDetail {
    pub fn suspicious() -> Self {
        Self {
            is_suspicious: true,
            extra: serde_json::Map::new(),
        }
    }
}

impl Verdict {
    /// A verdict with both required fields set and every indicator absent.
    pub fn empty(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: domain.into(),
            is_in_openphish: None,
            has_number_substitution: None,
            has_special_characters: None,
            domain_age: None,
            uses_dynamic_dns: None,
            ssl_info: None,
            redirects: None,
            brand_similarity: None,
            content_analysis: None,
        }
    }
}
