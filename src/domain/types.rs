use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Browser tab identifier. `-1` is the host's sentinel for "no tab", e.g. a
/// request that did not originate from a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl TabId {
    pub const NONE: TabId = TabId(-1);

    pub fn is_real(self) -> bool {
        self.0 != -1
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What caused a URL to be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// The tab navigated to the URL directly.
    Navigation,
    /// A content script reported a hovered link (mail pages and the like).
    /// No navigation is occurring, so blocking never applies here.
    LinkHover,
}

/// Risk tier derived from the weighted score and the configured thresholds.
/// Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Safe,
    Suspicious,
    Dangerous,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Safe => "safe",
            RiskTier::Suspicious => "suspicious",
            RiskTier::Dangerous => "dangerous",
        }
    }
}

/// Which trigger kinds honor a tab's cooling window. The two deployed
/// background-script revisions disagreed, so both behaviors stay selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionPolicy {
    /// Only hovered-link notifications are withheld for a cooling tab;
    /// direct navigations always notify.
    EmailOnly,
    /// Every notification kind is withheld for a cooling tab.
    #[default]
    AllKinds,
}

impl SuppressionPolicy {
    pub fn suppresses(self, trigger: TriggerKind) -> bool {
        match self {
            SuppressionPolicy::EmailOnly => trigger == TriggerKind::LinkHover,
            SuppressionPolicy::AllKinds => true,
        }
    }
}

impl FromStr for SuppressionPolicy {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "email_only" => Ok(SuppressionPolicy::EmailOnly),
            "all_kinds" => Ok(SuppressionPolicy::AllKinds),
            _ => Err(()),
        }
    }
}

/// One request flowing through the pipeline: the URL plus where it came from.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub url: String,
    pub tab: TabId,
    pub trigger: TriggerKind,
}
