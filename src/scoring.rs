use crate::domain::{RiskTier, Settings, Verdict};

/// Sum of all indicator weights; a verdict with every indicator set.
pub const MAX_SCORE: i32 = 22;

/// Number of independent indicators in a verdict.
pub const INDICATOR_COUNT: u32 = 9;

/// The nine indicators the classifier reports, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    OpenPhish,
    NumberSubstitution,
    SpecialCharacters,
    DomainAge,
    DynamicDns,
    Ssl,
    Redirects,
    BrandSimilarity,
    ContentAnalysis,
}

impl Indicator {
    pub const ALL: [Indicator; 9] = [
        Indicator::OpenPhish,
        Indicator::NumberSubstitution,
        Indicator::SpecialCharacters,
        Indicator::DomainAge,
        Indicator::DynamicDns,
        Indicator::Ssl,
        Indicator::Redirects,
        Indicator::BrandSimilarity,
        Indicator::ContentAnalysis,
    ];

    pub fn weight(self) -> i32 {
        match self {
            Indicator::OpenPhish => 4,
            Indicator::NumberSubstitution => 2,
            Indicator::SpecialCharacters => 1,
            Indicator::DomainAge => 2,
            Indicator::DynamicDns => 3,
            Indicator::Ssl => 2,
            Indicator::Redirects => 2,
            Indicator::BrandSimilarity => 3,
            Indicator::ContentAnalysis => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::OpenPhish => "In OpenPhish",
            Indicator::NumberSubstitution => "Number Substitution",
            Indicator::SpecialCharacters => "Special Characters",
            Indicator::DomainAge => "Domain Age Suspicious",
            Indicator::DynamicDns => "Uses Dynamic DNS",
            Indicator::Ssl => "SSL Suspicious",
            Indicator::Redirects => "Redirects Suspicious",
            Indicator::BrandSimilarity => "Brand Similarity Suspicious",
            Indicator::ContentAnalysis => "Content Analysis Suspicious",
        }
    }

    /// Whether this indicator is set in the verdict. Absent fields count as
    /// not set.
    pub fn is_set(self, verdict: &Verdict) -> bool {
        match self {
            Indicator::OpenPhish => verdict.is_in_openphish.unwrap_or(false),
            Indicator::NumberSubstitution => verdict.has_number_substitution.unwrap_or(false),
            Indicator::SpecialCharacters => verdict.has_special_characters.unwrap_or(false),
            Indicator::DomainAge => verdict
                .domain_age
                .as_ref()
                .map_or(false, |d| d.is_suspicious),
            Indicator::DynamicDns => verdict.uses_dynamic_dns.unwrap_or(false),
            Indicator::Ssl => verdict.ssl_info.as_ref().map_or(false, |d| d.is_suspicious),
            Indicator::Redirects => verdict
                .redirects
                .as_ref()
                .map_or(false, |d| d.is_suspicious),
            Indicator::BrandSimilarity => verdict
                .brand_similarity
                .as_ref()
                .map_or(false, |d| d.is_suspicious),
            Indicator::ContentAnalysis => verdict
                .content_analysis
                .as_ref()
                .map_or(false, |d| d.is_suspicious),
        }
    }
}

/// Weighted risk score, 0..=22. Drives the tier and the blocking decision.
pub fn score(verdict: &Verdict) -> i32 {
    Indicator::ALL
        .iter()
        .filter(|indicator| indicator.is_set(verdict))
        .map(|indicator| indicator.weight())
        .sum()
}

/// Number of indicators set, 0..=9. This is the display-layer metric and is
/// intentionally NOT the weighted score: the summary percentage counts
/// indicators, the blocking decision weighs them.
pub fn suspicious_indicator_count(verdict: &Verdict) -> u32 {
    Indicator::ALL
        .iter()
        .filter(|indicator| indicator.is_set(verdict))
        .count() as u32
}

/// Count-based summary percentage shown next to the indicator table:
/// `(9 - set) / 9`, rounded down.
pub fn security_percentage(verdict: &Verdict) -> u32 {
    (INDICATOR_COUNT - suspicious_indicator_count(verdict)) * 100 / INDICATOR_COUNT
}

/// Classify a weighted score against the configured thresholds.
pub fn classify(score: i32, settings: &Settings) -> RiskTier {
    if score >= settings.dangerous_threshold {
        RiskTier::Dangerous
    } else if score >= settings.suspicious_threshold {
        RiskTier::Suspicious
    } else {
        RiskTier::Safe
    }
}
