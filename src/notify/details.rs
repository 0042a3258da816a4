use crate::{
    db::evidence::EvidenceRecord,
    scoring::{self, Indicator, INDICATOR_COUNT},
};

/// Fallback body when the evidence behind a notification already expired.
/// An expected race, not a fault.
pub const NO_DATA: &str = "No analysis data available.";

/// Plain-text detail view for one notification: the nine-indicator table
/// with per-row weights, plus the count-based summary percentage. The
/// percentage counts clear indicators (0–9) and is deliberately not the
/// weighted score that drives blocking.
pub fn render(record: Option<&EvidenceRecord>) -> String {
    let Some(record) = record else {
        return NO_DATA.to_string();
    };

    let mut out = format!("URL: {}\n\n", record.url);
    for indicator in Indicator::ALL {
        let set = indicator.is_set(&record.verdict);
        out.push_str(&format!(
            "{}: {} ({}, +{} points)\n",
            indicator.label(),
            if set { "Yes" } else { "No" },
            if set { "unsafe" } else { "safe" },
            indicator.weight(),
        ));
    }

    let clear = INDICATOR_COUNT - scoring::suspicious_indicator_count(&record.verdict);
    out.push_str(&format!(
        "\nSecurity score: {}% ({clear} of {INDICATOR_COUNT} indicators clear)\n",
        scoring::security_percentage(&record.verdict),
    ));
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{SuspicionDetail, Verdict};

    fn record() -> EvidenceRecord {
        let mut verdict = Verdict::empty("http://paypa1.example/", "paypa1.example");
        verdict.is_in_openphish = Some(true);
        verdict.brand_similarity = Some(SuspicionDetail::suspicious());
        EvidenceRecord {
            id: "phishing-1-abc".to_string(),
            url: "http://paypa1.example/".to_string(),
            verdict,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn renders_one_row_per_indicator() {
        let body = render(Some(&record()));
        assert!(body.starts_with("URL: http://paypa1.example/"));
        assert!(body.contains("In OpenPhish: Yes (unsafe, +4 points)"));
        assert!(body.contains("Brand Similarity Suspicious: Yes (unsafe, +3 points)"));
        assert!(body.contains("SSL Suspicious: No (safe, +2 points)"));
        assert_eq!(body.matches(" points)\n").count(), 9);
    }

    #[test]
    fn summary_uses_the_count_metric_not_the_weighted_score() {
        // Two of nine indicators set: 7/9 clear -> 77%, regardless of the
        // weighted score (7).
        let body = render(Some(&record()));
        assert!(body.contains("Security score: 77% (7 of 9 indicators clear)"));
    }

    #[test]
    fn missing_record_renders_the_fallback() {
        assert_eq!(render(None), NO_DATA);
    }
}
