use crate::domain::{RiskTier, TriggerKind};

/// A user-facing alert, ready for the browser surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub tier: RiskTier,
    pub title: String,
    pub message: String,
}

/// Severity- and trigger-appropriate alert text. Hovered links get link
/// wording since no navigation is taking place.
pub fn render(tier: RiskTier, trigger: TriggerKind, url: &str, id: &str) -> Notification {
    let (title, body) = match (tier, trigger) {
        (RiskTier::Dangerous, TriggerKind::Navigation) => (
            "Phishing site detected!",
            "This site was flagged as dangerous:",
        ),
        (RiskTier::Dangerous, TriggerKind::LinkHover) => {
            ("Dangerous link!", "This link may be phishing:")
        }
        (RiskTier::Suspicious, TriggerKind::Navigation) => {
            ("Suspicious site", "This site may be suspicious:")
        }
        (RiskTier::Suspicious, TriggerKind::LinkHover) => {
            ("Suspicious link", "This link may be suspicious:")
        }
        (RiskTier::Safe, TriggerKind::Navigation) => {
            ("Site looks safe", "This site was considered safe:")
        }
        (RiskTier::Safe, TriggerKind::LinkHover) => ("Link looks safe", "This link looks safe:"),
    };

    Notification {
        id: id.to_string(),
        tier,
        title: title.to_string(),
        message: format!("{body}\n{url}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_and_trigger_has_distinct_text() {
        let mut seen = Vec::new();
        for tier in [RiskTier::Safe, RiskTier::Suspicious, RiskTier::Dangerous] {
            for trigger in [TriggerKind::Navigation, TriggerKind::LinkHover] {
                let note = render(tier, trigger, "http://x.example/", "phishing-1-a");
                assert!(note.message.contains("http://x.example/"));
                assert!(!seen.contains(&note.title), "duplicate title {}", note.title);
                seen.push(note.title);
            }
        }
    }

    #[test]
    fn dangerous_navigation_reads_as_phishing_alert() {
        let note = render(
            RiskTier::Dangerous,
            TriggerKind::Navigation,
            "http://bad.example/",
            "phishing-2-b",
        );
        assert_eq!(note.title, "Phishing site detected!");
        assert_eq!(note.tier, RiskTier::Dangerous);
        assert_eq!(note.id, "phishing-2-b");
    }
}
