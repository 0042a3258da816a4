use serde::{Deserialize, Serialize};

/// User configuration, persisted under a single fixed key.
///
/// Field names stay camelCase on the wire so the stored record matches what
/// the options page reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub block_enabled: bool,
    pub suspicious_threshold: i32,
    pub dangerous_threshold: i32,
    pub whitelist: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_enabled: false,
            suspicious_threshold: 4,
            dangerous_threshold: 7,
            whitelist: Vec::new(),
        }
    }
}

impl Settings {
    /// True when the threshold ordering invariant holds. Enforced at the
    /// settings-save boundary, never inside the pipeline.
    pub fn thresholds_ordered(&self) -> bool {
        self.suspicious_threshold < self.dangerous_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_activation_record() {
        let settings = Settings::default();
        assert!(!settings.block_enabled);
        assert_eq!(settings.suspicious_threshold, 4);
        assert_eq!(settings.dangerous_threshold, 7);
        assert!(settings.whitelist.is_empty());
        assert!(settings.thresholds_ordered());
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("blockEnabled").is_some());
        assert!(json.get("suspiciousThreshold").is_some());
        assert!(json.get("dangerousThreshold").is_some());
        assert!(json.get("whitelist").is_some());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"blockEnabled": true}"#).unwrap();
        assert!(settings.block_enabled);
        assert_eq!(settings.dangerous_threshold, 7);
    }
}
