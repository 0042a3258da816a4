use serde::Deserialize;

/// One JSON line from the embedding host. Navigations come from the host's
/// request listener, hovers from the content script, the rest from UI
/// callbacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserEvent {
    Navigation { tab_id: i64, url: String },
    LinkHover { tab_id: i64, url: String },
    TabClosed { tab_id: i64 },
    NotificationClicked { id: String },
}
