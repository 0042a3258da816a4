use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::domain::TabId;

use super::templates::Notification;

/// Local resource a blocked tab is sent to. The page itself (close-tab
/// affordance, about:blank fallback) belongs to the host extension.
pub const BLOCKED_VIEW: &str = "blocked.html";

/// Everything the pipeline asks of the embedding browser. The host performs
/// these; the pipeline only decides when.
#[async_trait]
pub trait BrowserSurface: Send + Sync {
    async fn notify(&self, note: &Notification) -> Result<()>;
    async fn clear_notification(&self, id: &str) -> Result<()>;
    async fn redirect_tab(&self, tab: TabId, target: &str) -> Result<()>;
    async fn open_details(&self, id: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HostCommand<'a> {
    Notification {
        id: &'a str,
        severity: &'a str,
        title: &'a str,
        message: &'a str,
    },
    ClearNotification {
        id: &'a str,
    },
    RedirectTab {
        tab_id: TabId,
        target: &'a str,
    },
    OpenDetails {
        id: &'a str,
        body: &'a str,
    },
}

/// JSON-line command writer on stdout; the host glue executes each line
/// against the real browser APIs. Diagnostics go to stderr and the log file,
/// never stdout.
pub struct StdioSurface {
    out: tokio::sync::Mutex<tokio::io::Stdout>,
}

impl StdioSurface {
    pub fn new() -> Self {
        Self {
            out: tokio::sync::Mutex::new(tokio::io::stdout()),
        }
    }

    async fn send(&self, command: HostCommand<'_>) -> Result<()> {
        let mut line = serde_json::to_vec(&command)?;
        line.push(b'\n');
        let mut out = self.out.lock().await;
        out.write_all(&line).await?;
        out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl BrowserSurface for StdioSurface {
    async fn notify(&self, note: &Notification) -> Result<()> {
        self.send(HostCommand::Notification {
            id: &note.id,
            severity: note.tier.as_str(),
            title: &note.title,
            message: &note.message,
        })
        .await
    }

    async fn clear_notification(&self, id: &str) -> Result<()> {
        self.send(HostCommand::ClearNotification { id }).await
    }

    async fn redirect_tab(&self, tab: TabId, target: &str) -> Result<()> {
        self.send(HostCommand::RedirectTab {
            tab_id: tab,
            target,
        })
        .await
    }

    async fn open_details(&self, id: &str, body: &str) -> Result<()> {
        self.send(HostCommand::OpenDetails { id, body }).await
    }
}
