use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::{
    domain::{EvaluationRequest, TabId, TriggerKind},
    infrastructure::shutdown::ShutdownListener,
    notify::NotificationCoordinator,
    pipeline::UrlEvaluator,
};

use super::events::BrowserEvent;

/// Root of the pipeline: consumes host events line by line and routes them.
/// Navigations and hovers head into the debounced evaluator; tab lifecycle
/// and notification clicks go straight to the coordinator.
pub struct EventRouter {
    evaluator: Arc<UrlEvaluator>,
    coordinator: Arc<NotificationCoordinator>,
}

impl EventRouter {
    pub fn new(evaluator: Arc<UrlEvaluator>, coordinator: Arc<NotificationCoordinator>) -> Self {
        Self {
            evaluator,
            coordinator,
        }
    }

    pub async fn run(self, shutdown: ShutdownListener) -> Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin()), shutdown)
            .await
    }

    pub async fn run_with<R>(self, reader: R, mut shutdown: ShutdownListener) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = shutdown.notified() => {
                    tracing::info!(target: "intercept", "event intake stopped");
                    return Ok(());
                }
            };
            let Some(line) = line else {
                // EOF: the host hung up.
                tracing::info!(target: "intercept", "event stream closed by host");
                return Ok(());
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<BrowserEvent>(line) {
                Ok(event) => self.dispatch(event).await,
                Err(err) => {
                    tracing::warn!(target: "intercept", error = %err, "malformed event line skipped")
                }
            }
        }
    }

    async fn dispatch(&self, event: BrowserEvent) {
        match event {
            BrowserEvent::Navigation { tab_id, url } => {
                tracing::debug!(target: "intercept", %url, tab_id, "navigation observed");
                self.evaluator.clone().submit(EvaluationRequest {
                    url,
                    tab: TabId(tab_id),
                    trigger: TriggerKind::Navigation,
                });
            }
            BrowserEvent::LinkHover { tab_id, url } => {
                tracing::debug!(target: "intercept", %url, tab_id, "hovered link reported");
                self.evaluator.clone().submit(EvaluationRequest {
                    url,
                    tab: TabId(tab_id),
                    trigger: TriggerKind::LinkHover,
                });
            }
            BrowserEvent::TabClosed { tab_id } => {
                self.coordinator.on_tab_closed(TabId(tab_id));
            }
            BrowserEvent::NotificationClicked { id } => {
                self.coordinator.on_notification_clicked(&id).await;
            }
        }
    }
}
