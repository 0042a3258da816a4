use std::{
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use chrono::Utc;

use crate::{
    db::evidence::EvidenceRepository,
    domain::{EvaluationRequest, RiskTier, Settings, SuppressionPolicy, TabId, TriggerKind, Verdict},
    scoring,
    tasks::ExpiryScheduler,
};

use super::{
    details,
    suppression::SuppressionState,
    surface::{BrowserSurface, BLOCKED_VIEW},
    templates,
};

/// Turns evaluation results into user-visible alerts: scores the verdict,
/// honors per-tab suppression, stores evidence behind each alert, and pulls
/// the navigation brake when configured.
pub struct NotificationCoordinator {
    surface: Arc<dyn BrowserSurface>,
    suppression: Arc<SuppressionState>,
    evidence: EvidenceRepository,
    scheduler: Arc<ExpiryScheduler>,
    policy: SuppressionPolicy,
    evidence_ttl: Duration,
}

impl NotificationCoordinator {
    pub fn new(
        surface: Arc<dyn BrowserSurface>,
        suppression: Arc<SuppressionState>,
        evidence: EvidenceRepository,
        scheduler: Arc<ExpiryScheduler>,
        policy: SuppressionPolicy,
        evidence_ttl: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            surface,
            suppression,
            evidence,
            scheduler,
            policy,
            evidence_ttl,
        })
    }

    pub async fn deliver(&self, request: &EvaluationRequest, verdict: &Verdict, settings: &Settings) {
        let score = scoring::score(verdict);
        let tier = scoring::classify(score, settings);
        tracing::info!(
            target: "notify",
            url = %request.url,
            score,
            tier = tier.as_str(),
            "risk evaluated"
        );

        if self.policy.suppresses(request.trigger) && self.suppression.is_cooling(request.tab) {
            tracing::debug!(
                target: "notify",
                tab = %request.tab,
                url = %request.url,
                "tab cooling down; notification withheld"
            );
            return;
        }

        let id = notification_id();
        self.store_evidence(&id, request, verdict).await;

        let note = templates::render(tier, request.trigger, &request.url, &id);
        if let Err(err) = self.surface.notify(&note).await {
            tracing::error!(target: "notify", error = %err, id = %id, "surface rejected alert");
            return;
        }

        if tier == RiskTier::Dangerous
            && settings.block_enabled
            && request.trigger == TriggerKind::Navigation
            && request.tab.is_real()
        {
            match self.surface.redirect_tab(request.tab, BLOCKED_VIEW).await {
                Ok(()) => tracing::warn!(
                    target: "notify",
                    url = %request.url,
                    tab = %request.tab,
                    "navigation blocked"
                ),
                Err(err) => tracing::error!(
                    target: "notify",
                    error = %err,
                    tab = %request.tab,
                    "failed to block navigation"
                ),
            }
        }

        // Events without a real tab (host sentinel -1) have nothing to cool.
        if request.tab.is_real() {
            self.suppression.engage(request.tab);
        }
    }

    /// The alert is still worth showing when evidence cannot be written;
    /// only the detail view degrades to its fallback.
    async fn store_evidence(&self, id: &str, request: &EvaluationRequest, verdict: &Verdict) {
        if let Err(err) = self.evidence.put(id, &request.url, verdict).await {
            tracing::error!(target: "notify", error = %err, id, "failed to store evidence");
            return;
        }

        let evidence = self.evidence.clone();
        let expiring = id.to_string();
        self.scheduler.schedule(self.evidence_ttl, move || async move {
            match evidence.delete(&expiring).await {
                Ok(true) => {
                    tracing::debug!(target: "notify", id = %expiring, "evidence expired")
                }
                Ok(false) => {}
                Err(err) => tracing::warn!(
                    target: "notify",
                    error = %err,
                    id = %expiring,
                    "evidence cleanup failed"
                ),
            }
        });
    }

    /// Notification clicked: open the detail view for its evidence, then
    /// dismiss the notification. Expired evidence renders the fallback.
    pub async fn on_notification_clicked(&self, id: &str) {
        let record = match self.evidence.get(id).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(target: "notify", error = %err, id, "evidence read failed");
                None
            }
        };
        let body = details::render(record.as_ref());
        if let Err(err) = self.surface.open_details(id, &body).await {
            tracing::error!(target: "notify", error = %err, id, "failed to open detail view");
        }
        if let Err(err) = self.surface.clear_notification(id).await {
            tracing::warn!(target: "notify", error = %err, id, "failed to clear notification");
        }
    }

    pub fn on_tab_closed(&self, tab: TabId) {
        self.suppression.clear(tab);
        tracing::debug!(target: "notify", tab = %tab, "tab closed; suppression cleared");
    }
}

static NONCE: AtomicU64 = AtomicU64::new(0);

/// `phishing-<unix millis>-<base36 suffix>`. The suffix mixes the sub-second
/// clock with a process-wide counter so ids stay unique within a burst.
fn notification_id() -> String {
    let now = Utc::now();
    let nonce = NONCE.fetch_add(1, Ordering::Relaxed);
    let seed = (now.timestamp_subsec_nanos() as u64)
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(nonce.wrapping_mul(0x517c_c1b7_2722_0a95) ^ 0x2545_f491_4f6c_dd1d);
    format!("phishing-{}-{}", now.timestamp_millis(), base36(seed))
}

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = String::new();
    loop {
        out.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
        if value == 0 || out.len() == 9 {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{evidence::EvidenceRepository, memory_pool},
        domain::TabId,
        notify::details::NO_DATA,
        testing::{RecordingSurface, SurfaceCall},
    };

    const EVIDENCE_TTL: Duration = Duration::from_secs(300);

    struct Fixture {
        coordinator: Arc<NotificationCoordinator>,
        surface: Arc<RecordingSurface>,
        evidence: EvidenceRepository,
    }

    async fn fixture(policy: SuppressionPolicy) -> Fixture {
        let surface = Arc::new(RecordingSurface::new());
        let scheduler = ExpiryScheduler::new();
        let evidence = EvidenceRepository::new(memory_pool().await);
        let suppression = SuppressionState::new(Duration::from_secs(300), scheduler.clone());
        let coordinator = NotificationCoordinator::new(
            surface.clone(),
            suppression,
            evidence.clone(),
            scheduler,
            policy,
            EVIDENCE_TTL,
        );
        Fixture {
            coordinator,
            surface,
            evidence,
        }
    }

    fn navigation(url: &str, tab: i64) -> EvaluationRequest {
        EvaluationRequest {
            url: url.to_string(),
            tab: TabId(tab),
            trigger: TriggerKind::Navigation,
        }
    }

    fn hover(url: &str, tab: i64) -> EvaluationRequest {
        EvaluationRequest {
            url: url.to_string(),
            tab: TabId(tab),
            trigger: TriggerKind::LinkHover,
        }
    }

    fn dangerous_verdict(url: &str) -> Verdict {
        let mut verdict = Verdict::empty(url, "bad.example");
        verdict.is_in_openphish = Some(true);
        verdict.uses_dynamic_dns = Some(true);
        verdict
    }

    #[tokio::test(start_paused = true)]
    async fn identical_navigations_within_window_notify_once() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let settings = Settings::default();
        let verdict = dangerous_verdict("http://bad.example/");

        let request = navigation("http://bad.example/", 3);
        fx.coordinator.deliver(&request, &verdict, &settings).await;
        fx.coordinator.deliver(&request, &verdict, &settings).await;

        assert_eq!(fx.surface.notification_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn suppression_expires_and_notifies_again() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let settings = Settings::default();
        let verdict = dangerous_verdict("http://bad.example/");

        let request = navigation("http://bad.example/", 3);
        fx.coordinator.deliver(&request, &verdict, &settings).await;
        tokio::time::sleep(Duration::from_secs(301)).await;
        fx.coordinator.deliver(&request, &verdict, &settings).await;

        assert_eq!(fx.surface.notification_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn email_only_policy_lets_navigations_through_a_cooling_tab() {
        let fx = fixture(SuppressionPolicy::EmailOnly).await;
        let settings = Settings::default();
        let verdict = dangerous_verdict("http://bad.example/");

        fx.coordinator
            .deliver(&navigation("http://bad.example/", 3), &verdict, &settings)
            .await;
        fx.coordinator
            .deliver(&navigation("http://bad.example/", 3), &verdict, &settings)
            .await;
        fx.coordinator
            .deliver(&hover("http://bad.example/", 3), &verdict, &settings)
            .await;

        // Two navigations notify; the hover on the cooling tab is withheld.
        assert_eq!(fx.surface.notification_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dangerous_navigation_blocks_when_enabled() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let settings = Settings {
            block_enabled: true,
            ..Settings::default()
        };
        let verdict = dangerous_verdict("http://bad.example/");

        fx.coordinator
            .deliver(&navigation("http://bad.example/", 3), &verdict, &settings)
            .await;

        assert_eq!(fx.surface.notification_count(), 1);
        assert_eq!(
            fx.surface.redirects(),
            vec![(TabId(3), BLOCKED_VIEW.to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hovered_links_never_block() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let settings = Settings {
            block_enabled: true,
            ..Settings::default()
        };
        let verdict = dangerous_verdict("http://bad.example/");

        fx.coordinator
            .deliver(&hover("http://bad.example/", 3), &verdict, &settings)
            .await;

        assert_eq!(fx.surface.notification_count(), 1);
        assert!(fx.surface.redirects().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn safe_verdict_notifies_without_blocking() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let settings = Settings {
            block_enabled: true,
            ..Settings::default()
        };
        let verdict = Verdict::empty("http://fine.example/", "fine.example");

        fx.coordinator
            .deliver(&navigation("http://fine.example/", 4), &verdict, &settings)
            .await;

        let notes = fx.surface.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].tier, RiskTier::Safe);
        assert!(fx.surface.redirects().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn click_opens_details_and_clears_the_notification() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let verdict = dangerous_verdict("http://bad.example/");
        fx.coordinator
            .deliver(&navigation("http://bad.example/", 3), &verdict, &Settings::default())
            .await;

        let note = fx.surface.notifications().remove(0);
        fx.coordinator.on_notification_clicked(&note.id).await;

        let calls = fx.surface.calls();
        assert!(calls.iter().any(|call| matches!(
            call,
            SurfaceCall::OpenDetails { id, body }
                if *id == note.id && body.contains("http://bad.example/")
        )));
        assert!(calls
            .iter()
            .any(|call| matches!(call, SurfaceCall::Clear(id) if *id == note.id)));
    }

    #[tokio::test(start_paused = true)]
    async fn click_after_evidence_expiry_renders_the_fallback() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let verdict = dangerous_verdict("http://bad.example/");
        fx.coordinator
            .deliver(&navigation("http://bad.example/", 3), &verdict, &Settings::default())
            .await;

        let note = fx.surface.notifications().remove(0);
        fx.evidence.delete(&note.id).await.unwrap();
        fx.coordinator.on_notification_clicked(&note.id).await;

        assert!(fx.surface.calls().iter().any(|call| matches!(
            call,
            SurfaceCall::OpenDetails { body, .. } if body == NO_DATA
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_tab_reopens_the_notification_path() {
        let fx = fixture(SuppressionPolicy::AllKinds).await;
        let settings = Settings::default();
        let verdict = dangerous_verdict("http://bad.example/");

        let request = navigation("http://bad.example/", 3);
        fx.coordinator.deliver(&request, &verdict, &settings).await;
        fx.coordinator.on_tab_closed(TabId(3));
        fx.coordinator.deliver(&request, &verdict, &settings).await;

        assert_eq!(fx.surface.notification_count(), 2);
    }

    #[test]
    fn notification_ids_follow_the_expected_form_and_differ() {
        let a = notification_id();
        let b = notification_id();
        assert!(a.starts_with("phishing-"));
        assert_eq!(a.split('-').count(), 3);
        assert_ne!(a, b);
    }
}
