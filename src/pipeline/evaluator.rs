use std::sync::Arc;

use crate::{
    classifier::ClassifierProvider,
    db::settings::SettingsRepository,
    domain::EvaluationRequest,
    notify::NotificationCoordinator,
};

use super::{cache::ResultCache, debounce::UrlDebouncer, whitelist};

/// The evaluation chain behind every intercepted event: fresh settings read,
/// whitelist short-circuit, cache lookup, classifier call on a miss, then
/// hand-off to the notification coordinator. Any failure abandons just this
/// evaluation; the next triggering event retries naturally.
pub struct UrlEvaluator {
    settings: SettingsRepository,
    cache: Arc<ResultCache>,
    classifier: Arc<dyn ClassifierProvider>,
    coordinator: Arc<NotificationCoordinator>,
    debouncer: Arc<UrlDebouncer>,
}

impl UrlEvaluator {
    pub fn new(
        settings: SettingsRepository,
        cache: Arc<ResultCache>,
        classifier: Arc<dyn ClassifierProvider>,
        coordinator: Arc<NotificationCoordinator>,
        debouncer: Arc<UrlDebouncer>,
    ) -> Arc<Self> {
        Arc::new(Self {
            settings,
            cache,
            classifier,
            coordinator,
            debouncer,
        })
    }

    /// Entry point for intercepted events; the whole chain sits behind the
    /// per-URL debounce window.
    pub fn submit(self: Arc<Self>, request: EvaluationRequest) {
        let url = request.url.clone();
        let evaluator = self.clone();
        self.debouncer.trigger(&url, move || async move {
            evaluator.evaluate(request).await;
        });
    }

    pub async fn evaluate(&self, request: EvaluationRequest) {
        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(err) => {
                tracing::error!(
                    target: "pipeline",
                    error = %err,
                    url = %request.url,
                    "settings read failed; evaluation abandoned"
                );
                return;
            }
        };

        if whitelist::is_whitelisted(&request.url, &settings) {
            tracing::debug!(target: "pipeline", url = %request.url, "url whitelisted; skipping");
            return;
        }

        if let Some(verdict) = self.cache.get(&request.url) {
            tracing::debug!(target: "pipeline", url = %request.url, "cache hit");
            self.coordinator.deliver(&request, &verdict, &settings).await;
            return;
        }

        let verdict = match self.classifier.evaluate(&request.url).await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(
                    target: "pipeline",
                    error = %err,
                    url = %request.url,
                    "classification failed; evaluation abandoned"
                );
                return;
            }
        };

        self.cache.put(&request.url, verdict.clone());
        self.coordinator.deliver(&request, &verdict, &settings).await;
    }
}
