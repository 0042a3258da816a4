use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::Client;
use sqlx::sqlite::SqlitePool;
use tokio::{task::JoinHandle, time::timeout};

use crate::{
    classifier::ClassifierClient,
    config::AppConfig,
    db::{self, evidence::EvidenceRepository, settings::SettingsRepository},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    intercept::EventRouter,
    notify::{NotificationCoordinator, StdioSurface, SuppressionState},
    pipeline::{ResultCache, UrlDebouncer, UrlEvaluator},
    tasks::ExpiryScheduler,
};

pub struct PhishGuardApp {
    _paths: ResolvedPaths,
    pool: SqlitePool,
    router: EventRouter,
    expiry_handle: JoinHandle<()>,
    shutdown: Shutdown,
}

impl PhishGuardApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let pool = db::init_pool(&paths.db_path).await?;

        let settings = SettingsRepository::new(pool.clone());
        if settings.ensure_defaults().await? {
            tracing::info!("first activation; default settings installed");
        }

        let evidence = EvidenceRepository::new(pool.clone());
        match evidence.sweep_expired(config.pipeline.evidence_ttl).await {
            Ok(0) => {}
            Ok(swept) => tracing::info!(target: "db", swept, "stale evidence removed at startup"),
            Err(err) => tracing::warn!(target: "db", error = %err, "startup evidence sweep failed"),
        }

        let http = Client::builder()
            .user_agent(format!("phishguard/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let classifier = Arc::new(ClassifierClient::new(http, config.classifier.clone()));

        let scheduler = ExpiryScheduler::new();
        let expiry_handle = scheduler.clone().spawn(shutdown.listener());

        let cache = ResultCache::new(config.pipeline.cache_ttl, scheduler.clone());
        let suppression =
            SuppressionState::new(config.pipeline.suppression_ttl, scheduler.clone());
        let coordinator = NotificationCoordinator::new(
            Arc::new(StdioSurface::new()),
            suppression,
            evidence,
            scheduler,
            config.pipeline.suppression_policy,
            config.pipeline.evidence_ttl,
        );
        let evaluator = UrlEvaluator::new(
            settings,
            cache,
            classifier,
            coordinator.clone(),
            UrlDebouncer::new(config.pipeline.debounce_window),
        );
        let router = EventRouter::new(evaluator, coordinator);

        Ok(Self {
            _paths: paths,
            pool,
            router,
            expiry_handle,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            _paths: _,
            pool,
            router,
            mut expiry_handle,
            shutdown,
        } = self;

        tracing::info!("phishing guard pipeline started");

        let grace = Duration::from_secs(5);
        let mut shutdown_listener = shutdown.listener();
        let mut router_future = Box::pin(router.run(shutdown.listener()));
        let mut router_done = false;

        tokio::select! {
            _ = shutdown_listener.notified() => {
                tracing::info!("shutdown signal received");
            }
            res = &mut router_future => {
                router_done = true;
                if let Err(err) = res {
                    tracing::error!(error = %err, "event intake failed");
                }
            }
        }

        shutdown.trigger();

        if !router_done {
            match timeout(grace, &mut router_future).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "event intake failed during shutdown")
                }
                Err(_) => tracing::warn!(
                    target: "intercept",
                    "event intake did not stop within {:?}",
                    grace
                ),
            }
        }

        let expiry_grace = tokio::time::sleep(grace);
        tokio::pin!(expiry_grace);
        tokio::select! {
            res = &mut expiry_handle => {
                if let Err(err) = res {
                    if err.is_panic() {
                        tracing::error!(target: "expiry", "expiry scheduler panicked");
                    }
                }
            }
            _ = &mut expiry_grace => {
                tracing::warn!(
                    target: "expiry",
                    "expiry scheduler did not stop within {:?}; aborting",
                    grace
                );
                expiry_handle.abort();
            }
        }

        if timeout(grace, pool.close()).await.is_err() {
            tracing::warn!(target: "db", "storage did not close within {:?}", grace);
        }

        tracing::info!("phishing guard stopped");
        Ok(())
    }
}
