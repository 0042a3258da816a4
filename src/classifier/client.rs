use async_trait::async_trait;
use reqwest::Client;

use crate::{config::ClassifierConfig, domain::Verdict};

use super::{
    wire::{parse_verdict, CheckUrlRequest},
    ClassifierError, ClassifierProvider,
};

/// HTTP client for the remote URL classifier. One POST per evaluation; both
/// failure kinds abort only the evaluation that hit them.
#[derive(Clone)]
pub struct ClassifierClient {
    http: Client,
    config: ClassifierConfig,
}

impl ClassifierClient {
    pub fn new(http: Client, config: ClassifierConfig) -> Self {
        Self { http, config }
    }

    pub async fn check_url(&self, url: &str) -> Result<Verdict, ClassifierError> {
        let response = self
            .http
            .post(self.config.endpoint.clone())
            .timeout(self.config.timeout)
            .json(&CheckUrlRequest { url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(target: "classifier", %status, url, "classifier rejected the check call");
            return Err(ClassifierError::Unavailable {
                reason: format!("status {status}"),
            });
        }

        let body = response.text().await?;
        parse_verdict(&body)
    }
}

#[async_trait]
impl ClassifierProvider for ClassifierClient {
    async fn evaluate(&self, url: &str) -> Result<Verdict, ClassifierError> {
        self.check_url(url).await
    }
}
