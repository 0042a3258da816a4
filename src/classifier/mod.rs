use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Verdict;

mod client;
pub mod wire;

pub use client::ClassifierClient;

/// Why a classification attempt produced no verdict.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The network call could not complete, timed out, or came back with a
    /// non-success status.
    #[error("classifier unavailable: {reason}")]
    Unavailable { reason: String },
    /// A success response whose payload does not match the verdict shape.
    #[error("malformed verdict payload: {0}")]
    MalformedVerdict(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        ClassifierError::Unavailable {
            reason: err.to_string(),
        }
    }
}

/// Seam between the pipeline and the remote collaborator; tests substitute a
/// scripted implementation.
#[async_trait]
pub trait ClassifierProvider: Send + Sync {
    async fn evaluate(&self, url: &str) -> Result<Verdict, ClassifierError>;
}
