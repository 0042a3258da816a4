//! Test doubles for the seams to external collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    classifier::{ClassifierError, ClassifierProvider},
    domain::{TabId, Verdict},
    notify::{BrowserSurface, Notification},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Notify(Notification),
    Clear(String),
    Redirect { tab: TabId, target: String },
    OpenDetails { id: String, body: String },
}

/// Browser surface that records every command instead of performing it.
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Notify(note) => Some(note.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications().len()
    }

    pub fn redirects(&self) -> Vec<(TabId, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Redirect { tab, target } => Some((*tab, target.clone())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BrowserSurface for RecordingSurface {
    async fn notify(&self, note: &Notification) -> Result<()> {
        self.calls.lock().push(SurfaceCall::Notify(note.clone()));
        Ok(())
    }

    async fn clear_notification(&self, id: &str) -> Result<()> {
        self.calls.lock().push(SurfaceCall::Clear(id.to_string()));
        Ok(())
    }

    async fn redirect_tab(&self, tab: TabId, target: &str) -> Result<()> {
        self.calls.lock().push(SurfaceCall::Redirect {
            tab,
            target: target.to_string(),
        });
        Ok(())
    }

    async fn open_details(&self, id: &str, body: &str) -> Result<()> {
        self.calls.lock().push(SurfaceCall::OpenDetails {
            id: id.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

enum ScriptedOutcome {
    Verdict(Verdict),
    Unavailable,
    Malformed,
}

/// Classifier that returns a scripted outcome and counts calls.
pub struct MockClassifier {
    outcome: Mutex<ScriptedOutcome>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(ScriptedOutcome::Unavailable),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond_with(&self, verdict: Verdict) {
        *self.outcome.lock() = ScriptedOutcome::Verdict(verdict);
    }

    pub fn fail_unavailable(&self) {
        *self.outcome.lock() = ScriptedOutcome::Unavailable;
    }

    pub fn fail_malformed(&self) {
        *self.outcome.lock() = ScriptedOutcome::Malformed;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierProvider for MockClassifier {
    async fn evaluate(&self, _url: &str) -> Result<Verdict, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.outcome.lock() {
            ScriptedOutcome::Verdict(verdict) => Ok(verdict.clone()),
            ScriptedOutcome::Unavailable => Err(ClassifierError::Unavailable {
                reason: "connection refused".to_string(),
            }),
            ScriptedOutcome::Malformed => Err(serde_json::from_str::<Verdict>("[]")
                .expect_err("array is not a verdict")
                .into()),
        }
    }
}
