use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Full-resolution samples for one or more traces of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub data: HashMap<String, Vec<f64>>,
}

impl Timeline {
    /// Removes and returns the samples of `trace`.
    pub fn take(&mut self, trace: &str) -> Option<Vec<f64>> {
        self.data.remove(trace)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("no trace '{trace}' for session '{session_id}'")]
    NotFound { session_id: String, trace: String },
    #[error("backend error: {0}")]
    Backend(String),
}

/// Source of full-resolution traces, typically a database or HTTP API.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn timeline(&self, session_id: &str, trace: &str) -> Result<Timeline, ProviderError>;
}

/// Sessions held in memory, keyed by session id then trace name.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    sessions: HashMap<String, HashMap<String, Vec<f64>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session_id: impl Into<String>, trace: impl Into<String>, samples: Vec<f64>) {
        self.sessions
            .entry(session_id.into())
            .or_default()
            .insert(trace.into(), samples);
    }

    /// Trace names of `session_id`, sorted.
    pub fn traces(&self, session_id: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .sessions
            .get(session_id)
            .map(|traces| traces.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait]
impl SeriesProvider for MemoryProvider {
    async fn timeline(&self, session_id: &str, trace: &str) -> Result<Timeline, ProviderError> {
        let samples = self
            .sessions
            .get(session_id)
            .and_then(|traces| traces.get(trace))
            .ok_or_else(|| ProviderError::NotFound {
                session_id: session_id.to_string(),
                trace: trace.to_string(),
            })?;
        let mut data = HashMap::with_capacity(1);
        data.insert(trace.to_string(), samples.clone());
        Ok(Timeline { data })
    }
}
