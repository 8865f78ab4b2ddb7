//! Daemon connection layer
//!
//! The shell talks to the download daemon through the [`BackendClient`]
//! trait. [`ProcessBackend`] is the real implementation over child-process
//! stdio; [`RecordingBackend`] is an in-memory implementation used by the
//! test harness.

pub mod process;
pub mod protocol;

pub use process::ProcessBackend;

use crate::config::ConfigMap;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Operations the shell invokes on the daemon
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Kick off startup checks; progress arrives as events
    async fn run_startup_checks(&self) -> Result<(), String>;

    /// Fetch the daemon's settings map
    async fn get_config(&self) -> Result<ConfigMap, String>;

    /// Replace the daemon's settings map
    async fn save_config(&self, config: ConfigMap) -> Result<(), String>;
}

#[async_trait]
impl BackendClient for ProcessBackend {
    async fn run_startup_checks(&self) -> Result<(), String> {
        self.request("run_startup_checks", None).await.map(|_| ())
    }

    async fn get_config(&self) -> Result<ConfigMap, String> {
        let value = self.request("get_config", None).await?;
        serde_json::from_value(value).map_err(|e| format!("Bad config payload: {}", e))
    }

    async fn save_config(&self, config: ConfigMap) -> Result<(), String> {
        let params = serde_json::to_value(&config)
            .map_err(|e| format!("Failed to encode config: {}", e))?;
        self.request("save_config", Some(params)).await.map(|_| ())
    }
}

/// A request observed by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    RunStartupChecks,
    GetConfig,
    SaveConfig(ConfigMap),
}

/// In-memory daemon used by tests
///
/// Records every request and answers from preset state. Failure modes can
/// be armed per method to exercise error paths.
#[derive(Clone)]
pub struct RecordingBackend {
    inner: Arc<Mutex<RecordingState>>,
}

struct RecordingState {
    requests: Vec<RecordedRequest>,
    config: ConfigMap,
    fail_startup_checks: Option<String>,
    fail_get_config: Option<String>,
    fail_save_config: Option<String>,
}

impl RecordingBackend {
    pub fn new(config: ConfigMap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecordingState {
                requests: Vec::new(),
                config,
                fail_startup_checks: None,
                fail_get_config: None,
                fail_save_config: None,
            })),
        }
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// The config the daemon currently holds
    pub fn config(&self) -> ConfigMap {
        self.inner
            .lock()
            .map(|s| s.config.clone())
            .unwrap_or_default()
    }

    /// Make `run_startup_checks` fail with the given error
    pub fn fail_startup_checks(&self, error: impl Into<String>) {
        if let Ok(mut s) = self.inner.lock() {
            s.fail_startup_checks = Some(error.into());
        }
    }

    /// Make `get_config` fail with the given error
    pub fn fail_get_config(&self, error: impl Into<String>) {
        if let Ok(mut s) = self.inner.lock() {
            s.fail_get_config = Some(error.into());
        }
    }

    /// Let `get_config` succeed again
    pub fn clear_get_config_failure(&self) {
        if let Ok(mut s) = self.inner.lock() {
            s.fail_get_config = None;
        }
    }

    /// Make `save_config` fail with the given error
    pub fn fail_save_config(&self, error: impl Into<String>) {
        if let Ok(mut s) = self.inner.lock() {
            s.fail_save_config = Some(error.into());
        }
    }

    fn record(&self, request: RecordedRequest) {
        if let Ok(mut s) = self.inner.lock() {
            s.requests.push(request);
        }
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(crate::config::default_daemon_config())
    }
}

#[async_trait]
impl BackendClient for RecordingBackend {
    async fn run_startup_checks(&self) -> Result<(), String> {
        self.record(RecordedRequest::RunStartupChecks);
        let failure = self
            .inner
            .lock()
            .ok()
            .and_then(|s| s.fail_startup_checks.clone());
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn get_config(&self) -> Result<ConfigMap, String> {
        self.record(RecordedRequest::GetConfig);
        let state = self
            .inner
            .lock()
            .map_err(|_| "recording backend poisoned".to_string())?;
        match &state.fail_get_config {
            Some(err) => Err(err.clone()),
            None => Ok(state.config.clone()),
        }
    }

    async fn save_config(&self, config: ConfigMap) -> Result<(), String> {
        self.record(RecordedRequest::SaveConfig(config.clone()));
        let mut state = self
            .inner
            .lock()
            .map_err(|_| "recording backend poisoned".to_string())?;
        match &state.fail_save_config {
            Some(err) => Err(err.clone()),
            None => {
                state.config = config;
                Ok(())
            }
        }
    }
}
