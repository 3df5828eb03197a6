//! In-memory backends shared by the integration suites.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use oat_client::{
    BackendError, BackendOptions, EventScope, ExceptionReport, Severity, TelemetryBackend,
};

/// Everything a [`RecordingBackend`] has been asked to deliver.
#[derive(Debug, Default)]
pub struct Recorded {
    pub initializations: Vec<(String, BackendOptions)>,
    pub exceptions: Vec<(ExceptionReport, EventScope)>,
    pub messages: Vec<(String, Severity, EventScope)>,
    pub flushes: Vec<Duration>,
}

/// Backend that records every call for assertions.
pub struct RecordingBackend {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingBackend {
    /// Build a backend plus a handle to what it records.
    pub fn new() -> (Box<dyn TelemetryBackend>, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let backend = Box::new(Self {
            recorded: Arc::clone(&recorded),
        });
        (backend, recorded)
    }
}

impl TelemetryBackend for RecordingBackend {
    fn initialize(&self, dsn: &str, options: &BackendOptions) -> Result<(), BackendError> {
        self.recorded
            .lock()
            .unwrap()
            .initializations
            .push((dsn.to_string(), options.clone()));
        Ok(())
    }

    fn capture_exception(
        &self,
        report: &ExceptionReport,
        scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        self.recorded
            .lock()
            .unwrap()
            .exceptions
            .push((report.clone(), scope.clone()));
        Ok(Some(uuid::Uuid::new_v4().to_string()))
    }

    fn capture_message(
        &self,
        message: &str,
        level: Severity,
        scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        self.recorded
            .lock()
            .unwrap()
            .messages
            .push((message.to_string(), level, scope.clone()));
        Ok(Some(uuid::Uuid::new_v4().to_string()))
    }

    fn flush(&self, timeout: Duration) -> Result<(), BackendError> {
        self.recorded.lock().unwrap().flushes.push(timeout);
        Ok(())
    }
}

/// Backend whose delivery calls always fail.
pub struct FailingBackend;

impl TelemetryBackend for FailingBackend {
    fn initialize(&self, _dsn: &str, _options: &BackendOptions) -> Result<(), BackendError> {
        Ok(())
    }

    fn capture_exception(
        &self,
        _report: &ExceptionReport,
        _scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        Err(BackendError::Transport("connection refused".to_string()))
    }

    fn capture_message(
        &self,
        _message: &str,
        _level: Severity,
        _scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        Err(BackendError::Rejected("quota exceeded".to_string()))
    }

    fn flush(&self, _timeout: Duration) -> Result<(), BackendError> {
        Err(BackendError::Transport("timed out".to_string()))
    }
}

/// Backend that refuses to initialize at all.
pub struct BrokenBackend;

impl TelemetryBackend for BrokenBackend {
    fn initialize(&self, dsn: &str, _options: &BackendOptions) -> Result<(), BackendError> {
        Err(BackendError::InvalidDsn(dsn.to_string()))
    }

    fn capture_exception(
        &self,
        _report: &ExceptionReport,
        _scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        unreachable!("never initialized")
    }

    fn capture_message(
        &self,
        _message: &str,
        _level: Severity,
        _scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        unreachable!("never initialized")
    }

    fn flush(&self, _timeout: Duration) -> Result<(), BackendError> {
        unreachable!("never initialized")
    }
}
