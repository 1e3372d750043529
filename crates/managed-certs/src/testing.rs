//! Scripted in-memory `ComputeApi` for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::ComputeApi;
use crate::certificate::{Certificate, CertificateList};
use crate::error::ApiError;
use crate::operation::{Operation, OperationErrorDetail, OperationErrorEntry};
use crate::progress::{ProgressCallback, ProgressEvent};

/// Fake Compute API
///
/// Operation fetches are served from a queue; the last `Ok` entry is repeated
/// once the queue is down to one element.
#[derive(Default)]
pub(crate) struct FakeCompute {
    insert_result: Mutex<Option<Result<Operation, ApiError>>>,
    delete_result: Mutex<Option<Result<Operation, ApiError>>>,
    get_result: Mutex<Option<Result<Certificate, ApiError>>>,
    list_result: Mutex<Option<Result<CertificateList, ApiError>>>,
    operations: Mutex<VecDeque<Result<Operation, ApiError>>>,
    pub inserted: Mutex<Vec<(String, Certificate)>>,
    pub deleted: Mutex<Vec<(String, String)>>,
    pub operation_fetches: Mutex<Vec<(String, String)>>,
}

impl FakeCompute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_insert(self, result: Result<Operation, ApiError>) -> Self {
        *self.insert_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_delete(self, result: Result<Operation, ApiError>) -> Self {
        *self.delete_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_get(self, result: Result<Certificate, ApiError>) -> Self {
        *self.get_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_list(self, result: Result<CertificateList, ApiError>) -> Self {
        *self.list_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_operations(self, ops: Vec<Result<Operation, ApiError>>) -> Self {
        *self.operations.lock().unwrap() = ops.into();
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn fetch_count(&self) -> usize {
        self.operation_fetches.lock().unwrap().len()
    }

    fn next_operation(&self) -> Result<Operation, ApiError> {
        let mut queue = self.operations.lock().unwrap();
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        match queue.front() {
            Some(Ok(op)) => Ok(op.clone()),
            Some(Err(_)) => queue.pop_front().unwrap(),
            None => Err(http_error(404, "no scripted operation")),
        }
    }
}

fn take<T>(slot: &Mutex<Option<Result<T, ApiError>>>, what: &str) -> Result<T, ApiError> {
    slot.lock()
        .unwrap()
        .take()
        .unwrap_or_else(|| Err(http_error(500, &format!("no scripted {what}"))))
}

#[async_trait]
impl ComputeApi for FakeCompute {
    async fn insert_ssl_certificate(
        &self,
        project: &str,
        certificate: &Certificate,
    ) -> Result<Operation, ApiError> {
        self.inserted
            .lock()
            .unwrap()
            .push((project.to_string(), certificate.clone()));
        take(&self.insert_result, "insert")
    }

    async fn delete_ssl_certificate(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Operation, ApiError> {
        self.deleted
            .lock()
            .unwrap()
            .push((project.to_string(), name.to_string()));
        take(&self.delete_result, "delete")
    }

    async fn get_ssl_certificate(
        &self,
        _project: &str,
        _name: &str,
    ) -> Result<Certificate, ApiError> {
        take(&self.get_result, "get")
    }

    async fn list_ssl_certificates(&self, _project: &str) -> Result<CertificateList, ApiError> {
        take(&self.list_result, "list")
    }

    async fn get_global_operation(&self, project: &str, name: &str) -> Result<Operation, ApiError> {
        self.operation_fetches
            .lock()
            .unwrap()
            .push((project.to_string(), name.to_string()));
        self.next_operation()
    }
}

pub(crate) fn operation(name: &str, status: &str) -> Operation {
    Operation {
        name: name.to_string(),
        status: status.to_string(),
        ..Default::default()
    }
}

pub(crate) fn failed_operation(name: &str, entries: &[(&str, &str)]) -> Operation {
    Operation {
        error: Some(OperationErrorDetail {
            errors: entries
                .iter()
                .map(|(code, message)| OperationErrorEntry {
                    code: code.to_string(),
                    message: message.to_string(),
                    location: None,
                })
                .collect(),
        }),
        ..operation(name, "DONE")
    }
}

pub(crate) fn http_error(status: u16, message: &str) -> ApiError {
    ApiError::Http {
        status,
        message: message.to_string(),
    }
}

/// Progress callback that records every event
pub(crate) fn recording_progress() -> (ProgressCallback, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    (Arc::new(move |event| sink.lock().unwrap().push(event)), events)
}
