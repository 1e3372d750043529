//! Operation polling
//!
//! Mutating Compute calls return a global operation. [`OperationWaiter`]
//! fetches its status until it is `DONE`, sleeping a fixed interval between
//! fetches, and turns the terminal state into a `Result`.
//!
//! Cancellation is only observed while sleeping. A status fetch that is
//! already in flight runs to completion; its result is then acted on before
//! the context is looked at again.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::api::ComputeApi;
use crate::context::WaitContext;
use crate::error::{CoreError, OperationError, Result};
use crate::progress::{ProgressCallback, ProgressEvent, emit};

/// Time between operation status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest interval [`OperationWaiter::with_interval`] accepts
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Waits for global operations of one project
#[derive(Clone)]
pub struct OperationWaiter {
    api: Arc<dyn ComputeApi>,
    project_id: String,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
}

impl OperationWaiter {
    pub fn new(api: Arc<dyn ComputeApi>, project_id: impl Into<String>) -> Self {
        Self {
            api,
            project_id: project_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
            on_progress: None,
        }
    }

    /// Set the time between status fetches, raised to [`MIN_POLL_INTERVAL`]
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Report progress through `callback`
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Poll `operation` until it is done, fails, or `ctx` is cancelled
    ///
    /// # Errors
    ///
    /// - [`CoreError::OperationPoll`] if a status fetch fails; the wait is not retried
    /// - [`CoreError::Operation`] if the operation is done with error detail
    /// - [`CoreError::Cancelled`] / [`CoreError::DeadlineExceeded`] if `ctx`
    ///   fires while sleeping between fetches. The remote operation keeps running.
    pub async fn wait(&self, ctx: &WaitContext, operation: &str) -> Result<()> {
        let start = Instant::now();
        let mut attempt: u32 = 0;

        emit(
            &self.on_progress,
            ProgressEvent::Started {
                operation: operation.to_string(),
            },
        );

        loop {
            attempt += 1;
            debug!(project = %self.project_id, %operation, attempt, "Wait for operation");

            let current = match self
                .api
                .get_global_operation(&self.project_id, operation)
                .await
            {
                Ok(op) => op,
                Err(source) => {
                    let err = CoreError::OperationPoll {
                        operation: operation.to_string(),
                        source,
                    };
                    self.failed(operation, &err);
                    return Err(err);
                }
            };

            emit(
                &self.on_progress,
                ProgressEvent::Polling {
                    operation: operation.to_string(),
                    status: current.status.clone(),
                    attempt,
                    elapsed: start.elapsed(),
                },
            );

            if current.is_done() {
                if current.error.is_none() {
                    info!(project = %self.project_id, %operation, "Operation done");
                    emit(
                        &self.on_progress,
                        ProgressEvent::Completed {
                            operation: operation.to_string(),
                            elapsed: start.elapsed(),
                        },
                    );
                    return Ok(());
                }

                let err = CoreError::Operation(OperationError::new(current));
                self.failed(operation, &err);
                return Err(err);
            }

            tokio::select! {
                reason = ctx.done() => {
                    self.failed(operation, &reason);
                    return Err(reason);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    fn failed(&self, operation: &str, err: &CoreError) {
        debug!(%operation, error = %err, "Operation wait ended");
        emit(
            &self.on_progress,
            ProgressEvent::Failed {
                operation: operation.to_string(),
                error: err.to_string(),
            },
        );
    }
}
