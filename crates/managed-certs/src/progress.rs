//! Progress events for operation waits
//!
//! The waiter reports what it is doing through an injected callback instead
//! of writing to a global logger. Controllers can forward the events to their
//! own logging, metrics, or status reporting.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

/// Progress events emitted while waiting for an operation
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The waiter picked up the operation
    Started { operation: String },
    /// One status fetch completed
    Polling {
        operation: String,
        status: String,
        attempt: u32,
        elapsed: Duration,
    },
    /// The operation is done without errors
    Completed { operation: String, elapsed: Duration },
    /// The wait ended without success
    Failed { operation: String, error: String },
}

/// Callback type for progress updates
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// A callback that forwards events to `tracing`
pub fn tracing_progress() -> ProgressCallback {
    Arc::new(|event| match event {
        ProgressEvent::Started { operation } => {
            info!(%operation, "Wait for operation");
        }
        ProgressEvent::Polling {
            operation,
            status,
            attempt,
            elapsed,
        } => {
            info!(
                %operation,
                %status,
                attempt,
                elapsed_secs = elapsed.as_secs(),
                "Operation status"
            );
        }
        ProgressEvent::Completed { operation, elapsed } => {
            info!(%operation, elapsed_secs = elapsed.as_secs(), "Operation done");
        }
        ProgressEvent::Failed { operation, error } => {
            warn!(%operation, %error, "Operation failed");
        }
    })
}

/// Helper to emit progress events
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_without_callback_is_noop() {
        emit(
            &None,
            ProgressEvent::Started {
                operation: "op-1".to_string(),
            },
        );
    }

    #[test]
    fn test_emit_invokes_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |event| sink.lock().unwrap().push(event));

        emit(
            &Some(callback),
            ProgressEvent::Started {
                operation: "op-1".to_string(),
            },
        );

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ProgressEvent::Started {
                operation: "op-1".to_string()
            }]
        );
    }

    #[test]
    fn test_tracing_progress_accepts_all_events() {
        let cb = tracing_progress();
        cb(ProgressEvent::Started {
            operation: "op".to_string(),
        });
        cb(ProgressEvent::Polling {
            operation: "op".to_string(),
            status: "RUNNING".to_string(),
            attempt: 1,
            elapsed: Duration::ZERO,
        });
        cb(ProgressEvent::Completed {
            operation: "op".to_string(),
            elapsed: Duration::from_secs(20),
        });
        cb(ProgressEvent::Failed {
            operation: "op".to_string(),
            error: "boom".to_string(),
        });
    }
}
