//! Global operation values as returned by the Compute API
//!
//! These are plain data; the waiter only looks at `status` and `error`.

use serde::{Deserialize, Serialize};

/// Status string of an operation that reached its terminal state.
pub const STATUS_DONE: &str = "DONE";

/// An asynchronous mutation tracked by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    /// `PENDING`, `RUNNING` or `DONE`
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_status_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_message: Option<String>,
}

/// Structured error detail attached to a failed operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default)]
    pub errors: Vec<OperationErrorEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrorEntry {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Operation {
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == STATUS_DONE
    }

    /// Error entries, empty when the operation carries no error detail
    pub fn error_entries(&self) -> &[OperationErrorEntry] {
        self.error
            .as_ref()
            .map(|e| e.errors.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_running_operation() {
        let op: Operation = serde_json::from_value(json!({
            "kind": "compute#operation",
            "id": "7334428290398410003",
            "name": "operation-1589395456045-5a58d9a2b8fb7-6c3d0c5e-37a6ce5c",
            "operationType": "insert",
            "targetLink": "https://www.googleapis.com/compute/v1/projects/p/global/sslCertificates/cert-a",
            "status": "RUNNING",
            "progress": 0,
            "insertTime": "2020-05-13T11:44:16.324-07:00"
        }))
        .unwrap();

        assert_eq!(op.status, "RUNNING");
        assert!(!op.is_done());
        assert_eq!(op.operation_type.as_deref(), Some("insert"));
        assert!(op.error.is_none());
        assert!(op.error_entries().is_empty());
    }

    #[test]
    fn test_decode_failed_operation() {
        let op: Operation = serde_json::from_value(json!({
            "name": "op-2",
            "status": "DONE",
            "httpErrorStatusCode": 403,
            "httpErrorMessage": "FORBIDDEN",
            "error": {
                "errors": [
                    {"code": "QUOTA_EXCEEDED", "message": "limit reached"}
                ]
            }
        }))
        .unwrap();

        assert!(op.is_done());
        assert_eq!(op.http_error_status_code, Some(403));
        assert_eq!(op.error_entries().len(), 1);
        assert_eq!(op.error_entries()[0].code, "QUOTA_EXCEEDED");
        assert_eq!(op.error_entries()[0].location, None);
    }

    #[test]
    fn test_status_comparison_is_exact() {
        let op = Operation {
            name: "op".to_string(),
            status: "done".to_string(),
            ..Default::default()
        };
        assert!(!op.is_done());
    }
}
