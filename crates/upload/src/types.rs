//! Data types for the upload flow.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::classify::UploadErrorCategory;
use crate::error::ValidationError;

/// Body returned by the upload endpoint on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
}

impl UploadResponse {
    /// Reads known fields from an arbitrary JSON payload.
    ///
    /// Fields with the wrong JSON type, or blank strings, are treated as absent.
    pub fn from_payload(payload: &Value) -> Self {
        let text = |field: &str| {
            payload
                .get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            message: text("message"),
            request_id: text("request_id"),
            resume_id: text("resume_id"),
        }
    }
}

/// Event emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A file passed validation and is now pending.
    Attached { file_id: Uuid, file_name: String },
    /// A candidate failed validation.
    Rejected { category: UploadErrorCategory },
    /// Submission is blocked until an access token is entered.
    TokenRequired { model: String },
    /// A submission is in flight.
    Started { file_id: Uuid },
    /// The endpoint stored the file.
    Uploaded { file_id: Uuid, resume_id: String },
    /// The submission failed, or succeeded without a resume id.
    Failed {
        file_id: Uuid,
        category: UploadErrorCategory,
    },
    /// An in-flight submission was cancelled and its result discarded.
    Cancelled { file_id: Uuid },
    /// The attached file was removed by the user.
    Removed { file_id: Uuid },
    /// The UI should move on to `target`.
    Navigate { target: String },
}

/// Result of handing a file to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachOutcome {
    /// Validation failed; state is unchanged apart from the recorded error.
    Rejected(ValidationError),
    /// Pending, but the selected model needs an access token first.
    AwaitingToken,
    /// Pending; auto-submit is off.
    Pending,
    /// Pending and immediately submitted.
    Submitted(SubmitOutcome),
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Uploaded {
        resume_id: String,
        navigation: String,
    },
    /// 2xx response without a resume id.
    MissingResumeId,
    Failed(UploadErrorCategory),
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_from_full_payload() {
        let resp = UploadResponse::from_payload(&json!({
            "message": "stored",
            "request_id": "req-1",
            "resume_id": "abc123",
        }));
        assert_eq!(resp.resume_id.as_deref(), Some("abc123"));
        assert_eq!(resp.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn response_ignores_wrong_types_and_blanks() {
        let resp = UploadResponse::from_payload(&json!({ "resume_id": 42 }));
        assert!(resp.resume_id.is_none());

        let resp = UploadResponse::from_payload(&json!({ "resume_id": "  " }));
        assert!(resp.resume_id.is_none());

        let resp = UploadResponse::from_payload(&json!(["not", "an", "object"]));
        assert_eq!(resp, UploadResponse::default());
    }
}
