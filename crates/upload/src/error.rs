//! Upload error types.
//!
//! `Display` output of [`ValidationError`], [`TransportFailure`] and
//! [`MissingResumeId`] is the legacy text that [`crate::classify`] matches.

use crate::files::format_bytes;

/// A candidate file rejected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File \"{file_name}\" is not an accepted file type.")]
    UnsupportedType { file_name: String, mime_type: String },

    #[error("File \"{file_name}\" exceeds the maximum size of {}.", display_size(.max_size))]
    TooLarge { file_name: String, max_size: u64 },

    #[error("Only one file can be uploaded at a time.")]
    AlreadyAttached,
}

fn display_size(bytes: &u64) -> String {
    format_bytes(*bytes)
}

/// Why a submission did not produce a usable response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    #[error("Upload URL is not configured")]
    MissingEndpoint,

    #[error("Upload URL is not configured correctly: {0}")]
    InvalidEndpoint(String),

    #[error("Cannot upload \"{file_name}\"; {reason}")]
    InvalidFile { file_name: String, reason: String },

    #[error("Upload failed for {file_name}. Status: {status}")]
    Status { file_name: String, status: u16 },

    #[error("{0}")]
    Network(String),

    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}

/// A 2xx response that lacks the `resume_id` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Upload response for {file_name} did not include a resume_id")]
pub struct MissingResumeId {
    pub file_name: String,
}

/// Errors from driving the orchestrator in a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("no file is pending upload")]
    NothingPending,

    #[error("an upload is already in progress")]
    Busy,

    #[error("no upload is in progress")]
    NotUploading,

    #[error("model \"{0}\" requires an access token")]
    TokenRequired(String),

    #[error("unknown model \"{0}\"")]
    UnknownModel(String),

    #[error("model selection is disabled")]
    ModelSelectionDisabled,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
