//! Upload configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// `application/pdf`
pub const PDF_MIME: &str = "application/pdf";

/// OOXML word-processing document (`.docx`).
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// 2 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Upload route appended to the API base URL.
pub const UPLOAD_PATH: &str = "/api/v1/resumes/upload";

/// Page the user is sent to once the resume is stored.
pub const DEFAULT_NEXT_STEP_PATH: &str = "/jobs";

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// A model the user can pick for resume processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub id: String,
    pub label: String,
}

impl ModelOption {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Configuration handed to the orchestrator at construction.
///
/// Every field has a default, so a partial JSON document deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_size_bytes: u64,
    pub accepted_mime_types: Vec<String>,
    /// When `false` the session is pinned to `default_model`.
    pub model_selection_enabled: bool,
    /// Models that require an access token before upload.
    pub premium_models: Vec<String>,
    pub default_model: String,
    pub models: Vec<ModelOption>,
    /// API base URL without the upload route, e.g. `http://localhost:8000`.
    pub api_base_url: Option<String>,
    pub next_step_path: String,
    /// Submit immediately after a file passes validation.
    pub auto_submit: bool,
    pub request_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            accepted_mime_types: vec![PDF_MIME.into(), DOCX_MIME.into()],
            model_selection_enabled: true,
            premium_models: vec!["gpt-4o".into()],
            default_model: DEFAULT_MODEL.into(),
            models: vec![
                ModelOption::new("gpt-5-nano", "GPT-5-nano"),
                ModelOption::new("gpt-4.1-mini", "GPT-4.1-mini"),
                ModelOption::new("gpt-5-mini", "GPT-5-mini"),
                ModelOption::new("gpt-5", "GPT-5"),
                ModelOption::new("gpt-4o", "GPT-4o"),
            ],
            api_base_url: None,
            next_step_path: DEFAULT_NEXT_STEP_PATH.into(),
            auto_submit: true,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl UploadConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether `model` is listed in the model catalog.
    pub fn knows_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.id == model)
    }

    pub fn is_premium(&self, model: &str) -> bool {
        requires_access_token(model, &self.premium_models)
    }
}

/// Whether `model` needs an access token before any upload is allowed.
pub fn requires_access_token(model: &str, premium_models: &[String]) -> bool {
    premium_models.iter().any(|m| m == model)
}
