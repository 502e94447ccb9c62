//! Resume upload flow: validate, capture, submit, classify.
//!
//! This crate implements the **client-side state machine** for uploading a
//! single resume document. It has no UI dependencies; a front-end drives an
//! [`UploadOrchestrator`] and renders what it exposes (state, derived
//! feedback, events) through a [`resumedrop_i18n::Translate`] implementation.
//!
//! # Pipeline
//!
//! 1. **Capture**: drag events or a file picker yield one candidate file
//! 2. **Validate**: MIME type, size and single-file checks, no I/O
//! 3. **Submit**: one multipart POST through an [`UploadTransport`]
//! 4. **Classify**: failures become an [`UploadErrorCategory`]
//! 5. **Navigate**: success emits the next-step URL as an event

pub mod classify;
pub mod config;
pub mod drag;
pub mod error;
pub mod feedback;
pub mod files;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export primary types for convenience.
pub use classify::{UploadErrorCategory, classify};
pub use config::{ModelOption, UploadConfig, requires_access_token};
pub use drag::{DragIntent, drop_zone_enabled};
pub use error::{MissingResumeId, TransportFailure, UploadError, ValidationError};
pub use feedback::{
    BannerKind, DropZoneAffordance, FeedbackBanner, RenderedBanner, status_label_key,
};
pub use files::{FileSource, SelectedFile, detect_mime_type, format_bytes};
pub use orchestrator::{UploadOrchestrator, build_navigation_target};
pub use session::UploadSession;
pub use state::{AttachedFile, FileStatus, FileUploadState};
pub use transport::{
    HttpTransport, UploadRequest, UploadTransport, build_upload_url, upload_headers,
};
pub use types::{AttachOutcome, SubmitOutcome, UploadEvent, UploadResponse};
pub use validation::ValidationRules;
