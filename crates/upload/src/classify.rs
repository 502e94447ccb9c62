//! Failure classification.
//!
//! Structured failures convert through the `From` impls below. [`classify`]
//! exists for failures that only arrive as text, and matches the exact
//! formats produced by this crate's error types and by older upload clients.

use std::sync::LazyLock;

use regex::Regex;
use resumedrop_i18n::Translate;
use serde::Serialize;

use crate::error::{MissingResumeId, TransportFailure, ValidationError};
use crate::files::format_bytes;

static TOO_LARGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^File "(.+)" exceeds the maximum size of (.+)\.$"#)
        .expect("Invalid too-large regex")
});

static INVALID_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^Cannot upload "(.+)";.*$"#).expect("Invalid invalid-file regex")
});

static FAILED_WITH_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Upload failed for (.+)\. Status: (\d+)").expect("Invalid status regex")
});

static UNSUPPORTED_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^File "(.+)" is not an accepted file type\.$"#)
        .expect("Invalid unsupported-type regex")
});

static MISSING_RESUME_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Upload response for (.+) did not include a resume_id$")
        .expect("Invalid missing-id regex")
});

const MISSING_ENDPOINT_MARKER: &str = "Upload URL is not configured";
const ALREADY_ATTACHED_TEXT: &str = "Only one file can be uploaded at a time.";

/// Stable, UI-facing failure category with the parameters its message needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum UploadErrorCategory {
    TooLarge { file_name: String, max_size: String },
    InvalidFileObject { file_name: String },
    UnsupportedType { file_name: String },
    AlreadyAttached,
    MissingEndpoint,
    FailedWithStatus { file_name: String, status: String },
    SuccessMissingId,
    UnknownError,
    Verbatim { message: String },
}

impl UploadErrorCategory {
    /// Catalog key for this category. `Verbatim` has none.
    pub fn translation_key(&self) -> Option<&'static str> {
        match self {
            Self::TooLarge { .. } => Some("upload.errors.tooLarge"),
            Self::InvalidFileObject { .. } => Some("upload.errors.invalidFileObject"),
            Self::UnsupportedType { .. } => Some("upload.errors.unsupportedType"),
            Self::AlreadyAttached => Some("upload.errors.alreadyAttached"),
            Self::MissingEndpoint => Some("upload.errors.missingEndpoint"),
            Self::FailedWithStatus { .. } => Some("upload.errors.failedWithStatus"),
            Self::SuccessMissingId => Some("upload.feedback.successMissingId"),
            Self::UnknownError => Some("upload.feedback.unknownError"),
            Self::Verbatim { .. } => None,
        }
    }

    /// Named values interpolated into the catalog message.
    pub fn translation_values(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::TooLarge {
                file_name,
                max_size,
            } => vec![("fileName", file_name.clone()), ("maxSize", max_size.clone())],
            Self::InvalidFileObject { file_name } | Self::UnsupportedType { file_name } => {
                vec![("fileName", file_name.clone())]
            }
            Self::FailedWithStatus { file_name, status } => {
                vec![("fileName", file_name.clone()), ("status", status.clone())]
            }
            _ => Vec::new(),
        }
    }

    /// Renders the category through a translator.
    pub fn render(&self, translator: &dyn Translate) -> String {
        match (self, self.translation_key()) {
            (Self::Verbatim { message }, _) => message.clone(),
            (_, Some(key)) => translator.translate(key, &self.translation_values()),
            (_, None) => String::new(),
        }
    }
}

impl From<&ValidationError> for UploadErrorCategory {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::UnsupportedType { file_name, .. } => Self::UnsupportedType {
                file_name: file_name.clone(),
            },
            ValidationError::TooLarge {
                file_name,
                max_size,
            } => Self::TooLarge {
                file_name: file_name.clone(),
                max_size: format_bytes(*max_size),
            },
            ValidationError::AlreadyAttached => Self::AlreadyAttached,
        }
    }
}

impl From<&TransportFailure> for UploadErrorCategory {
    fn from(failure: &TransportFailure) -> Self {
        match failure {
            TransportFailure::MissingEndpoint | TransportFailure::InvalidEndpoint(_) => {
                Self::MissingEndpoint
            }
            TransportFailure::InvalidFile { file_name, .. } => Self::InvalidFileObject {
                file_name: file_name.clone(),
            },
            TransportFailure::Status { file_name, status } => Self::FailedWithStatus {
                file_name: file_name.clone(),
                status: status.to_string(),
            },
            TransportFailure::Network(message) => classify(message),
            TransportFailure::InvalidResponse(_) => Self::Verbatim {
                message: failure.to_string(),
            },
        }
    }
}

impl From<&MissingResumeId> for UploadErrorCategory {
    fn from(_: &MissingResumeId) -> Self {
        Self::SuccessMissingId
    }
}

/// Classifies a raw failure message. First match wins.
pub fn classify(raw: &str) -> UploadErrorCategory {
    if raw.trim().is_empty() {
        return UploadErrorCategory::UnknownError;
    }

    if let Some(caps) = TOO_LARGE.captures(raw) {
        return UploadErrorCategory::TooLarge {
            file_name: caps[1].to_string(),
            max_size: caps[2].to_string(),
        };
    }

    if let Some(caps) = INVALID_FILE.captures(raw) {
        return UploadErrorCategory::InvalidFileObject {
            file_name: caps[1].to_string(),
        };
    }

    if raw.contains(MISSING_ENDPOINT_MARKER) {
        return UploadErrorCategory::MissingEndpoint;
    }

    if let Some(caps) = FAILED_WITH_STATUS.captures(raw) {
        return UploadErrorCategory::FailedWithStatus {
            file_name: caps[1].to_string(),
            status: caps[2].to_string(),
        };
    }

    if let Some(caps) = UNSUPPORTED_TYPE.captures(raw) {
        return UploadErrorCategory::UnsupportedType {
            file_name: caps[1].to_string(),
        };
    }

    if raw == ALREADY_ATTACHED_TEXT {
        return UploadErrorCategory::AlreadyAttached;
    }

    if MISSING_RESUME_ID.is_match(raw) {
        return UploadErrorCategory::SuccessMissingId;
    }

    UploadErrorCategory::Verbatim {
        message: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resumedrop_i18n::{Locale, Translator};

    #[test]
    fn classifies_too_large() {
        assert_eq!(
            classify("File \"cv.pdf\" exceeds the maximum size of 2MB."),
            UploadErrorCategory::TooLarge {
                file_name: "cv.pdf".into(),
                max_size: "2MB".into(),
            }
        );
    }

    #[test]
    fn classifies_invalid_file_object() {
        assert_eq!(
            classify("Cannot upload \"cv.pdf\"; it is not a valid File object"),
            UploadErrorCategory::InvalidFileObject {
                file_name: "cv.pdf".into()
            }
        );
    }

    #[test]
    fn classifies_missing_endpoint_by_substring() {
        assert_eq!(
            classify("Error: Upload URL is not configured for this widget"),
            UploadErrorCategory::MissingEndpoint
        );
    }

    #[test]
    fn classifies_status_failure() {
        assert_eq!(
            classify("Upload failed for cv.pdf. Status: 500"),
            UploadErrorCategory::FailedWithStatus {
                file_name: "cv.pdf".into(),
                status: "500".into(),
            }
        );
    }

    #[test]
    fn empty_is_unknown() {
        assert_eq!(classify(""), UploadErrorCategory::UnknownError);
        assert_eq!(classify("   "), UploadErrorCategory::UnknownError);
    }

    #[test]
    fn unrecognized_is_verbatim() {
        assert_eq!(
            classify("some unrecognized text"),
            UploadErrorCategory::Verbatim {
                message: "some unrecognized text".into()
            }
        );
    }

    #[test]
    fn own_error_texts_round_trip_to_structured_category() {
        let validation = [
            ValidationError::UnsupportedType {
                file_name: "a.png".into(),
                mime_type: "image/png".into(),
            },
            ValidationError::TooLarge {
                file_name: "big.pdf".into(),
                max_size: 2 * 1024 * 1024,
            },
            ValidationError::AlreadyAttached,
        ];
        for err in &validation {
            assert_eq!(classify(&err.to_string()), UploadErrorCategory::from(err));
        }

        let transport = [
            TransportFailure::MissingEndpoint,
            TransportFailure::InvalidEndpoint("relative URL without a base".into()),
            TransportFailure::InvalidFile {
                file_name: "cv.pdf".into(),
                reason: "permission denied".into(),
            },
            TransportFailure::Status {
                file_name: "cv.pdf".into(),
                status: 413,
            },
        ];
        for failure in &transport {
            assert_eq!(
                classify(&failure.to_string()),
                UploadErrorCategory::from(failure)
            );
        }

        let missing = MissingResumeId {
            file_name: "cv.pdf".into(),
        };
        assert_eq!(
            classify(&missing.to_string()),
            UploadErrorCategory::SuccessMissingId
        );
    }

    #[test]
    fn network_failures_keep_their_text() {
        let failure = TransportFailure::Network("connection refused".into());
        assert_eq!(
            UploadErrorCategory::from(&failure),
            UploadErrorCategory::Verbatim {
                message: "connection refused".into()
            }
        );
        assert_eq!(
            UploadErrorCategory::from(&TransportFailure::Network(String::new())),
            UploadErrorCategory::UnknownError
        );
    }

    #[test]
    fn render_uses_translation_keys() {
        let t = Translator::new(Locale::EnUs).unwrap();
        let category = UploadErrorCategory::FailedWithStatus {
            file_name: "cv.pdf".into(),
            status: "500".into(),
        };
        assert_eq!(category.render(&t), "Upload failed for cv.pdf (status 500).");

        let verbatim = UploadErrorCategory::Verbatim {
            message: "boom".into(),
        };
        assert_eq!(verbatim.translation_key(), None);
        assert_eq!(verbatim.render(&t), "boom");
    }
}
