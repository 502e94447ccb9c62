use crate::config::UploadConfig;
use crate::error::ValidationError;
use crate::files::SelectedFile;

/// Acceptance rules applied to a candidate before it becomes the attached file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    accepted_mime_types: Vec<String>,
    max_size_bytes: u64,
    single_file: bool,
}

impl ValidationRules {
    pub fn new(accepted_mime_types: Vec<String>, max_size_bytes: u64) -> Self {
        Self {
            accepted_mime_types: accepted_mime_types
                .iter()
                .map(|m| mime_essence(m))
                .collect(),
            max_size_bytes,
            single_file: true,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.accepted_mime_types.clone(), config.max_size_bytes)
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Comma-joined list for a file input's `accept` attribute.
    pub fn accept_attribute(&self) -> String {
        self.accepted_mime_types.join(",")
    }

    /// Whether `mime_type` is accepted. Case and parameters are ignored.
    pub fn accepts_mime(&self, mime_type: &str) -> bool {
        let essence = mime_essence(mime_type);
        self.accepted_mime_types.iter().any(|m| *m == essence)
    }

    /// Checks a candidate.
    ///
    /// Rejects, in order:
    /// - Any candidate while a file is already attached
    /// - MIME types outside the accepted set
    /// - Sizes strictly above the maximum
    pub fn validate(
        &self,
        candidate: &SelectedFile,
        already_attached: bool,
    ) -> Result<(), ValidationError> {
        if already_attached && self.single_file {
            return Err(ValidationError::AlreadyAttached);
        }

        if !self.accepts_mime(&candidate.mime_type) {
            return Err(ValidationError::UnsupportedType {
                file_name: candidate.name.clone(),
                mime_type: candidate.mime_type.clone(),
            });
        }

        if candidate.size_bytes > self.max_size_bytes {
            return Err(ValidationError::TooLarge {
                file_name: candidate.name.clone(),
                max_size: self.max_size_bytes,
            });
        }

        Ok(())
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

/// `Application/PDF; charset=binary` → `application/pdf`.
fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
