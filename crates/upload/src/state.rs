//! The upload state machine.
//!
//! [`FileUploadState`] is read-only outside this crate. Every mutation goes
//! through one of the crate-private transitions below, which the
//! orchestrator calls:
//!
//! ```text
//! Empty   --attach (valid)-->   Pending
//! Empty   --attach (invalid)--> Empty    (+ error)
//! Pending --begin_upload-->     Uploading
//! Uploading --complete-->       Uploaded
//! Uploading --fail-->           Failed
//! Pending | Uploaded | Failed --remove--> Empty
//! ```

use tracing::debug;
use uuid::Uuid;

use crate::classify::UploadErrorCategory;
use crate::error::{UploadError, ValidationError};
use crate::files::{FileSource, SelectedFile};
use crate::validation::ValidationRules;

/// Lifecycle of the attached file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Validated, not yet submitted.
    Pending,
    /// A submission is in flight.
    Uploading,
    /// The endpoint stored the file under `resume_id`.
    Uploaded { resume_id: String },
    /// Submission failed; `error` is the raw failure text.
    Failed { error: String },
}

/// The single file staged for upload.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub status: FileStatus,
    pub(crate) source: FileSource,
}

impl AttachedFile {
    fn from_candidate(candidate: SelectedFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name,
            size_bytes: candidate.size_bytes,
            mime_type: candidate.mime_type,
            status: FileStatus::Pending,
            source: candidate.source,
        }
    }

    /// Raw failure text, present only when the status is `Failed`.
    pub fn upload_error(&self) -> Option<&str> {
        match &self.status {
            FileStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            FileStatus::Uploaded { .. } | FileStatus::Failed { .. }
        )
    }
}

/// Attached file, drag flag and current error categories.
#[derive(Debug, Clone, Default)]
pub struct FileUploadState {
    file: Option<AttachedFile>,
    is_dragging: bool,
    errors: Vec<UploadErrorCategory>,
}

impl FileUploadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&AttachedFile> {
        self.file.as_ref()
    }

    pub fn status(&self) -> Option<&FileStatus> {
        self.file.as_ref().map(|f| &f.status)
    }

    /// True when no file is attached.
    pub fn is_empty(&self) -> bool {
        self.file.is_none()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// True while a submission is outstanding.
    pub fn is_uploading_global(&self) -> bool {
        matches!(self.status(), Some(FileStatus::Uploading))
    }

    /// Current errors in the order they were recorded.
    pub fn errors(&self) -> &[UploadErrorCategory] {
        &self.errors
    }

    /// Validates `candidate` and, if accepted, makes it the pending file.
    ///
    /// Prior feedback is always replaced. A rejection while a file is
    /// attached leaves the file and its status untouched; only the errors
    /// become `[AlreadyAttached]`.
    pub(crate) fn attach(
        &mut self,
        candidate: SelectedFile,
        rules: &ValidationRules,
    ) -> Result<&AttachedFile, ValidationError> {
        let already_attached = self.file.is_some();
        self.errors.clear();

        if let Err(err) = rules.validate(&candidate, already_attached) {
            debug!(file = %candidate.name, error = %err, "candidate rejected");
            self.errors.push(UploadErrorCategory::from(&err));
            return Err(err);
        }

        let attached = self.file.insert(AttachedFile::from_candidate(candidate));
        debug!(file = %attached.name, id = %attached.id, "file attached");
        Ok(attached)
    }

    /// `Pending -> Uploading`. Clears errors left from validation.
    pub(crate) fn begin_upload(&mut self) -> Result<&AttachedFile, UploadError> {
        let file = self.file.as_mut().ok_or(UploadError::NothingPending)?;
        match file.status {
            FileStatus::Pending => {}
            FileStatus::Uploading => return Err(UploadError::Busy),
            _ => return Err(UploadError::NothingPending),
        }

        file.status = FileStatus::Uploading;
        self.errors.clear();
        self.is_dragging = false;
        debug!(file = %file.name, "upload started");
        Ok(file)
    }

    /// `Uploading -> Uploaded`.
    pub(crate) fn complete(&mut self, resume_id: String) -> Result<(), UploadError> {
        let file = self.uploading_file()?;
        file.status = FileStatus::Uploaded { resume_id };
        self.errors.clear();
        Ok(())
    }

    /// `Uploading -> Failed`, recording the classified category.
    pub(crate) fn fail(
        &mut self,
        error: String,
        category: UploadErrorCategory,
    ) -> Result<(), UploadError> {
        let file = self.uploading_file()?;
        file.status = FileStatus::Failed { error };
        self.errors = vec![category];
        Ok(())
    }

    /// Back to `Empty` from any non-uploading state, clearing errors.
    pub(crate) fn remove(&mut self) -> Result<Option<AttachedFile>, UploadError> {
        if self.is_uploading_global() {
            return Err(UploadError::Busy);
        }
        Ok(self.reset())
    }

    /// Drops an in-flight upload whose result will be discarded.
    pub(crate) fn abandon_upload(&mut self) -> Result<Option<AttachedFile>, UploadError> {
        if !self.is_uploading_global() {
            return Err(UploadError::NotUploading);
        }
        Ok(self.reset())
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    fn reset(&mut self) -> Option<AttachedFile> {
        self.errors.clear();
        self.is_dragging = false;
        self.file.take()
    }

    fn uploading_file(&mut self) -> Result<&mut AttachedFile, UploadError> {
        match self.file.as_mut() {
            Some(file) if file.status == FileStatus::Uploading => Ok(file),
            _ => Err(UploadError::NotUploading),
        }
    }
}
