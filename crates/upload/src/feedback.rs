//! Feedback derived from the upload state.
//!
//! Nothing here is stored. The banner, status labels and drop-zone
//! affordance are recomputed from [`FileUploadState`] whenever the UI
//! redraws.

use resumedrop_i18n::Translate;

use crate::classify::UploadErrorCategory;
use crate::drag::drop_zone_enabled;
use crate::state::{FileStatus, FileUploadState};

/// Visual style of a rendered banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// The feedback banner for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackBanner {
    None,
    Success { file_name: String },
    Error(Vec<UploadErrorCategory>),
}

/// A banner after translation, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBanner {
    pub kind: BannerKind,
    pub title: String,
    pub lines: Vec<String>,
}

impl FeedbackBanner {
    /// Computes the banner. Hidden while an upload is in flight.
    pub fn derive(state: &FileUploadState) -> Self {
        if state.is_uploading_global() {
            return Self::None;
        }

        if let Some(file) = state.file()
            && let FileStatus::Uploaded { .. } = file.status
        {
            return Self::Success {
                file_name: file.name.clone(),
            };
        }

        if state.errors().is_empty() {
            Self::None
        } else {
            Self::Error(state.errors().to_vec())
        }
    }

    pub fn kind(&self) -> Option<BannerKind> {
        match self {
            Self::None => None,
            Self::Success { .. } => Some(BannerKind::Success),
            Self::Error(_) => Some(BannerKind::Error),
        }
    }

    /// Translates the banner, or `None` when there is nothing to show.
    pub fn render(&self, translator: &dyn Translate) -> Option<RenderedBanner> {
        match self {
            Self::None => None,
            Self::Success { file_name } => Some(RenderedBanner {
                kind: BannerKind::Success,
                title: translator.translate("common.status.success", &[]),
                lines: vec![translator.translate(
                    "upload.feedback.success",
                    &[("fileName", file_name.clone())],
                )],
            }),
            Self::Error(categories) => Some(RenderedBanner {
                kind: BannerKind::Error,
                title: translator.translate("common.status.failed", &[]),
                lines: categories.iter().map(|c| c.render(translator)).collect(),
            }),
        }
    }
}

/// Catalog key for a file status label.
pub fn status_label_key(status: &FileStatus) -> &'static str {
    match status {
        FileStatus::Pending => "upload.status.pending",
        FileStatus::Uploading => "upload.status.uploading",
        FileStatus::Uploaded { .. } => "upload.status.uploaded",
        FileStatus::Failed { .. } => "upload.status.failed",
    }
}

/// What the drop zone currently invites the user to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZoneAffordance {
    Uploading,
    TokenRequired,
    FileReady,
    SelectFile,
}

impl DropZoneAffordance {
    pub fn derive(state: &FileUploadState, upload_disabled: bool) -> Self {
        if state.is_uploading_global() {
            Self::Uploading
        } else if upload_disabled {
            Self::TokenRequired
        } else if !state.is_empty() {
            Self::FileReady
        } else {
            Self::SelectFile
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Self::Uploading => "common.status.uploading",
            Self::TokenRequired => "upload.labels.promptToken",
            Self::FileReady => "upload.labels.fileReady",
            Self::SelectFile => "upload.labels.fileArea",
        }
    }

    /// Accessible name for the zone. Once a file is attached the zone
    /// doubles as the remove control.
    pub fn aria_label_key(state: &FileUploadState) -> &'static str {
        if state.is_empty() {
            "upload.labels.fileArea"
        } else {
            "upload.labels.fileSelected"
        }
    }

    /// Whether the zone reacts to drags and clicks in this state.
    pub fn interactive(state: &FileUploadState, upload_disabled: bool) -> bool {
        drop_zone_enabled(state, upload_disabled)
    }
}
