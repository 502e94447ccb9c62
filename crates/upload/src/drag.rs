//! Drag-and-drop capture for the drop zone.

use tracing::trace;

use crate::files::SelectedFile;
use crate::state::FileUploadState;

/// A drag event as seen by the drop zone.
#[derive(Debug, Clone)]
pub enum DragIntent {
    Enter,
    Leave,
    Over,
    /// Files carried by the drop, in payload order.
    Drop(Vec<SelectedFile>),
}

/// Whether the drop zone (drag and click-to-browse) accepts interaction.
///
/// Disabled while uploading, while a file is attached, or while the upload
/// is blocked on a missing access token.
pub fn drop_zone_enabled(state: &FileUploadState, upload_disabled: bool) -> bool {
    !state.is_uploading_global() && state.is_empty() && !upload_disabled
}

/// Applies a drag intent to the state.
///
/// Returns the file to attach for a drop on an enabled zone: only the first
/// file of the payload, the rest are ignored.
pub(crate) fn capture(
    state: &mut FileUploadState,
    upload_disabled: bool,
    intent: DragIntent,
) -> Option<SelectedFile> {
    if !drop_zone_enabled(state, upload_disabled) {
        trace!(?intent, "drag ignored, drop zone disabled");
        return None;
    }

    match intent {
        DragIntent::Enter | DragIntent::Over => {
            state.set_dragging(true);
            None
        }
        DragIntent::Leave => {
            state.set_dragging(false);
            None
        }
        DragIntent::Drop(files) => {
            state.set_dragging(false);
            if files.len() > 1 {
                trace!(ignored = files.len() - 1, "extra dropped files ignored");
            }
            files.into_iter().next()
        }
    }
}
