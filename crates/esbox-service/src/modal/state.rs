//! The active-dialog slot.

use tracing::debug;

use super::dialog::{Modal, ModalKind};

/// Holds at most one open dialog.
///
/// Opening always replaces whatever was open; there is no stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalState {
    active: Option<Modal>,
}

impl ModalState {
    /// No dialog open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `modal`, discarding any open dialog and its payload.
    pub fn open(&mut self, modal: Modal) {
        if let Some(previous) = &self.active {
            debug!(from = %previous.kind(), to = %modal.kind(), "Replacing open dialog");
        }
        self.active = Some(modal);
    }

    /// Close the open dialog, if any.
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Close and hand back the dialog that was open.
    pub fn take(&mut self) -> Option<Modal> {
        self.active.take()
    }

    /// The open dialog.
    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    /// Kind of the open dialog.
    pub fn kind(&self) -> Option<ModalKind> {
        self.active.as_ref().map(Modal::kind)
    }

    /// Whether a dialog is open.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esbox_core::types::{FileId, FolderId};
    use esbox_entity::File;

    fn file() -> File {
        File {
            id: FileId(7),
            filename: "clip.mp4".to_string(),
            parent_id: Some(FolderId(42)),
            mime_type: Some("video/mp4".to_string()),
            file_size: 100,
            is_starred: false,
            uploaded_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_open_replaces_previous_payload() {
        let mut modal = ModalState::new();
        modal.open(Modal::DeleteFile { file: file() });
        modal.open(Modal::NewFolder {
            parent_id: Some(FolderId(42)),
        });

        assert_eq!(modal.kind(), Some(ModalKind::NewFolder));
        assert_eq!(
            modal.active(),
            Some(&Modal::NewFolder {
                parent_id: Some(FolderId(42))
            })
        );
    }

    #[test]
    fn test_close_clears_slot() {
        let mut modal = ModalState::new();
        modal.open(Modal::TelegramLink);
        assert!(modal.is_open());
        modal.close();
        assert!(!modal.is_open());
        assert_eq!(modal.take(), None);
    }

    #[test]
    fn test_preview_dialog_follows_media_kind() {
        let dialog = Modal::preview(file(), "http://x/files/7/view".to_string()).unwrap();
        assert_eq!(dialog.kind(), ModalKind::StreamVideo);
        assert_eq!(dialog.title(), "clip.mp4");

        let mut text = file();
        text.filename = "a.txt".to_string();
        text.mime_type = Some("text/plain".to_string());
        assert!(Modal::preview(text, String::new()).is_none());
    }

    #[test]
    fn test_serialized_tag_uses_dialog_names() {
        let value = serde_json::to_value(Modal::StreamPdf {
            file: file(),
            url: "u".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "streamPDF");
        assert_eq!(ModalKind::StreamPdf.to_string(), "streamPDF");
    }
}
