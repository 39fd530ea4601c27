//! Local state of the media preview dialogs.
//!
//! Viewers hold view-only state (zoom, rotation, playback) and never touch
//! the backend themselves; the front end feeds them load events.

pub mod controls;
pub mod image;
pub mod loader;
pub mod pdf;
pub mod video;

use serde::{Deserialize, Serialize};

use esbox_entity::{File, MediaKind};

pub use controls::{LoadState, Rotation, Zoom, ZoomRange};
pub use image::ImageViewer;
pub use loader::{download, fetch};
pub use pdf::{PdfViewer, count_pages};
pub use video::{VideoPlayer, format_time};

/// A viewer for one file, chosen from its media kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Preview {
    Image(ImageViewer),
    Pdf(PdfViewer),
    Video(VideoPlayer),
}

impl Preview {
    /// Open the matching viewer for `file`, or `None` when it cannot be previewed.
    pub fn for_file(file: &File, url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Some(match file.media_kind()? {
            MediaKind::Image => Self::Image(ImageViewer::new(url)),
            MediaKind::Pdf => Self::Pdf(PdfViewer::new(url)),
            MediaKind::Video => Self::Video(VideoPlayer::new(url)),
        })
    }

    /// Current load state of the viewer.
    pub fn load_state(&self) -> &LoadState {
        match self {
            Self::Image(v) => &v.load,
            Self::Pdf(v) => &v.load,
            Self::Video(v) => &v.load,
        }
    }

    /// The stream URL the viewer is bound to.
    pub fn url(&self) -> &str {
        match self {
            Self::Image(v) => &v.url,
            Self::Pdf(v) => &v.url,
            Self::Video(v) => &v.url,
        }
    }

    /// The media finished loading.
    ///
    /// PDF page counts are read from the document. Video duration comes
    /// from a player, so a viewer fed raw bytes reports an unknown length.
    pub fn on_media(&mut self, media: &[u8]) {
        match self {
            Self::Image(v) => v.on_loaded(),
            Self::Pdf(v) => v.on_loaded(count_pages(media)),
            Self::Video(v) => v.on_loaded(0.0),
        }
    }

    /// Record a load failure; terminal for this viewer.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        match self {
            Self::Image(v) => v.load.fail(message),
            Self::Pdf(v) => v.load.fail(message),
            Self::Video(v) => v.load.fail(message),
        }
    }
}
