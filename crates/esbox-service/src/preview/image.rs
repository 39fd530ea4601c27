//! Image viewer.

use serde::{Deserialize, Serialize};

use super::controls::{LoadState, Rotation, Zoom, ZoomRange};

/// Zoom limits for the image viewer.
pub const IMAGE_ZOOM: ZoomRange = ZoomRange {
    min: 0.25,
    max: 4.0,
    step: 0.25,
    default: 1.0,
};

/// Zoomable, rotatable image preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageViewer {
    /// Stream URL the image loads from.
    pub url: String,
    /// Load status.
    pub load: LoadState,
    pub zoom: Zoom,
    pub rotation: Rotation,
    pub fullscreen: bool,
}

impl ImageViewer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            load: LoadState::Loading,
            zoom: Zoom::new(IMAGE_ZOOM),
            rotation: Rotation::default(),
            fullscreen: false,
        }
    }

    /// Mark the image as loaded.
    pub fn on_loaded(&mut self) {
        self.load.ready();
    }

    pub fn on_error(&mut self, message: impl Into<String>) {
        self.load.fail(message);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    /// Back to the default zoom and orientation.
    pub fn reset_view(&mut self) {
        self.zoom.reset();
        self.rotation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_bounds() {
        let mut viewer = ImageViewer::new("http://x/files/1/view");
        assert_eq!(viewer.zoom.value(), 1.0);
        viewer.zoom.zoom_out();
        viewer.zoom.zoom_out();
        viewer.zoom.zoom_out();
        viewer.zoom.zoom_out();
        assert_eq!(viewer.zoom.value(), 0.25);
        viewer.rotation.rotate_cw();
        viewer.reset_view();
        assert_eq!(viewer.zoom.value(), 1.0);
        assert_eq!(viewer.rotation.degrees(), 0);
    }

    #[test]
    fn test_error_then_load_stays_failed() {
        let mut viewer = ImageViewer::new("u");
        viewer.on_error("Error loading image");
        viewer.on_loaded();
        assert!(viewer.load.is_failed());
    }
}
