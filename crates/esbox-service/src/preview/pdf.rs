//! PDF viewer.

use serde::{Deserialize, Serialize};

use super::controls::{LoadState, Rotation, Zoom, ZoomRange};

/// Zoom limits for the PDF viewer.
pub const PDF_ZOOM: ZoomRange = ZoomRange {
    min: 0.6,
    max: 3.0,
    step: 0.2,
    default: 1.2,
};

/// Count `/Type /Page` objects in a PDF; at least one.
///
/// Page tree nodes (`/Type /Pages`) are not counted. Compressed object
/// streams hide their pages, in which case the document shows as one page.
pub fn count_pages(pdf: &[u8]) -> u32 {
    const TYPE: &[u8] = b"/Type";
    let mut count = 0u32;
    let mut rest = pdf;
    while let Some(at) = find(rest, TYPE) {
        rest = &rest[at + TYPE.len()..];
        let value = trim_start(rest);
        if let Some(after) = value.strip_prefix(b"/Page".as_slice()) {
            let is_tree = after.first().is_some_and(|b| b.is_ascii_alphanumeric());
            if !is_tree {
                count = count.saturating_add(1);
            }
        }
    }
    count.max(1)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[skip..]
}

/// Paged document preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfViewer {
    /// Stream URL the document loads from.
    pub url: String,
    /// Load status.
    pub load: LoadState,
    /// 1-based page shown.
    page: u32,
    /// Page count, known once the document has loaded.
    pages: Option<u32>,
    /// Zoom level.
    pub zoom: Zoom,
    /// Page rotation.
    pub rotation: Rotation,
    /// Whether the viewer fills the screen.
    pub fullscreen: bool,
}

impl PdfViewer {
    /// A viewer on page 1 that is still loading.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            load: LoadState::Loading,
            page: 1,
            pages: None,
            zoom: Zoom::new(PDF_ZOOM),
            rotation: Rotation::default(),
            fullscreen: false,
        }
    }

    /// The document loaded with `pages` pages.
    pub fn on_loaded(&mut self, pages: u32) {
        if self.load.is_failed() {
            return;
        }
        self.pages = Some(pages.max(1));
        self.page = self.page.clamp(1, self.last_page());
        self.load.ready();
    }

    /// Mark the document as failed to load.
    pub fn on_error(&mut self, message: impl Into<String>) {
        self.load.fail(message);
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page count, once loaded.
    pub fn pages(&self) -> Option<u32> {
        self.pages
    }

    /// Advance one page; stops at the last page.
    pub fn next_page(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    /// Go back one page; stops at page 1.
    pub fn prev_page(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    /// Show `page`, clamped to the document.
    pub fn go_to(&mut self, page: u32) {
        self.page = page.clamp(1, self.last_page());
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    fn last_page(&self) -> u32 {
        self.pages.unwrap_or(1)
    }
}
