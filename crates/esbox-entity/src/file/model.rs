//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esbox_core::types::{FileId, FolderId};

/// A file snapshot as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    #[serde(alias = "file_id")]
    pub id: FileId,
    /// The file name (including extension).
    #[serde(alias = "file_name")]
    pub filename: String,
    /// The folder containing this file (null for top level).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// MIME type reported at upload.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// File size in bytes.
    #[serde(default, alias = "size")]
    pub file_size: i64,
    /// Whether the user starred this file.
    #[serde(default)]
    pub is_starred: bool,
    /// When the file was uploaded.
    #[serde(default, alias = "created_at")]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// When the file was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Which preview widget can render a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Raster or vector image.
    Image,
    /// PDF document.
    Pdf,
    /// Video stream.
    Video,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase)
    }

    /// Resolve the preview kind from the MIME type, falling back to the extension.
    pub fn media_kind(&self) -> Option<MediaKind> {
        if let Some(mime) = self.mime_type.as_deref() {
            let mime = mime.to_ascii_lowercase();
            if mime.starts_with("image/") {
                return Some(MediaKind::Image);
            }
            if mime == "application/pdf" {
                return Some(MediaKind::Pdf);
            }
            if mime.starts_with("video/") {
                return Some(MediaKind::Video);
            }
        }

        match self.extension()?.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" => Some(MediaKind::Image),
            "pdf" => Some(MediaKind::Pdf),
            "mp4" | "webm" | "mkv" | "mov" | "avi" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: Option<&str>) -> File {
        File {
            id: FileId(1),
            filename: name.to_string(),
            parent_id: None,
            mime_type: mime.map(str::to_string),
            file_size: 0,
            is_starred: false,
            uploaded_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(file("Report.PDF", None).extension().as_deref(), Some("pdf"));
        assert_eq!(file("Makefile", None).extension(), None);
        assert_eq!(file("archive.", None).extension(), None);
        assert_eq!(file("backup.tar.GZ", None).extension().as_deref(), Some("gz"));
    }

    #[test]
    fn test_media_kind_prefers_mime() {
        assert_eq!(
            file("clip.bin", Some("video/mp4")).media_kind(),
            Some(MediaKind::Video)
        );
        assert_eq!(file("scan.pdf", None).media_kind(), Some(MediaKind::Pdf));
        assert_eq!(file("notes.txt", Some("text/plain")).media_kind(), None);
    }

    #[test]
    fn test_deserialize_accepts_size_alias() {
        let json = r#"{"id": 7, "filename": "a.png", "size": 2048, "parent_id": 42}"#;
        let f: File = serde_json::from_str(json).unwrap();
        assert_eq!(f.file_size, 2048);
        assert_eq!(f.parent_id, Some(FolderId(42)));
        assert!(!f.is_starred);
    }
}
