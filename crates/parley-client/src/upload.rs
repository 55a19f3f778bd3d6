//! Pending upload staging and the simulated upload step.
//!
//! The original build never uploads anything: the staged file is read and
//! re-encoded as a `data:` URL so the transcript can display it. This module
//! keeps that behavior.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use parley_shared::types::FileCategory;

/// The one unsent file staged between selection and send.
///
/// Constructed only by [`crate::ChatSession::select_file`] after intake
/// validation passed, so a `PendingUpload` never describes an invalid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub category: FileCategory,
    pub path: PathBuf,
    /// Filename as shown in the preview and in messages without a caption.
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// Detect a file's MIME type from its filename, the way the browser's file
/// picker declares one. Unknown extensions fall back to octet-stream, which
/// no allow-list accepts.
pub fn detect_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read the staged file and encode it as a displayable `data:` URL.
///
/// Stands in for a real upload; the one-shot read is the only point where
/// file content is touched.
pub async fn encode_data_url(pending: &PendingUpload) -> std::io::Result<String> {
    let bytes = tokio::fs::read(&pending.path).await?;
    Ok(format!("data:{};base64,{}", pending.mime, STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_known_extensions() {
        assert_eq!(detect_mime(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(detect_mime(Path::new("photo.png")), "image/png");
        assert_eq!(detect_mime(Path::new("report.pdf")), "application/pdf");
        assert_eq!(detect_mime(Path::new("notes.txt")), "text/plain");
        assert_eq!(detect_mime(Path::new("clip.mp4")), "video/mp4");
    }

    #[test]
    fn test_detect_mime_unknown_extension_is_octet_stream() {
        assert_eq!(
            detect_mime(Path::new("mystery.xyz123")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_encode_data_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hi").unwrap();

        let pending = PendingUpload {
            category: FileCategory::Document,
            path,
            name: "notes.txt".to_string(),
            mime: "text/plain".to_string(),
            size: 2,
        };

        let url = encode_data_url(&pending).await.unwrap();
        assert_eq!(url, "data:text/plain;base64,aGk=");
    }

    #[tokio::test]
    async fn test_encode_data_url_missing_file_fails() {
        let pending = PendingUpload {
            category: FileCategory::Image,
            path: PathBuf::from("/nonexistent/file.jpg"),
            name: "file.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            size: 0,
        };
        assert!(encode_data_url(&pending).await.is_err());
    }
}
