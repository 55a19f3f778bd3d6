/// Application name
pub const APP_NAME: &str = "Parley";

/// MIME types accepted for image attachments
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// MIME types accepted for document attachments
pub const ALLOWED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// MIME types accepted for video attachments
pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/ogg"];

/// Maximum image attachment size in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum document attachment size in bytes (10 MiB)
pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum video attachment size in bytes (50 MiB)
pub const MAX_VIDEO_SIZE: u64 = 50 * 1024 * 1024;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Simulated assistant round-trip delay in milliseconds
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1500;

/// Base URL for simulated uploads. No bytes are ever written there; the
/// server only fabricates `<base>/<uuid><ext>` display URLs.
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://example.com/uploads";

/// First transcript entry shown to the user
pub const GREETING: &str = "Hello! How can I assist you today? I can now process text, \
    images, documents, and videos. Try uploading a file to get started.";
