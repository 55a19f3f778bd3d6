//! The chat session state machine.
//!
//! One exchange runs `Idle -> Composing (text/file staged) -> Sending
//! (simulated delay) -> Idle`. The send and attach controls are disabled
//! while a send is outstanding, so exchanges never overlap and an in-flight
//! send cannot be cancelled.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use parley_shared::constants::{DEFAULT_REPLY_DELAY_MS, GREETING};
use parley_shared::error::IntakeError;
use parley_shared::intake::{self, FileMeta};
use parley_shared::reply::compose_reply;
use parley_shared::types::{Attachment, FileCategory, Message};

use crate::upload::{self, PendingUpload};

/// Transient user-facing notice. The `Display` text is what the UI shows;
/// every notice is terminal for the one action that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Intake validation rejected the selected file.
    #[error(transparent)]
    Rejected(#[from] IntakeError),

    /// A file is already staged; it must be removed before another
    /// selection (mirrors the disabled attach control).
    #[error("A file is already attached")]
    AlreadyStaged,

    /// A send is outstanding (mirrors the disabled send control).
    #[error("A send is already in progress")]
    SendInProgress,

    /// Reading or encoding the staged file failed.
    #[error("File upload failed")]
    ProcessingFailed,
}

/// What a call to [`ChatSession::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Neither text nor a staged file: the submit was ignored, nothing ran.
    Ignored,
    /// The exchange completed and the bot reply was appended.
    Replied,
}

/// Central session state.
///
/// Holds the transcript, the at-most-one pending upload, and the sending
/// flag. All mutation goes through `&mut self`, so state transitions are
/// serialized the way a single UI thread would run them.
pub struct ChatSession {
    transcript: Vec<Message>,
    pending: Option<PendingUpload>,
    sending: bool,
    reply_delay: Duration,
}

impl ChatSession {
    /// Create a session whose transcript starts with the bot greeting.
    pub fn new() -> Self {
        Self {
            transcript: vec![Message::bot(GREETING)],
            pending: None,
            sending: false,
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
        }
    }

    /// Override the simulated round-trip delay (tests run at zero).
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// The append-only transcript, oldest first.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending_upload(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Stage a file for the next send.
    ///
    /// The file's size is taken from the filesystem and its MIME type from
    /// the filename; both are gated by intake validation before anything is
    /// staged. A rejection leaves existing state untouched, so the same
    /// file can simply be selected again.
    pub fn select_file(
        &mut self,
        path: impl AsRef<Path>,
        category: FileCategory,
    ) -> Result<(), Notice> {
        if self.sending {
            return Err(Notice::SendInProgress);
        }
        if self.pending.is_some() {
            return Err(Notice::AlreadyStaged);
        }

        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let size = std::fs::metadata(path)
            .map_err(|_| Notice::ProcessingFailed)?
            .len();
        let mime = upload::detect_mime(path);

        let meta = FileMeta {
            name: name.clone(),
            mime: mime.clone(),
            size,
        };
        intake::validate(&meta, category)?;

        debug!(name = %name, category = %category, size, "Staged pending upload");

        self.pending = Some(PendingUpload {
            category,
            path: path.to_path_buf(),
            name,
            mime,
            size,
        });
        Ok(())
    }

    /// Discard the staged file without sending it.
    pub fn remove_file(&mut self) {
        self.pending = None;
    }

    /// Submit the composed exchange.
    ///
    /// With neither text (after trimming) nor a staged file this is a no-op:
    /// the transcript is untouched and no timer runs. Otherwise the staged
    /// file (if any) is encoded to a `data:` URL, the user message is
    /// appended, and after the simulated delay the bot reply is appended.
    ///
    /// A failed file read is terminal for this send only: the notice is
    /// returned, the transcript stays unchanged and the file stays staged
    /// so the user can retry.
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome, Notice> {
        if self.sending {
            return Err(Notice::SendInProgress);
        }

        let text = text.trim().to_string();
        if text.is_empty() && self.pending.is_none() {
            return Ok(SendOutcome::Ignored);
        }

        self.sending = true;
        let outcome = self.send_inner(&text).await;
        self.sending = false;
        outcome
    }

    async fn send_inner(&mut self, text: &str) -> Result<SendOutcome, Notice> {
        let attachment = match &self.pending {
            Some(pending) => {
                let url = upload::encode_data_url(pending).await.map_err(|e| {
                    tracing::error!(error = %e, name = %pending.name, "Failed to read staged file");
                    Notice::ProcessingFailed
                })?;
                Some(Attachment {
                    category: pending.category,
                    url,
                    name: pending.name.clone(),
                    size: Some(pending.size),
                })
            }
            None => None,
        };

        // Messages without a caption show the filename instead.
        let content = if text.is_empty() {
            attachment
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "Uploaded a file".to_string())
        } else {
            text.to_string()
        };

        self.transcript.push(Message::user(content, attachment.clone()));
        self.pending = None;

        // Simulated network round trip.
        tokio::time::sleep(self.reply_delay).await;

        let reply = compose_reply((!text.is_empty()).then_some(text), attachment.as_ref());
        self.transcript.push(Message::bot(reply));

        info!(entries = self.transcript.len(), "Exchange completed");
        Ok(SendOutcome::Replied)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parley_shared::types::Role;
    use tempfile::TempDir;

    fn session() -> ChatSession {
        ChatSession::new().with_reply_delay(Duration::ZERO)
    }

    fn write_file(dir: &TempDir, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = session();
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Bot);
        assert_eq!(session.transcript()[0].content, GREETING);
        assert!(session.pending_upload().is_none());
    }

    #[test]
    fn test_select_small_jpeg_is_staged() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "photo.jpg", 2 * 1024 * 1024);

        let mut session = session();
        session.select_file(&path, FileCategory::Image).unwrap();

        let pending = session.pending_upload().unwrap();
        assert_eq!(pending.name, "photo.jpg");
        assert_eq!(pending.mime, "image/jpeg");
        assert_eq!(pending.category, FileCategory::Image);
    }

    #[test]
    fn test_select_oversized_jpeg_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.jpg", 6 * 1024 * 1024);

        let mut session = session();
        let err = session.select_file(&path, FileCategory::Image).unwrap_err();
        assert!(matches!(
            err,
            Notice::Rejected(IntakeError::TooLarge { .. })
        ));
        assert!(session.pending_upload().is_none());
    }

    #[test]
    fn test_select_wrong_format_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "run.exe", 128);

        let mut session = session();
        let err = session.select_file(&path, FileCategory::Image).unwrap_err();
        assert_eq!(
            err,
            Notice::Rejected(IntakeError::InvalidFormat(FileCategory::Image))
        );
        assert!(session.pending_upload().is_none());
    }

    #[test]
    fn test_rejected_selection_keeps_existing_staged_file() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "photo.jpg", 1024);
        let other = write_file(&dir, "other.png", 1024);

        let mut session = session();
        session.select_file(&good, FileCategory::Image).unwrap();

        // Attach control is disabled while a file is staged.
        let err = session.select_file(&other, FileCategory::Image).unwrap_err();
        assert_eq!(err, Notice::AlreadyStaged);
        assert_eq!(session.pending_upload().unwrap().name, "photo.jpg");
    }

    #[test]
    fn test_remove_file_clears_pending() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "photo.jpg", 1024);

        let mut session = session();
        session.select_file(&path, FileCategory::Image).unwrap();
        session.remove_file();
        assert!(session.pending_upload().is_none());
    }

    #[tokio::test]
    async fn test_empty_submit_is_a_noop() {
        let mut session = session();
        let outcome = session.send("   ").await.unwrap();
        assert_eq!(outcome, SendOutcome::Ignored);
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_send_text_only() {
        let mut session = session();
        let outcome = session.send("hello").await.unwrap();
        assert_eq!(outcome, SendOutcome::Replied);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[1].content, "hello");
        assert!(transcript[1].attachment.is_none());
        assert_eq!(transcript[2].role, Role::Bot);
        assert!(transcript[2].content.contains("\"hello\""));
    }

    #[tokio::test]
    async fn test_send_jpeg_with_caption() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "photo.jpg", 2 * 1024 * 1024);

        let mut session = session();
        session.select_file(&path, FileCategory::Image).unwrap();
        let outcome = session.send("hello").await.unwrap();
        assert_eq!(outcome, SendOutcome::Replied);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);

        let user = &transcript[1];
        assert_eq!(user.content, "hello");
        let att = user.attachment.as_ref().unwrap();
        assert_eq!(att.name, "photo.jpg");
        assert!(att.url.starts_with("data:image/jpeg;base64,"));

        assert!(transcript[2].content.contains("hello"));
        assert!(session.pending_upload().is_none());
    }

    #[tokio::test]
    async fn test_send_file_without_caption_uses_filename() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "notes.txt", 64);

        let mut session = session();
        session.select_file(&path, FileCategory::Document).unwrap();
        session.send("").await.unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript[1].content, "notes.txt");
        assert!(transcript[2]
            .content
            .ends_with("If you have any specific questions about this file, please let me know."));
    }

    #[tokio::test]
    async fn test_failed_read_keeps_file_staged() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "photo.jpg", 1024);

        let mut session = session();
        session.select_file(&path, FileCategory::Image).unwrap();

        // File disappears between staging and send.
        std::fs::remove_file(&path).unwrap();

        let err = session.send("hello").await.unwrap_err();
        assert_eq!(err, Notice::ProcessingFailed);
        assert_eq!(session.transcript().len(), 1);
        assert!(session.pending_upload().is_some());
        assert!(!session.is_sending());
    }
}
