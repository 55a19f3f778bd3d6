use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnknownCategory;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// Attachment category declared by the user at selection time.
///
/// The category drives both intake validation (allow-list, byte ceiling)
/// and the canned reply text. It says nothing about actual file content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Document,
    Video,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Document => "document",
            FileCategory::Video => "video",
        }
    }

    /// Capitalized form used in user-facing notices.
    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Image => "Image",
            FileCategory::Document => "Document",
            FileCategory::Video => "Video",
        }
    }
}

impl std::str::FromStr for FileCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(FileCategory::Image),
            "document" => Ok(FileCategory::Document),
            "video" => Ok(FileCategory::Video),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file attached to a sent message.
///
/// Created at send time, owned by its [`Message`], never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub category: FileCategory,
    /// Display URL: a `data:` URL on the client, a simulated upload URL on
    /// the server.
    pub url: String,
    /// Original filename as selected by the user.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// One transcript entry. The transcript is append-only: entries are never
/// mutated or reordered once pushed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            attachment,
            sent_at: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            attachment: None,
            sent_at: Utc::now(),
        }
    }
}
