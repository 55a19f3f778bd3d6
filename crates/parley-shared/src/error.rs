use thiserror::Error;

use crate::types::FileCategory;

/// Rejection reasons produced by intake validation.
///
/// Both are surfaced to the user as transient notices; the `Display` text is
/// the notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Invalid {0} format")]
    InvalidFormat(FileCategory),

    #[error("{} is too large: {size} bytes (max {max})", .category.label())]
    TooLarge {
        category: FileCategory,
        size: u64,
        max: u64,
    },
}

/// A category string that is not one of `image`, `document`, `video`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown file category: {0}")]
pub struct UnknownCategory(pub String);
