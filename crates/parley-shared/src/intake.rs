//! Intake validation for user-selected attachments.
//!
//! A file must pass both checks before it may be staged or attached:
//! its declared MIME type must be on the category's allow-list, and its
//! size must not exceed the category's byte ceiling. Validation is a pure
//! synchronous predicate; rejecting a file has no side effects, so an
//! already-staged upload is never disturbed by a failed selection.

use crate::constants::{
    ALLOWED_DOCUMENT_TYPES, ALLOWED_IMAGE_TYPES, ALLOWED_VIDEO_TYPES, MAX_DOCUMENT_SIZE,
    MAX_IMAGE_SIZE, MAX_VIDEO_SIZE,
};
use crate::error::IntakeError;
use crate::types::FileCategory;

/// Metadata of a candidate file, as declared by the picker or the upload
/// form. Only the declared MIME type and byte length are inspected; file
/// content is never read here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// MIME allow-list for a category.
pub fn allowed_types(category: FileCategory) -> &'static [&'static str] {
    match category {
        FileCategory::Image => ALLOWED_IMAGE_TYPES,
        FileCategory::Document => ALLOWED_DOCUMENT_TYPES,
        FileCategory::Video => ALLOWED_VIDEO_TYPES,
    }
}

/// Byte ceiling for a category.
pub fn max_size(category: FileCategory) -> u64 {
    match category {
        FileCategory::Image => MAX_IMAGE_SIZE,
        FileCategory::Document => MAX_DOCUMENT_SIZE,
        FileCategory::Video => MAX_VIDEO_SIZE,
    }
}

/// Check a candidate file against its declared category.
///
/// The format check runs first; a file that is both mistyped and oversized
/// reports `InvalidFormat`. Sizes equal to the ceiling are accepted.
pub fn validate(meta: &FileMeta, category: FileCategory) -> Result<(), IntakeError> {
    if !allowed_types(category).contains(&meta.mime.as_str()) {
        return Err(IntakeError::InvalidFormat(category));
    }

    let max = max_size(category);
    if meta.size > max {
        return Err(IntakeError::TooLarge {
            category,
            size: meta.size,
            max,
        });
    }

    Ok(())
}
