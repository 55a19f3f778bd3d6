//! Canned response templating.
//!
//! The original build shipped two independent mock backends with different
//! phrasings; this module is the single canonical one. Both the HTTP
//! endpoint and the client session compose their bot replies here, so the
//! same inputs always produce the same string everywhere.

use crate::types::{Attachment, FileCategory};

/// Compose the simulated assistant reply.
///
/// Deterministic and pure: the attachment prefix depends only on the
/// declared category (never on file content), and the suffix either echoes
/// the user's text verbatim or invites questions about the file.
///
/// Callers must not invoke this with neither text nor attachment (the UI
/// disallows empty submits); doing so yields the empty string.
pub fn compose_reply(text: Option<&str>, attachment: Option<&Attachment>) -> String {
    let mut reply = String::new();

    if let Some(att) = attachment {
        match att.category {
            FileCategory::Image => {
                reply.push_str("I've analyzed your image and can see [description of image content]. ");
            }
            FileCategory::Document => {
                reply.push_str(&format!(
                    "I've processed your document \"{}\". Here's what I found: [document analysis]. ",
                    att.name
                ));
            }
            FileCategory::Video => {
                reply.push_str(&format!(
                    "I've processed your video \"{}\" and analyzed the key frames. ",
                    att.name
                ));
            }
        }
    }

    match text {
        Some(text) => reply.push_str(&format!(
            "Regarding your message: \"{text}\" - this is a simulated AI response \
             that would analyze your query and file together."
        )),
        None if attachment.is_some() => {
            reply.push_str("If you have any specific questions about this file, please let me know.");
        }
        None => {}
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(category: FileCategory, name: &str) -> Attachment {
        Attachment {
            category,
            url: "https://example.com/uploads/x".to_string(),
            name: name.to_string(),
            size: Some(1024),
        }
    }

    #[test]
    fn test_text_only_echoes_verbatim() {
        let reply = compose_reply(Some("what is the weather?"), None);
        assert!(reply.contains("\"what is the weather?\""));
        assert!(reply.starts_with("Regarding your message:"));
    }

    #[test]
    fn test_attachment_only_ends_with_invitation() {
        for category in [
            FileCategory::Image,
            FileCategory::Document,
            FileCategory::Video,
        ] {
            let att = attachment(category, "file.bin");
            let reply = compose_reply(None, Some(&att));
            assert!(
                reply.ends_with("If you have any specific questions about this file, please let me know."),
                "unexpected reply for {category}: {reply}"
            );
        }
    }

    #[test]
    fn test_document_prefix_names_the_file() {
        let att = attachment(FileCategory::Document, "report.pdf");
        let reply = compose_reply(Some("summarize"), Some(&att));
        assert!(reply.contains("your document \"report.pdf\""));
        assert!(reply.contains("\"summarize\""));
    }

    #[test]
    fn test_image_prefix_is_fixed() {
        let a = compose_reply(None, Some(&attachment(FileCategory::Image, "a.png")));
        let b = compose_reply(None, Some(&attachment(FileCategory::Image, "b.jpg")));
        // The image prefix never names the file.
        assert_eq!(a, b);
    }

    #[test]
    fn test_deterministic() {
        let att = attachment(FileCategory::Video, "clip.mp4");
        let first = compose_reply(Some("hello"), Some(&att));
        let second = compose_reply(Some("hello"), Some(&att));
        assert_eq!(first, second);
        assert!(first.contains("hello"));
        assert!(first.starts_with("I've processed your video \"clip.mp4\""));
    }
}
