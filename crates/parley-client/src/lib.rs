//! Headless engine for the Parley chat page.
//!
//! Models the browser-side session without any rendering: an append-only
//! transcript, at most one validated pending upload, and a simulated
//! round-trip send. A UI shell (web, desktop, TUI) drives [`session::ChatSession`]
//! and renders its transcript; everything observable lives here.

pub mod session;
pub mod upload;

pub use session::{ChatSession, Notice, SendOutcome};
pub use upload::PendingUpload;
