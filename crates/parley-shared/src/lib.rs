//! Shared core logic for the Parley demo chat.
//!
//! Everything with observable behavior lives here so the HTTP server and the
//! client session engine cannot drift apart:
//! - the transcript data model ([`types`])
//! - attachment intake validation ([`intake`])
//! - canned response templating ([`reply`])

pub mod constants;
pub mod error;
pub mod intake;
pub mod reply;
pub mod types;
