//! Studybreak Protocol - Wire types for the decision service
//!
//! This crate defines the JSON bodies exchanged with the backend:
//! - Status, recommendation and action payloads
//! - Preference enums shared by the CLI and the backend
//! - Training and learning statistics
//! - The enumerated action space (continue, short break, long break)

mod action;
mod api;
mod preferences;

pub use action::*;
pub use api::*;
pub use preferences::*;
