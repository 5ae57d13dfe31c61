//! Studybreak Client - Access to the decision service
//!
//! The monitor talks to the backend only through [`DecisionBackend`], so tests
//! and alternative transports can stand in for [`HttpBackend`].

mod config;
mod error;
mod http;
mod traits;

pub use config::BackendConfig;
pub use error::BackendError;
pub use http::HttpBackend;
pub use traits::{BackendResult, DecisionBackend};
