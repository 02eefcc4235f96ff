//! Job Tracker Shared Library
//!
//! This crate contains the domain models, API request/response types,
//! error enums and input validation shared by the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Job, JobStatus, User};
pub use types::*;
