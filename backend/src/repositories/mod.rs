//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod job;
pub mod user;

pub use job::{CreateJob, JobRecord, JobRepository, UpdateJob};
pub use user::{CreateUser, UpdateUser, UserRecord, UserRepository};
