//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth primitives.

pub mod job;
pub mod user;

pub use job::JobService;
pub use user::UserService;
