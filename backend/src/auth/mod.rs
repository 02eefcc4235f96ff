//! Authentication module
//!
//! Provides JWT bearer tokens, argon2 password hashing and ownership checks.

pub mod guard;
mod jwt;
mod middleware;
mod password;

pub use guard::{authorize_mutation, authorize_owned, Decision, Owned};
pub use jwt::{parse_algorithm, Claims, JwtService};
pub use middleware::{authenticate_request, AuthUser};
pub use password::PasswordService;
