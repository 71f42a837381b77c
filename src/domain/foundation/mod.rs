//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps and the error vocabulary used by every other
//! domain module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use timestamp::Timestamp;
