//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Identity is missing a required field or is malformed.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// The stored session could not be read.
    #[error("session not found or unreadable")]
    SessionNotFound,

    /// Cart, pricing or checkout failure inside an action.
    #[error(transparent)]
    Commerce(#[from] washly_commerce::CommerceError),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] washly_cache::CacheError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::InvalidIdentity(_) | AuthError::SessionNotFound)
    }
}
