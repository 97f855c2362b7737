//! Stored sign-in session.

use crate::user::Identity;
use crate::AuthError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use washly_cache::{cache_key, Cache, KvStore};

/// A signed-in session as kept in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub identity: Identity,
    pub signed_in_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            signed_in_at: Utc::now(),
        }
    }
}

/// Keeps the current session across process runs.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    cache: Cache<S>,
}

impl<S: KvStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            cache: Cache::new(store),
        }
    }

    /// Storage key of the current session.
    pub fn key() -> String {
        cache_key!("session", "current")
    }

    /// The current session, if any. A corrupt entry is discarded.
    pub fn load(&self) -> Result<Option<AuthSession>, AuthError> {
        match self.cache.get::<AuthSession>(&Self::key()) {
            Ok(session) => Ok(session),
            Err(washly_cache::CacheError::SerializeError(e)) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                self.clear()?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        session.identity.validate()?;
        self.cache.set(&Self::key(), session)?;
        tracing::debug!(user = %session.identity.id, "session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        self.cache.delete(&Self::key())?;
        Ok(())
    }
}
