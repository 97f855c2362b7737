//! Durable storage of the cart and the pending booking draft.
//!
//! [`PersistencePort`] is the seam the cart and booking pages talk to;
//! [`KvPersistence`] implements it over any [`washly_cache::KvStore`].

mod booking;
mod migrate;

pub use booking::{PendingBooking, DEFAULT_DRAFT_TTL_MINUTES, MAX_CLOCK_SKEW_SECONDS};
pub use migrate::{upgrade, CartDocument, CART_SCHEMA_VERSION};

use crate::cart::CartLine;
use crate::error::CommerceError;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::rc::Rc;
use washly_cache::{Cache, KvStore};

/// Storage key of the cart document.
pub const CART_KEY: &str = "cart";
/// Storage key of the pending booking draft.
pub const PENDING_BOOKING_KEY: &str = "pendingBooking";

/// Key-value persistence for cart state and booking drafts.
pub trait PersistencePort {
    /// Overwrite the stored cart with `lines`.
    fn save_cart(&self, lines: &[CartLine]) -> Result<(), CommerceError>;

    /// Load the stored cart. Missing, corrupt or unreadable data yields an
    /// empty cart.
    fn load_cart(&self) -> Vec<CartLine>;

    /// Remove the stored cart.
    fn clear_cart(&self) -> Result<(), CommerceError>;

    fn save_pending_booking(&self, draft: &PendingBooking) -> Result<(), CommerceError>;

    /// Read the draft as seen at `now`; expired drafts are deleted and read
    /// as absent.
    fn read_pending_booking_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingBooking>, CommerceError>;

    fn read_pending_booking(&self) -> Result<Option<PendingBooking>, CommerceError> {
        self.read_pending_booking_at(Utc::now())
    }

    fn clear_pending_booking(&self) -> Result<(), CommerceError>;
}

impl<T: PersistencePort + ?Sized> PersistencePort for &T {
    fn save_cart(&self, lines: &[CartLine]) -> Result<(), CommerceError> {
        (**self).save_cart(lines)
    }

    fn load_cart(&self) -> Vec<CartLine> {
        (**self).load_cart()
    }

    fn clear_cart(&self) -> Result<(), CommerceError> {
        (**self).clear_cart()
    }

    fn save_pending_booking(&self, draft: &PendingBooking) -> Result<(), CommerceError> {
        (**self).save_pending_booking(draft)
    }

    fn read_pending_booking_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingBooking>, CommerceError> {
        (**self).read_pending_booking_at(now)
    }

    fn clear_pending_booking(&self) -> Result<(), CommerceError> {
        (**self).clear_pending_booking()
    }
}

impl<T: PersistencePort + ?Sized> PersistencePort for Rc<T> {
    fn save_cart(&self, lines: &[CartLine]) -> Result<(), CommerceError> {
        (**self).save_cart(lines)
    }

    fn load_cart(&self) -> Vec<CartLine> {
        (**self).load_cart()
    }

    fn clear_cart(&self) -> Result<(), CommerceError> {
        (**self).clear_cart()
    }

    fn save_pending_booking(&self, draft: &PendingBooking) -> Result<(), CommerceError> {
        (**self).save_pending_booking(draft)
    }

    fn read_pending_booking_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingBooking>, CommerceError> {
        (**self).read_pending_booking_at(now)
    }

    fn clear_pending_booking(&self) -> Result<(), CommerceError> {
        (**self).clear_pending_booking()
    }
}

/// [`PersistencePort`] over a key-value store.
#[derive(Debug, Clone)]
pub struct KvPersistence<S> {
    cache: Cache<S>,
    draft_ttl: Duration,
}

impl<S: KvStore> KvPersistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            cache: Cache::new(store),
            draft_ttl: Duration::minutes(DEFAULT_DRAFT_TTL_MINUTES),
        }
    }

    /// Override how long a pending booking stays readable.
    pub fn with_draft_ttl(mut self, minutes: i64) -> Self {
        self.draft_ttl = Duration::minutes(minutes);
        self
    }

    pub fn draft_ttl(&self) -> Duration {
        self.draft_ttl
    }

    pub fn cache(&self) -> &Cache<S> {
        &self.cache
    }

    fn try_load_cart(&self) -> Result<Vec<CartLine>, CommerceError> {
        match self.cache.get::<Value>(CART_KEY)? {
            Some(raw) => upgrade(raw),
            None => Ok(Vec::new()),
        }
    }
}

impl<S: KvStore> PersistencePort for KvPersistence<S> {
    fn save_cart(&self, lines: &[CartLine]) -> Result<(), CommerceError> {
        self.cache.set(CART_KEY, &CartDocument::current(lines))?;
        tracing::trace!(lines = lines.len(), "cart saved");
        Ok(())
    }

    fn load_cart(&self) -> Vec<CartLine> {
        match self.try_load_cart() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, "stored cart unreadable, starting empty");
                Vec::new()
            }
        }
    }

    fn clear_cart(&self) -> Result<(), CommerceError> {
        self.cache.delete(CART_KEY)?;
        Ok(())
    }

    fn save_pending_booking(&self, draft: &PendingBooking) -> Result<(), CommerceError> {
        self.cache.set(PENDING_BOOKING_KEY, draft)?;
        tracing::debug!(category = %draft.category, "pending booking saved");
        Ok(())
    }

    fn read_pending_booking_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingBooking>, CommerceError> {
        let draft: Option<PendingBooking> = match self.cache.get(PENDING_BOOKING_KEY) {
            Ok(draft) => draft,
            Err(washly_cache::CacheError::SerializeError(e)) => {
                tracing::warn!(error = %e, "discarding unreadable pending booking");
                self.cache.delete(PENDING_BOOKING_KEY)?;
                None
            }
            Err(e) => return Err(e.into()),
        };

        match draft {
            Some(draft) if draft.is_expired_at(now, self.draft_ttl) => {
                tracing::debug!(written = %draft.timestamp, "pending booking expired");
                self.cache.delete(PENDING_BOOKING_KEY)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn clear_pending_booking(&self) -> Result<(), CommerceError> {
        self.cache.delete(PENDING_BOOKING_KEY)?;
        Ok(())
    }
}
