//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart, pricing and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Package not found in the catalog.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Add-on not offered for the package.
    #[error("Add-on {add_on:?} is not offered with package {package}")]
    AddOnNotOffered { package: String, add_on: String },

    /// Laundry item not on the price list.
    #[error("Laundry item not found: {0}")]
    LaundryItemNotFound(String),

    /// Line rejected at the cart boundary.
    #[error("Invalid cart line: {0}")]
    InvalidLine(String),

    /// A line with this id is already in the cart.
    #[error("Duplicate line id: {0}")]
    DuplicateLine(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Laundry basket has no pieces.
    #[error("Laundry basket is empty")]
    EmptyBasket,

    /// Distance is negative or not a number.
    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),

    /// Distance beyond the last surcharge band.
    #[error("Pickup {distance_km} km away is outside the {max_km} km service area")]
    OutOfServiceArea { distance_km: f64, max_km: f64 },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Persisted document uses a schema this build cannot read.
    #[error("Unsupported cart schema version: {0}")]
    UnsupportedSchema(u64),

    /// Storage error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<washly_cache::CacheError> for CommerceError {
    fn from(e: washly_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
