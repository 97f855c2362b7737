//! Cart and pricing engine for the Washly booking storefront.
//!
//! This crate provides the pieces every booking surface (car, bike, helmet,
//! laundry) shares:
//!
//! - **Catalog**: service packages, curated add-ons, the laundry price list
//! - **Cart**: line shapes, [`PricingResolver`](cart::PricingResolver) and the
//!   observable, persisted [`CartStore`](cart::CartStore)
//! - **Storage**: the persistence port, cart document migration and the
//!   pending booking draft
//! - **Checkout**: the payload handed to the checkout page
//!
//! # Example
//!
//! ```rust
//! use washly_commerce::prelude::*;
//! use washly_cache::MemoryStore;
//!
//! let catalog = Catalog::standard();
//! let resolver = catalog.resolver();
//! let mut cart = CartStore::new(KvPersistence::new(MemoryStore::new()), Currency::INR);
//!
//! let premium = catalog.package("car-premium").unwrap();
//! let line = resolver
//!     .package_line(LineId::for_invocation("car-premium"), premium, vec![], PricingTier::OneTime)
//!     .unwrap();
//! cart.add(line).unwrap();
//!
//! assert_eq!(cart.count(), 1);
//! assert_eq!(cart.subtotal().unwrap().display(), "\u{20b9}699.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod storage;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, LaundryAddOn, LaundryPrice, LaundryPriceList, ServicePackage};

    // Cart
    pub use crate::cart::{
        AddOn, CartEvent, CartLine, CartObserver, CartStore, LaundryDetails, LaundryItem,
        LaundryQuote, LaundryService, LineDetails, PackageDetails, PackageQuote, PricingResolver,
        PricingTier, ServiceCategory, SubscriptionId, TierDiscountTable, UiAddOn,
    };

    // Storage
    pub use crate::storage::{KvPersistence, PendingBooking, PersistencePort};

    // Checkout
    pub use crate::checkout::{CheckoutHandoff, CheckoutLine, CheckoutPayload, CustomerRef, Navigator};
}
