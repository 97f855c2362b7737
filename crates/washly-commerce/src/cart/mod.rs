//! Cart module.
//!
//! Contains the line shapes booking surfaces produce, the pricing rules that
//! produce them, and the observable [`CartStore`] that holds them.

mod line;
mod pricing;
mod store;
mod tier;

pub use line::{
    AddOn, CartLine, LaundryDetails, LaundryItem, LaundryService, LineDetails, PackageDetails,
    PricingTier, ServiceCategory, UiAddOn, MAX_QUANTITY_PER_LINE,
};
pub use pricing::{
    LaundryQuote, PackageQuote, PricingResolver, SurchargeBand, DEFAULT_SURCHARGE_BANDS,
    DISTANCE_SURCHARGE_NAME,
};
pub use store::{CartEvent, CartObserver, CartStore, SubscriptionId};
pub use tier::TierDiscountTable;

pub(crate) use line::try_sum_totals;
