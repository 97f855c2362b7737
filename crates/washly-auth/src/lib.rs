//! Sign-in handling for the Washly storefront.
//!
//! Provides the stored session, the [`AuthGate`] that defers cart actions
//! until the user signs in, and the [`Storefront`] facade booking pages use.

mod error;
mod gate;
mod session;
mod storefront;
mod user;

pub use error::AuthError;
pub use gate::{AuthGate, GateOutcome, GatedAction};
pub use session::{AuthSession, SessionStore};
pub use storefront::{AddOutcome, LaundrySelection, PackageSelection, Storefront};
pub use user::Identity;
