//! Checkout module.
//!
//! Contains the payload handed to the external checkout page and the
//! handoff that builds it from the cart.

mod handoff;

pub use handoff::{
    CheckoutHandoff, CheckoutLine, CheckoutPayload, CustomerRef, Navigator, CHECKOUT_ROUTE,
};
