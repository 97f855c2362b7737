//! Cart to checkout handoff.

use crate::cart::{CartLine, CartStore, LineDetails, ServiceCategory};
use crate::error::CommerceError;
use crate::ids::{LineId, UserId};
use crate::money::{Currency, Money};
use crate::storage::PersistencePort;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Route the checkout page lives at.
pub const CHECKOUT_ROUTE: &str = "/checkout";

/// Who is checking out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One line as the checkout page receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub line_id: LineId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub category: ServiceCategory,
    pub service_type: String,
    /// The line's detail payload, unchanged.
    #[serde(flatten)]
    pub details: LineDetails,
}

impl CheckoutLine {
    fn from_line(line: &CartLine) -> Result<Self, CommerceError> {
        Ok(Self {
            line_id: line.id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total()?,
            category: line.category.clone(),
            service_type: line.service_type.clone(),
            details: line.details.clone(),
        })
    }
}

/// Everything the checkout page needs to take over the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    /// Lines in cart order.
    pub lines: Vec<CheckoutLine>,
    pub item_count: u64,
    pub subtotal: Money,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    pub prepared_at: DateTime<Utc>,
}

/// Route change to the checkout page.
pub trait Navigator {
    fn navigate(&mut self, route: &str, payload: &CheckoutPayload);
}

/// Builds the checkout payload and moves the user to the checkout route.
///
/// Order submission is not part of the handoff; the checkout page reports
/// success back through [`CheckoutHandoff::complete`].
#[derive(Debug, Clone)]
pub struct CheckoutHandoff {
    route: String,
}

impl Default for CheckoutHandoff {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutHandoff {
    pub fn new() -> Self {
        Self {
            route: CHECKOUT_ROUTE.to_string(),
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Snapshot the cart for checkout. An empty cart is an error.
    pub fn prepare<P: PersistencePort>(
        &self,
        store: &CartStore<P>,
        customer: Option<&CustomerRef>,
    ) -> Result<CheckoutPayload, CommerceError> {
        if store.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let lines = store
            .lines()
            .iter()
            .map(CheckoutLine::from_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CheckoutPayload {
            lines,
            item_count: store.count(),
            subtotal: store.subtotal()?,
            currency: store.currency(),
            customer: customer.cloned(),
            prepared_at: Utc::now(),
        })
    }

    /// Prepare the payload and hand it to `navigator`.
    pub fn proceed<P: PersistencePort, N: Navigator + ?Sized>(
        &self,
        store: &CartStore<P>,
        customer: Option<&CustomerRef>,
        navigator: &mut N,
    ) -> Result<CheckoutPayload, CommerceError> {
        let payload = self.prepare(store, customer)?;
        tracing::info!(
            route = %self.route,
            items = payload.item_count,
            subtotal = %payload.subtotal,
            "proceeding to checkout"
        );
        navigator.navigate(&self.route, &payload);
        Ok(payload)
    }

    /// The order was placed; empty the cart.
    pub fn complete<P: PersistencePort>(&self, store: &mut CartStore<P>) {
        tracing::info!(items = store.count(), "checkout completed, clearing cart");
        store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LaundryItem, LaundryService, PricingTier, UiAddOn};
    use crate::catalog::Catalog;
    use crate::storage::KvPersistence;
    use washly_cache::MemoryStore;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Vec<(String, CheckoutPayload)>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, route: &str, payload: &CheckoutPayload) {
            self.visits.push((route.to_string(), payload.clone()));
        }
    }

    fn customer() -> CustomerRef {
        CustomerRef {
            id: UserId::new("user-1"),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
        }
    }

    fn filled_cart() -> CartStore<KvPersistence<MemoryStore>> {
        let catalog = Catalog::standard();
        let resolver = catalog.resolver();
        let mut cart = CartStore::new(KvPersistence::new(MemoryStore::new()), Currency::INR);
        let premium = catalog.package("car-premium").unwrap();
        cart.add(
            resolver
                .package_line(LineId::new("car-1"), premium, vec![], PricingTier::OneTime)
                .unwrap(),
        )
        .unwrap();
        cart.add(
            resolver
                .laundry_line(
                    LineId::new("laundry-1"),
                    LaundryService::WashAndFold,
                    &[LaundryItem::new("Jeans", 2, Money::from_major(50, Currency::INR))],
                    vec![UiAddOn::new("Stain Treatment", Money::from_major(40, Currency::INR))],
                )
                .unwrap(),
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_prepare_payload() {
        let cart = filled_cart();
        let payload = CheckoutHandoff::new().prepare(&cart, Some(&customer())).unwrap();

        assert_eq!(payload.item_count, 2);
        assert_eq!(payload.subtotal, Money::from_major(839, Currency::INR));
        let ids: Vec<_> = payload.lines.iter().map(|l| l.line_id.as_str()).collect();
        assert_eq!(ids, vec!["car-1", "laundry-1"]);
        assert_eq!(payload.customer.as_ref().map(|c| c.email.as_str()), Some("asha@example.com"));
    }

    #[test]
    fn test_payload_json_carries_details_verbatim() {
        let cart = filled_cart();
        let payload = CheckoutHandoff::new().prepare(&cart, None).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["itemCount"], 2);
        assert_eq!(json["lines"][0]["category"], "Car Wash");
        assert_eq!(json["lines"][0]["packageDetails"]["packageId"], "car-premium");
        assert_eq!(json["lines"][1]["laundryDetails"]["items"][0]["item"], "Jeans");
        assert!(json.get("customer").is_none());
    }

    #[test]
    fn test_empty_cart_cannot_proceed() {
        let cart = CartStore::new(KvPersistence::new(MemoryStore::new()), Currency::INR);
        let mut nav = RecordingNavigator::default();
        let result = CheckoutHandoff::new().proceed(&cart, None, &mut nav);
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
        assert!(nav.visits.is_empty());
    }

    #[test]
    fn test_proceed_navigates_without_clearing() {
        let cart = filled_cart();
        let mut nav = RecordingNavigator::default();
        CheckoutHandoff::new()
            .proceed(&cart, Some(&customer()), &mut nav)
            .unwrap();

        assert_eq!(nav.visits.len(), 1);
        assert_eq!(nav.visits[0].0, CHECKOUT_ROUTE);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_complete_clears_cart() {
        let mut cart = filled_cart();
        CheckoutHandoff::new().complete(&mut cart);
        assert!(cart.is_empty());
        assert!(cart.persistence().load_cart().is_empty());
    }
}
