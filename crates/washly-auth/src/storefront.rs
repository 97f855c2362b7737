//! Storefront facade: the catalog, the cart and the sign-in gate wired
//! together the way booking pages use them.

use crate::gate::{AuthGate, GateOutcome};
use crate::user::Identity;
use crate::AuthError;
use washly_commerce::cart::{
    CartLine, CartStore, LaundryService, PricingResolver, PricingTier, UiAddOn,
};
use washly_commerce::catalog::Catalog;
use washly_commerce::checkout::{CheckoutHandoff, CheckoutPayload, CustomerRef, Navigator};
use washly_commerce::ids::LineId;
use washly_commerce::storage::{PendingBooking, PersistencePort};
use washly_commerce::CommerceError;

/// A package selection as a booking page collects it.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSelection {
    pub package_id: String,
    /// `(add-on name, quantity)` pairs.
    pub add_ons: Vec<(String, u32)>,
    pub tier: PricingTier,
    pub distance_km: Option<f64>,
}

impl PackageSelection {
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            add_ons: Vec::new(),
            tier: PricingTier::OneTime,
            distance_km: None,
        }
    }

    pub fn with_add_on(mut self, name: impl Into<String>, quantity: u32) -> Self {
        self.add_ons.push((name.into(), quantity));
        self
    }

    pub fn with_tier(mut self, tier: PricingTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_distance(mut self, km: f64) -> Self {
        self.distance_km = Some(km);
        self
    }
}

/// A laundry basket as the laundry page collects it.
#[derive(Debug, Clone, PartialEq)]
pub struct LaundrySelection {
    pub service: LaundryService,
    /// `(item, pieces)` pairs.
    pub items: Vec<(String, u32)>,
    pub add_ons: Vec<String>,
    /// `None` picks the default detergent.
    pub detergent: Option<String>,
    pub distance_km: Option<f64>,
}

impl LaundrySelection {
    pub fn new(service: LaundryService) -> Self {
        Self {
            service,
            items: Vec::new(),
            add_ons: Vec::new(),
            detergent: None,
            distance_km: None,
        }
    }

    pub fn with_item(mut self, item: impl Into<String>, pieces: u32) -> Self {
        self.items.push((item.into(), pieces));
        self
    }

    pub fn with_add_on(mut self, name: impl Into<String>) -> Self {
        self.add_ons.push(name.into());
        self
    }

    pub fn with_detergent(mut self, name: impl Into<String>) -> Self {
        self.detergent = Some(name.into());
        self
    }

    pub fn with_distance(mut self, km: f64) -> Self {
        self.distance_km = Some(km);
        self
    }
}

/// Result of an add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Id the line will have (or has) in the cart.
    pub line_id: LineId,
    pub gate: GateOutcome,
}

/// Catalog, cart and sign-in gate for one browsing session.
pub struct Storefront<P> {
    catalog: Catalog,
    resolver: PricingResolver,
    cart: CartStore<P>,
    gate: AuthGate<CartStore<P>>,
    handoff: CheckoutHandoff,
}

impl<P: PersistencePort> Storefront<P> {
    /// Open a storefront, restoring the cart from `persistence`.
    pub fn open(persistence: P, catalog: Catalog) -> Self {
        let resolver = catalog.resolver();
        let cart = CartStore::hydrate(persistence, catalog.currency);
        Self {
            catalog,
            resolver,
            cart,
            gate: AuthGate::new(),
            handoff: CheckoutHandoff::new(),
        }
    }

    /// Start signed in as `identity` (a restored session).
    pub fn with_user(mut self, identity: Identity) -> Self {
        self.gate = AuthGate::signed_in(identity);
        self
    }

    pub fn with_resolver(mut self, resolver: PricingResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Add a priced line, gated on sign-in.
    pub fn add_to_cart(&mut self, line: CartLine) -> Result<AddOutcome, AuthError> {
        line.validate(self.cart.currency())?;
        let line_id = line.id.clone();
        let gate = self.gate.check_auth_and_execute(&mut self.cart, move |cart, who| {
            tracing::debug!(user = %who.id, line = %line.id, "adding line for signed-in user");
            cart.add(line)?;
            Ok(())
        })?;
        Ok(AddOutcome { line_id, gate })
    }

    /// Price a package selection against the catalog and add it.
    pub fn add_package(&mut self, selection: &PackageSelection) -> Result<AddOutcome, AuthError> {
        let line = self.price_package(selection)?;
        self.add_to_cart(line)
    }

    /// Price a laundry basket against the catalog and add it as one line.
    pub fn add_laundry(&mut self, selection: &LaundrySelection) -> Result<AddOutcome, AuthError> {
        let line = self.price_laundry(selection)?;
        self.add_to_cart(line)
    }

    pub fn price_package(&self, selection: &PackageSelection) -> Result<CartLine, CommerceError> {
        let package = self.catalog.package(&selection.package_id)?;
        let add_ons = selection
            .add_ons
            .iter()
            .map(|(name, qty)| package.add_on(name, *qty))
            .collect::<Result<Vec<_>, _>>()?;
        let line = self.resolver.package_line(
            LineId::for_invocation(package.id.as_str()),
            package,
            add_ons,
            selection.tier,
        )?;
        match selection.distance_km {
            Some(km) => self.resolver.with_distance_surcharge(line, km),
            None => Ok(line),
        }
    }

    pub fn price_laundry(&self, selection: &LaundrySelection) -> Result<CartLine, CommerceError> {
        let laundry = &self.catalog.laundry;
        let items = selection
            .items
            .iter()
            .map(|(item, pieces)| laundry.item(item, *pieces))
            .collect::<Result<Vec<_>, _>>()?;
        let mut add_ons: Vec<UiAddOn> = selection
            .add_ons
            .iter()
            .map(|name| laundry.add_on(selection.service, name))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(detergent) = laundry.detergent(selection.detergent.as_deref())? {
            add_ons.push(detergent);
        }
        let line = self.resolver.laundry_line(
            LineId::for_invocation("laundry"),
            selection.service,
            &items,
            add_ons,
        )?;
        match selection.distance_km {
            Some(km) => self.resolver.with_distance_surcharge(line, km),
            None => Ok(line),
        }
    }

    /// Sign-in completed; replays a parked add, if any.
    pub fn sign_in(&mut self, identity: Identity) -> Result<bool, AuthError> {
        self.gate.on_signed_in(identity, &mut self.cart)
    }

    /// Sign-out completed; the cart belongs to the previous user and is cleared.
    pub fn sign_out(&mut self) {
        self.gate.on_signed_out();
        self.cart.clear();
    }

    /// The user closed the sign-in prompt.
    pub fn dismiss_sign_in(&mut self) -> bool {
        self.gate.dismiss_prompt()
    }

    /// Hand the cart to the checkout page.
    pub fn proceed_to_checkout<N: Navigator + ?Sized>(
        &self,
        navigator: &mut N,
    ) -> Result<CheckoutPayload, CommerceError> {
        let customer = self.gate.current_user().map(CustomerRef::from);
        self.handoff.proceed(&self.cart, customer.as_ref(), navigator)
    }

    /// The checkout page reported the order as placed.
    pub fn complete_checkout(&mut self) {
        self.handoff.complete(&mut self.cart);
    }

    pub fn save_pending_booking(&self, draft: &PendingBooking) -> Result<(), CommerceError> {
        self.cart.persistence().save_pending_booking(draft)
    }

    /// Read the pending booking and remove it, as the destination page does.
    pub fn take_pending_booking(&self) -> Result<Option<PendingBooking>, CommerceError> {
        let draft = self.cart.persistence().read_pending_booking()?;
        if draft.is_some() {
            self.cart.persistence().clear_pending_booking()?;
        }
        Ok(draft)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &PricingResolver {
        &self.resolver
    }

    pub fn cart(&self) -> &CartStore<P> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore<P> {
        &mut self.cart
    }

    pub fn current_user(&self) -> Option<&Identity> {
        self.gate.current_user()
    }

    pub fn prompt_visible(&self) -> bool {
        self.gate.prompt_visible()
    }

    pub fn has_pending_action(&self) -> bool {
        self.gate.has_pending()
    }
}
