//! The observable, persisted cart.

use crate::cart::{CartLine, MAX_QUANTITY_PER_LINE};
use crate::error::CommerceError;
use crate::ids::LineId;
use crate::money::{Currency, Money};
use crate::storage::PersistencePort;
use std::collections::HashSet;
use std::fmt;

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added(LineId),
    Removed(LineId),
    QuantityChanged { id: LineId, quantity: u32 },
    Cleared,
    /// Lines were (re)loaded from persistence.
    Hydrated,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback run after every mutation with the event and the current lines.
pub type CartObserver = Box<dyn FnMut(&CartEvent, &[CartLine])>;

/// Ordered collection of cart lines, written through to a [`PersistencePort`]
/// on every change.
///
/// Lines are never merged: adding the same configuration twice yields two
/// lines. Persistence is best-effort; a failed write is logged and the
/// in-memory cart stays authoritative.
pub struct CartStore<P> {
    lines: Vec<CartLine>,
    currency: Currency,
    persistence: P,
    observers: Vec<(SubscriptionId, CartObserver)>,
    next_subscription: u64,
}

impl<P: PersistencePort> CartStore<P> {
    /// Create an empty cart. Nothing is read from `persistence`.
    pub fn new(persistence: P, currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            persistence,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a cart from whatever `persistence` holds.
    ///
    /// Stored lines that no longer validate, repeat an id, or would overflow
    /// the subtotal are dropped.
    pub fn hydrate(persistence: P, currency: Currency) -> Self {
        let mut store = Self::new(persistence, currency);
        store.lines = store.admit_loaded(store.persistence.load_cart());
        tracing::debug!(lines = store.lines.len(), "cart hydrated");
        store
    }

    /// Replace the in-memory lines with the persisted ones.
    pub fn reload(&mut self) {
        self.lines = self.admit_loaded(self.persistence.load_cart());
        self.notify(&CartEvent::Hydrated);
    }

    fn admit_loaded(&self, loaded: Vec<CartLine>) -> Vec<CartLine> {
        let mut seen = HashSet::new();
        let mut subtotal = Money::zero(self.currency);
        let mut admitted = Vec::with_capacity(loaded.len());
        for line in loaded {
            let checked = line.validate(self.currency).and_then(|_| {
                let total = line.line_total()?;
                subtotal.try_add(&total).ok_or(CommerceError::Overflow)
            });
            match checked {
                Ok(_) if !seen.insert(line.id.clone()) => {
                    tracing::warn!(line = %line.id, "dropping duplicate stored line");
                }
                Ok(next) => {
                    subtotal = next;
                    admitted.push(line);
                }
                Err(e) => {
                    tracing::warn!(line = %line.id, error = %e, "dropping invalid stored line");
                }
            }
        }
        admitted
    }

    /// Append a line.
    ///
    /// Returns an error if:
    /// - the line fails validation for this cart's currency
    /// - a line with the same id is already present
    /// - the cart subtotal would overflow
    pub fn add(&mut self, line: CartLine) -> Result<LineId, CommerceError> {
        line.validate(self.currency)?;
        if self.get(&line.id).is_some() {
            return Err(CommerceError::DuplicateLine(line.id.to_string()));
        }
        self.subtotal()?
            .try_add(&line.line_total()?)
            .ok_or(CommerceError::Overflow)?;

        let id = line.id.clone();
        tracing::debug!(line = %id, name = %line.name, price = %line.unit_price, "line added");
        self.lines.push(line);
        self.persist();
        self.notify(&CartEvent::Added(id.clone()));
        Ok(id)
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove(&mut self, id: &LineId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.id != id);
        let removed = self.lines.len() < len_before;
        if removed {
            tracing::debug!(line = %id, "line removed");
            self.persist();
            self.notify(&CartEvent::Removed(id.clone()));
        }
        removed
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero or less removes the line. Returns whether a line
    /// was changed; unknown ids are a no-op.
    pub fn set_quantity(&mut self, id: &LineId, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(id));
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(quantity, MAX_QUANTITY_PER_LINE));
        }
        let quantity = u32::try_from(quantity).map_err(|_| CommerceError::InvalidQuantity(quantity))?;

        let Some(index) = self.lines.iter().position(|l| &l.id == id) else {
            return Ok(false);
        };
        let previous = self.lines[index].quantity;
        if previous == quantity {
            return Ok(false);
        }

        self.lines[index].quantity = quantity;
        if let Err(e) = self.subtotal() {
            self.lines[index].quantity = previous;
            return Err(e);
        }

        self.persist();
        self.notify(&CartEvent::QuantityChanged {
            id: id.clone(),
            quantity,
        });
        Ok(true)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        if let Err(e) = self.persistence.clear_cart() {
            tracing::warn!(error = %e, "failed to clear stored cart");
        }
        self.notify(&CartEvent::Cleared);
    }

    /// Total units across all lines (badge count).
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// `Σ unit_price × quantity`.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.lines
            .iter()
            .try_fold(Money::zero(self.currency), |acc, line| {
                acc.try_add(&line.line_total()?).ok_or(CommerceError::Overflow)
            })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Register an observer. It runs after every mutation until unsubscribed.
    pub fn subscribe(&mut self, observer: CartObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() < len_before
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save_cart(&self.lines) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }

    fn notify(&mut self, event: &CartEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event, &self.lines);
        }
    }
}

impl<P> fmt::Debug for CartStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("currency", &self.currency)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LaundryItem, LaundryService, PricingTier, ServiceCategory, UiAddOn};
    use crate::catalog::Catalog;
    use crate::storage::KvPersistence;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use washly_cache::{CacheError, KvStore, MemoryStore};

    fn inr(major: i64) -> Money {
        Money::from_major(major, Currency::INR)
    }

    fn store() -> CartStore<KvPersistence<Rc<MemoryStore>>> {
        CartStore::new(KvPersistence::new(Rc::new(MemoryStore::new())), Currency::INR)
    }

    fn extra(id: &str, major: i64) -> CartLine {
        Catalog::standard()
            .resolver()
            .generic_line(
                LineId::new(id),
                "Doorstep pickup",
                ServiceCategory::Other("Extras".to_string()),
                "pickup",
                inr(major),
                vec![],
            )
            .unwrap()
    }

    fn premium(id: &str) -> CartLine {
        let catalog = Catalog::standard();
        let package = catalog.package("car-premium").unwrap();
        catalog
            .resolver()
            .package_line(LineId::new(id), package, vec![], PricingTier::OneTime)
            .unwrap()
    }

    fn jeans_basket(id: &str) -> CartLine {
        Catalog::standard()
            .resolver()
            .laundry_line(
                LineId::new(id),
                LaundryService::WashAndFold,
                &[LaundryItem::new("Jeans", 2, inr(50))],
                vec![UiAddOn::new("Stain Treatment", inr(40))],
            )
            .unwrap()
    }

    #[test]
    fn test_premium_and_laundry_scenario() {
        let mut cart = store();
        cart.add(premium("car-1")).unwrap();
        cart.add(jeans_basket("laundry-1")).unwrap();

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.subtotal().unwrap(), inr(839));
    }

    #[test]
    fn test_same_configuration_adds_two_lines() {
        let mut cart = store();
        cart.add(premium(LineId::for_invocation("car-premium").as_str())).unwrap();
        cart.add(premium(LineId::for_invocation("car-premium").as_str())).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut cart = store();
        cart.add(extra("a", 10)).unwrap();
        assert!(matches!(
            cart.add(extra("a", 20)),
            Err(CommerceError::DuplicateLine(_))
        ));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_invalid_line_rejected() {
        let mut cart = store();
        let mut line = premium("car-1");
        line.unit_price = inr(1);
        assert!(matches!(cart.add(line), Err(CommerceError::InvalidLine(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = store();
        cart.add(extra("a", 10)).unwrap();
        cart.add(extra("b", 20)).unwrap();

        assert!(cart.remove(&LineId::new("a")));
        assert!(!cart.remove(&LineId::new("a")));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.subtotal().unwrap(), inr(20));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = store();
        cart.add(extra("a", 10)).unwrap();

        assert!(cart.set_quantity(&LineId::new("a"), 3).unwrap());
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.subtotal().unwrap(), inr(30));

        assert!(!cart.set_quantity(&LineId::new("missing"), 2).unwrap());
        assert!(matches!(
            cart.set_quantity(&LineId::new("a"), 100),
            Err(CommerceError::QuantityExceedsLimit(100, 99))
        ));
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_non_positive_quantity_removes() {
        let mut cart = store();
        cart.add(extra("a", 10)).unwrap();
        cart.add(extra("b", 10)).unwrap();

        assert!(cart.set_quantity(&LineId::new("a"), 0).unwrap());
        assert!(cart.set_quantity(&LineId::new("b"), -4).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let shared = Rc::new(MemoryStore::new());
        let mut cart = CartStore::new(KvPersistence::new(Rc::clone(&shared)), Currency::INR);
        cart.add(extra("a", 10)).unwrap();
        cart.add(premium("car-1")).unwrap();
        cart.set_quantity(&LineId::new("a"), 2).unwrap();

        let reopened = CartStore::hydrate(KvPersistence::new(Rc::clone(&shared)), Currency::INR);
        assert_eq!(reopened.lines(), cart.lines());
        assert_eq!(reopened.count(), 3);

        cart.clear();
        let reopened = CartStore::hydrate(KvPersistence::new(shared), Currency::INR);
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_hydrate_drops_invalid_and_duplicate_lines() {
        let port = KvPersistence::new(MemoryStore::new());
        let mut tampered = premium("car-1");
        tampered.unit_price = inr(5);
        port.save_cart(&[extra("a", 10), tampered, extra("a", 30), extra("b", 20)])
            .unwrap();

        let cart = CartStore::hydrate(&port, Currency::INR);
        let ids: Vec<_> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cart.subtotal().unwrap(), inr(30));
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let shared = Rc::new(MemoryStore::new());
        let mut cart = CartStore::new(KvPersistence::new(Rc::clone(&shared)), Currency::INR);
        let other_tab = KvPersistence::new(Rc::clone(&shared));
        other_tab.save_cart(&[extra("x", 10)]).unwrap();

        cart.reload();
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_observers_see_each_mutation() {
        let seen: Rc<RefCell<Vec<(CartEvent, u64)>>> = Rc::default();
        let mut cart = store();
        let sink = Rc::clone(&seen);
        let sub = cart.subscribe(Box::new(move |event: &CartEvent, lines: &[CartLine]| {
            let count = lines.iter().map(|l| u64::from(l.quantity)).sum();
            sink.borrow_mut().push((event.clone(), count));
        }));

        cart.add(extra("a", 10)).unwrap();
        cart.set_quantity(&LineId::new("a"), 4).unwrap();
        cart.remove(&LineId::new("a"));
        cart.clear();

        assert_eq!(
            *seen.borrow(),
            vec![
                (CartEvent::Added(LineId::new("a")), 1),
                (
                    CartEvent::QuantityChanged {
                        id: LineId::new("a"),
                        quantity: 4
                    },
                    4
                ),
                (CartEvent::Removed(LineId::new("a")), 0),
                (CartEvent::Cleared, 0),
            ]
        );

        assert!(cart.unsubscribe(sub));
        cart.add(extra("b", 10)).unwrap();
        assert_eq!(seen.borrow().len(), 4);
        assert!(!cart.unsubscribe(sub));
    }

    #[test]
    fn test_no_event_for_noop_remove() {
        let events = Rc::new(RefCell::new(0));
        let mut cart = store();
        let counter = Rc::clone(&events);
        cart.subscribe(Box::new(move |_: &CartEvent, _: &[CartLine]| {
            *counter.borrow_mut() += 1
        }));

        cart.remove(&LineId::new("nothing"));
        assert_eq!(*events.borrow(), 0);
    }

    struct ReadOnlyStore;

    impl KvStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError(format!("{} is read-only", key)))
        }

        fn delete(&self, key: &str) -> Result<(), CacheError> {
            Err(CacheError::StoreError(format!("{} is read-only", key)))
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_write_failures_do_not_block_the_cart() {
        let mut cart = CartStore::new(KvPersistence::new(ReadOnlyStore), Currency::INR);
        cart.add(extra("a", 10)).unwrap();
        assert_eq!(cart.count(), 1);
        cart.clear();
        assert!(cart.is_empty());
    }

    fn arb_line() -> impl Strategy<Value = (i64, u32)> {
        (0i64..5_000, 1u32..=99)
    }

    proptest! {
        #[test]
        fn test_count_and_subtotal_track_lines(specs in prop::collection::vec(arb_line(), 0..20)) {
            let mut cart = store();
            for (i, (price, qty)) in specs.iter().enumerate() {
                let mut line = extra(&format!("l{}", i), *price);
                line.quantity = *qty;
                cart.add(line).unwrap();
            }

            let count: u64 = specs.iter().map(|(_, q)| u64::from(*q)).sum();
            let subtotal: i64 = specs.iter().map(|(p, q)| p * 100 * i64::from(*q)).sum();
            prop_assert_eq!(cart.count(), count);
            prop_assert_eq!(cart.subtotal().unwrap(), Money::new(subtotal, Currency::INR));
        }

        #[test]
        fn test_subtotal_ignores_add_order(
            specs in prop::collection::vec(arb_line(), 1..12),
            seed in any::<u64>(),
        ) {
            let build = |order: &[usize]| {
                let mut cart = store();
                for &i in order {
                    let (price, qty) = specs[i];
                    let mut line = extra(&format!("l{}", i), price);
                    line.quantity = qty;
                    cart.add(line).unwrap();
                }
                cart.subtotal().unwrap()
            };

            let forward: Vec<usize> = (0..specs.len()).collect();
            let mut shuffled = forward.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();

            prop_assert_eq!(build(&forward), build(&shuffled));
        }

        #[test]
        fn test_double_remove_equals_single(n in 1usize..8, target in 0usize..8) {
            let mut once = store();
            let mut twice = store();
            for i in 0..n {
                once.add(extra(&format!("l{}", i), 10)).unwrap();
                twice.add(extra(&format!("l{}", i), 10)).unwrap();
            }
            let id = LineId::new(format!("l{}", target));
            once.remove(&id);
            twice.remove(&id);
            twice.remove(&id);
            prop_assert_eq!(once.lines(), twice.lines());
        }
    }
}
