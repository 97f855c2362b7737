//! Line and cart pricing.
//!
//! Every booking surface prices its selection through [`PricingResolver`]
//! before handing a line to the cart, so the cart only ever stores
//! snapshots whose unit price already includes add-ons and discounts.

use crate::cart::line::try_sum_totals;
use crate::cart::{
    AddOn, CartLine, LaundryDetails, LaundryItem, LaundryService, LineDetails, PackageDetails,
    PricingTier, ServiceCategory, TierDiscountTable, UiAddOn,
};
use crate::catalog::ServicePackage;
use crate::error::CommerceError;
use crate::ids::{LineId, PackageId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Name of the add-on entry carrying a pickup distance surcharge.
pub const DISTANCE_SURCHARGE_NAME: &str = "Pickup distance surcharge";

/// A half-open distance band `[from_km, to_km)` and its surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurchargeBand {
    pub from_km: f64,
    pub to_km: f64,
    /// Surcharge in whole major units.
    pub surcharge: i64,
}

/// Default pickup bands. Anything at or beyond the last upper bound is
/// outside the service area.
pub const DEFAULT_SURCHARGE_BANDS: [SurchargeBand; 3] = [
    SurchargeBand { from_km: 0.0, to_km: 5.0, surcharge: 0 },
    SurchargeBand { from_km: 5.0, to_km: 10.0, surcharge: 50 },
    SurchargeBand { from_km: 10.0, to_km: 15.0, surcharge: 100 },
];

/// Priced package selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageQuote {
    pub base_price: Money,
    pub tier: PricingTier,
    pub tier_discount: Money,
    pub add_ons_total: Money,
    /// `max(0, base − discount) + add-ons`.
    pub line_total: Money,
}

/// Priced laundry basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaundryQuote {
    /// Items with a non-zero quantity, in input order.
    pub items: Vec<LaundryItem>,
    pub items_total: Money,
    pub add_ons_total: Money,
    pub line_total: Money,
}

/// Pure price computation for lines and carts.
#[derive(Debug, Clone)]
pub struct PricingResolver {
    currency: Currency,
    tiers: TierDiscountTable,
    bands: Vec<SurchargeBand>,
}

impl PricingResolver {
    /// Resolver with no tier discounts and the default distance bands.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            tiers: TierDiscountTable::new(),
            bands: DEFAULT_SURCHARGE_BANDS.to_vec(),
        }
    }

    /// Use `tiers` for package discounts.
    pub fn with_tier_discounts(mut self, tiers: TierDiscountTable) -> Self {
        self.tiers = tiers;
        self
    }

    /// Replace the distance bands. Bands are looked up in order.
    pub fn with_surcharge_bands(mut self, bands: Vec<SurchargeBand>) -> Self {
        self.bands = bands;
        self
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn tier_discounts(&self) -> &TierDiscountTable {
        &self.tiers
    }

    /// Price a package with its selected add-ons under `tier`.
    pub fn resolve_package_line(
        &self,
        package: &PackageId,
        base_price: Money,
        add_ons: &[AddOn],
        tier: PricingTier,
    ) -> Result<PackageQuote, CommerceError> {
        self.ensure_currency(&base_price)?;
        let add_ons_total =
            try_sum_totals(add_ons.iter().map(AddOn::total), self.currency).ok_or(CommerceError::Overflow)?;
        let tier_discount = self.tiers.discount_for(package, tier, self.currency);
        let discounted = base_price
            .try_subtract(&tier_discount)
            .ok_or_else(|| mismatch_or_overflow(&base_price, &tier_discount))?
            .non_negative();
        let line_total = discounted
            .try_add(&add_ons_total)
            .ok_or(CommerceError::Overflow)?;

        Ok(PackageQuote {
            base_price,
            tier,
            tier_discount,
            add_ons_total,
            line_total,
        })
    }

    /// Price a laundry basket. Items with quantity 0 are dropped.
    pub fn resolve_laundry_basket(
        &self,
        items: &[LaundryItem],
        add_ons: &[UiAddOn],
    ) -> Result<LaundryQuote, CommerceError> {
        let items: Vec<LaundryItem> = items.iter().filter(|i| i.quantity > 0).cloned().collect();
        if items.is_empty() {
            return Err(CommerceError::EmptyBasket);
        }
        for item in &items {
            self.ensure_currency(&item.unit_price)?;
        }

        let items_total = try_sum_totals(items.iter().map(LaundryItem::total), self.currency)
            .ok_or(CommerceError::Overflow)?;
        let add_ons_total = try_sum_totals(add_ons.iter().map(UiAddOn::total), self.currency)
            .ok_or(CommerceError::Overflow)?;
        let line_total = items_total
            .try_add(&add_ons_total)
            .ok_or(CommerceError::Overflow)?;

        Ok(LaundryQuote {
            items,
            items_total,
            add_ons_total,
            line_total,
        })
    }

    /// Stepped pickup surcharge for `distance_km`.
    pub fn resolve_distance_surcharge(&self, distance_km: f64) -> Result<Money, CommerceError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CommerceError::InvalidDistance(distance_km));
        }
        self.bands
            .iter()
            .find(|band| distance_km >= band.from_km && distance_km < band.to_km)
            .map(|band| Money::from_major(band.surcharge, self.currency))
            .ok_or_else(|| CommerceError::OutOfServiceArea {
                distance_km,
                max_km: self.bands.iter().map(|b| b.to_km).fold(0.0, f64::max),
            })
    }

    /// `Σ line_total` over `lines`.
    pub fn cart_subtotal(&self, lines: &[CartLine]) -> Result<Money, CommerceError> {
        lines.iter().try_fold(Money::zero(self.currency), |acc, line| {
            let total = line.line_total()?;
            acc.try_add(&total).ok_or_else(|| mismatch_or_overflow(&acc, &total))
        })
    }

    /// Build a ready-to-add line for a catalog package.
    pub fn package_line(
        &self,
        id: LineId,
        package: &ServicePackage,
        add_ons: Vec<AddOn>,
        tier: PricingTier,
    ) -> Result<CartLine, CommerceError> {
        let quote = self.resolve_package_line(&package.id, package.base_price, &add_ons, tier)?;
        Ok(CartLine {
            id,
            name: package.name.clone(),
            unit_price: quote.line_total,
            quantity: 1,
            category: package.category.clone(),
            service_type: package.service_type.clone(),
            details: LineDetails::Package(PackageDetails {
                package_id: package.id.clone(),
                base_price: quote.base_price,
                tier: quote.tier,
                tier_discount: quote.tier_discount,
                add_ons,
                add_ons_total: quote.add_ons_total,
                features: package.features.clone(),
            }),
        })
    }

    /// Build a ready-to-add laundry basket line. The whole basket is one line
    /// of quantity 1, however many pieces it holds.
    pub fn laundry_line(
        &self,
        id: LineId,
        service: LaundryService,
        items: &[LaundryItem],
        add_ons: Vec<UiAddOn>,
    ) -> Result<CartLine, CommerceError> {
        let quote = self.resolve_laundry_basket(items, &add_ons)?;
        Ok(CartLine {
            id,
            name: format!("{} Basket", service.display_name()),
            unit_price: quote.line_total,
            quantity: 1,
            category: ServiceCategory::Laundry,
            service_type: service.as_str().to_string(),
            details: LineDetails::LaundryBasket(LaundryDetails {
                service,
                items: quote.items,
                add_ons,
                add_ons_total: quote.add_ons_total,
            }),
        })
    }

    /// Build a generic line: `base_price` plus flat extras.
    pub fn generic_line(
        &self,
        id: LineId,
        name: impl Into<String>,
        category: ServiceCategory,
        service_type: impl Into<String>,
        base_price: Money,
        extras: Vec<UiAddOn>,
    ) -> Result<CartLine, CommerceError> {
        self.ensure_currency(&base_price)?;
        let extras_total = try_sum_totals(extras.iter().map(UiAddOn::total), self.currency)
            .ok_or(CommerceError::Overflow)?;
        let unit_price = base_price
            .try_add(&extras_total)
            .ok_or(CommerceError::Overflow)?;
        Ok(CartLine {
            id,
            name: name.into(),
            unit_price,
            quantity: 1,
            category,
            service_type: service_type.into(),
            details: LineDetails::Generic(extras),
        })
    }

    /// Fold the pickup surcharge for `distance_km` into `line`.
    ///
    /// The surcharge is recorded as an add-on entry in the line's own detail
    /// payload and added to the unit price, so the line stays consistent.
    /// A zero surcharge leaves the line untouched.
    pub fn with_distance_surcharge(
        &self,
        mut line: CartLine,
        distance_km: f64,
    ) -> Result<CartLine, CommerceError> {
        let surcharge = self.resolve_distance_surcharge(distance_km)?;
        if surcharge.is_zero() {
            return Ok(line);
        }

        match &mut line.details {
            LineDetails::Package(details) => {
                details.add_ons.push(AddOn::new(DISTANCE_SURCHARGE_NAME, surcharge));
                details.add_ons_total = details
                    .add_ons_total
                    .try_add(&surcharge)
                    .ok_or(CommerceError::Overflow)?;
            }
            LineDetails::LaundryBasket(details) => {
                details.add_ons.push(UiAddOn::new(DISTANCE_SURCHARGE_NAME, surcharge));
                details.add_ons_total = details
                    .add_ons_total
                    .try_add(&surcharge)
                    .ok_or(CommerceError::Overflow)?;
            }
            LineDetails::Generic(extras) => {
                extras.push(UiAddOn::new(DISTANCE_SURCHARGE_NAME, surcharge));
            }
        }
        line.unit_price = line
            .unit_price
            .try_add(&surcharge)
            .ok_or(CommerceError::Overflow)?;
        Ok(line)
    }

    fn ensure_currency(&self, money: &Money) -> Result<(), CommerceError> {
        if money.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: money.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

fn mismatch_or_overflow(acc: &Money, other: &Money) -> CommerceError {
    if acc.currency != other.currency {
        CommerceError::CurrencyMismatch {
            expected: acc.currency.code().to_string(),
            got: other.currency.code().to_string(),
        }
    } else {
        CommerceError::Overflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(major: i64) -> Money {
        Money::from_major(major, Currency::INR)
    }

    fn resolver() -> PricingResolver {
        PricingResolver::new(Currency::INR).with_tier_discounts(
            TierDiscountTable::new().with("car-premium", PricingTier::Monthly, inr(100)),
        )
    }

    #[test]
    fn test_package_without_add_ons() {
        let quote = resolver()
            .resolve_package_line(&PackageId::new("car-premium"), inr(699), &[], PricingTier::OneTime)
            .unwrap();
        assert_eq!(quote.line_total, inr(699));
        assert!(quote.tier_discount.is_zero());
    }

    #[test]
    fn test_package_add_on_quantities() {
        let add_ons = [
            AddOn::new("Tyre Polish", inr(99)),
            AddOn::new("Air Freshener", inr(25)).with_quantity(2),
        ];
        let quote = resolver()
            .resolve_package_line(&PackageId::new("car-premium"), inr(699), &add_ons, PricingTier::OneTime)
            .unwrap();
        assert_eq!(quote.add_ons_total, inr(149));
        assert_eq!(quote.line_total, inr(848));
    }

    #[test]
    fn test_monthly_tier_is_table_lookup() {
        let quote = resolver()
            .resolve_package_line(
                &PackageId::new("car-premium"),
                inr(699),
                &[AddOn::new("Tyre Polish", inr(99))],
                PricingTier::Monthly,
            )
            .unwrap();
        assert_eq!(quote.tier_discount, inr(100));
        assert_eq!(quote.line_total, inr(699 - 100 + 99));
    }

    #[test]
    fn test_tier_discount_never_goes_below_zero() {
        let resolver = PricingResolver::new(Currency::INR).with_tier_discounts(
            TierDiscountTable::new().with("promo", PricingTier::Monthly, inr(500)),
        );
        let quote = resolver
            .resolve_package_line(
                &PackageId::new("promo"),
                inr(300),
                &[AddOn::new("Wax", inr(50))],
                PricingTier::Monthly,
            )
            .unwrap();
        assert_eq!(quote.line_total, inr(50));
    }

    #[test]
    fn test_foreign_tier_discount_reports_mismatch() {
        let resolver = PricingResolver::new(Currency::INR).with_tier_discounts(
            TierDiscountTable::new().with(
                "car-premium",
                PricingTier::Monthly,
                Money::from_major(2, Currency::USD),
            ),
        );
        let result = resolver.resolve_package_line(
            &PackageId::new("car-premium"),
            inr(699),
            &[],
            PricingTier::Monthly,
        );
        assert!(matches!(
            result,
            Err(CommerceError::CurrencyMismatch { ref expected, ref got }) if expected == "INR" && got == "USD"
        ));
    }

    #[test]
    fn test_laundry_basket_total() {
        let quote = resolver()
            .resolve_laundry_basket(
                &[
                    LaundryItem::new("Jeans", 2, inr(50)),
                    LaundryItem::new("Shirt", 0, inr(30)),
                ],
                &[
                    UiAddOn::new("Stain Treatment", inr(40)),
                    UiAddOn::new("Regular detergent", inr(0)),
                ],
            )
            .unwrap();
        assert_eq!(quote.items.len(), 1);
        assert_eq!(quote.items_total, inr(100));
        assert_eq!(quote.line_total, inr(140));
    }

    #[test]
    fn test_empty_basket_rejected() {
        let result = resolver().resolve_laundry_basket(&[LaundryItem::new("Jeans", 0, inr(50))], &[]);
        assert!(matches!(result, Err(CommerceError::EmptyBasket)));
    }

    #[test]
    fn test_distance_band_boundaries() {
        let r = resolver();
        assert_eq!(r.resolve_distance_surcharge(0.0).unwrap(), inr(0));
        assert_eq!(r.resolve_distance_surcharge(4.99).unwrap(), inr(0));
        assert_eq!(r.resolve_distance_surcharge(5.0).unwrap(), inr(50));
        assert_eq!(r.resolve_distance_surcharge(9.99).unwrap(), inr(50));
        assert_eq!(r.resolve_distance_surcharge(10.0).unwrap(), inr(100));
        assert_eq!(r.resolve_distance_surcharge(14.99).unwrap(), inr(100));
    }

    #[test]
    fn test_distance_outside_service_area() {
        let r = resolver();
        assert!(matches!(
            r.resolve_distance_surcharge(15.0),
            Err(CommerceError::OutOfServiceArea { .. })
        ));
        assert!(matches!(
            r.resolve_distance_surcharge(-1.0),
            Err(CommerceError::InvalidDistance(_))
        ));
        assert!(matches!(
            r.resolve_distance_surcharge(f64::NAN),
            Err(CommerceError::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_distance_surcharge_keeps_line_consistent() {
        let r = resolver();
        let line = r
            .laundry_line(
                LineId::new("laundry-1"),
                LaundryService::WashAndFold,
                &[LaundryItem::new("Jeans", 2, inr(50))],
                vec![],
            )
            .unwrap();
        let line = r.with_distance_surcharge(line, 7.5).unwrap();
        assert_eq!(line.unit_price, inr(150));
        assert!(line.validate(Currency::INR).is_ok());
    }

    #[test]
    fn test_cart_subtotal() {
        let r = resolver();
        let mut generic = r
            .generic_line(
                LineId::new("g-1"),
                "Doorstep pickup",
                ServiceCategory::Other("Extras".to_string()),
                "pickup",
                inr(30),
                vec![],
            )
            .unwrap();
        generic.quantity = 3;
        let laundry = r
            .laundry_line(
                LineId::new("l-1"),
                LaundryService::DryClean,
                &[LaundryItem::new("Saree", 1, inr(120))],
                vec![],
            )
            .unwrap();
        assert_eq!(r.cart_subtotal(&[generic, laundry]).unwrap(), inr(210));
        assert_eq!(r.cart_subtotal(&[]).unwrap(), inr(0));
    }
}
