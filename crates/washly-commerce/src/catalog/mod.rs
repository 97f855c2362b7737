//! Catalog module.
//!
//! Contains the wash/care packages and the laundry price list booking
//! surfaces price against.

mod laundry;
mod package;

pub use laundry::{LaundryAddOn, LaundryPrice, LaundryPriceList};
pub use package::ServicePackage;

use crate::cart::{LaundryService, PricingResolver, PricingTier, ServiceCategory, TierDiscountTable};
use crate::error::CommerceError;
use crate::ids::PackageId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Everything a booking surface can put in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub currency: Currency,
    pub packages: Vec<ServicePackage>,
    pub laundry: LaundryPriceList,
}

impl Catalog {
    /// The storefront's published price list (INR).
    pub fn standard() -> Self {
        let c = Currency::INR;
        let m = |major| Money::from_major(major, c);

        let packages = vec![
            ServicePackage::new("car-basic", "Basic", ServiceCategory::CarWash, "Hatchback", m(399))
                .with_features(&["Exterior foam wash", "Tyre and rim cleaning"])
                .with_add_on("Tyre Polish", m(99))
                .with_add_on("Interior Vacuum", m(149))
                .with_monthly_discount(m(50)),
            ServicePackage::new("car-premium", "Premium", ServiceCategory::CarWash, "Sedan", m(699))
                .with_features(&[
                    "Exterior foam wash",
                    "Interior vacuum",
                    "Dashboard polish",
                    "Tyre dressing",
                ])
                .with_add_on("Engine Bay Cleaning", m(199))
                .with_add_on("Tyre Polish", m(99))
                .with_add_on("Air Freshener", m(25))
                .with_monthly_discount(m(100)),
            ServicePackage::new("car-deluxe", "Deluxe", ServiceCategory::CarWash, "SUV", m(999))
                .with_features(&[
                    "Premium wash",
                    "Upholstery shampoo",
                    "Glass treatment",
                    "Underbody rinse",
                ])
                .with_add_on("Ceramic Spray", m(299))
                .with_add_on("Engine Bay Cleaning", m(199))
                .with_monthly_discount(m(150)),
            ServicePackage::new("bike-basic", "Bike Basic", ServiceCategory::BikeWash, "Bike", m(149))
                .with_features(&["Foam wash", "Chain wipe"])
                .with_add_on("Chain Lubrication", m(79))
                .with_monthly_discount(m(20)),
            ServicePackage::new("bike-premium", "Bike Premium", ServiceCategory::BikeWash, "Bike", m(249))
                .with_features(&["Foam wash", "Chain cleaning", "Body polish"])
                .with_add_on("Chain Lubrication", m(79))
                .with_add_on("Ceramic Spray", m(149))
                .with_monthly_discount(m(40)),
            ServicePackage::new("helmet-sanitize", "Helmet Sanitize", ServiceCategory::HelmetWash, "Helmet", m(99))
                .with_features(&["UV sanitisation", "Outer shell wipe"])
                .with_add_on("Odour Guard", m(39)),
            ServicePackage::new("helmet-deep-clean", "Helmet Deep Clean", ServiceCategory::HelmetWash, "Helmet", m(199))
                .with_features(&["Liner removal and wash", "UV sanitisation", "Visor polish"])
                .with_add_on("Visor Anti-fog", m(49))
                .with_add_on("Odour Guard", m(39))
                .with_monthly_discount(m(30)),
        ];

        let price = |item: &str, major| LaundryPrice {
            item: item.to_string(),
            unit_price: m(major),
        };
        let extra = |name: &str, major, services: &[LaundryService]| LaundryAddOn {
            name: name.to_string(),
            price: m(major),
            services: services.to_vec(),
        };

        let laundry = LaundryPriceList {
            items: vec![
                price("Shirt", 30),
                price("T-Shirt", 25),
                price("Jeans", 50),
                price("Trousers", 45),
                price("Saree", 120),
                price("Bedsheet", 60),
                price("Blanket", 150),
            ],
            add_ons: vec![
                extra("Stain Treatment", 40, &[]),
                extra("Express Delivery", 99, &[]),
                extra(
                    "Fabric Softener",
                    20,
                    &[LaundryService::WashAndFold, LaundryService::WashAndIron],
                ),
                extra("Starch", 15, &[LaundryService::WashAndIron, LaundryService::SteamIron]),
                extra("Fragrance Finish", 25, &[LaundryService::DryClean]),
            ],
            detergents: vec![
                crate::cart::UiAddOn::new("Regular Detergent", m(0)),
                crate::cart::UiAddOn::new("Eco Detergent", m(20)),
                crate::cart::UiAddOn::new("Hypoallergenic Detergent", m(30)),
            ],
        };

        Self {
            currency: c,
            packages,
            laundry,
        }
    }

    /// Find a package by id.
    pub fn package(&self, id: &str) -> Result<&ServicePackage, CommerceError> {
        self.packages
            .iter()
            .find(|p| p.id.as_str() == id)
            .ok_or_else(|| CommerceError::PackageNotFound(id.to_string()))
    }

    /// Packages sold under `category`, in catalog order.
    pub fn packages_in<'a>(
        &'a self,
        category: &'a ServiceCategory,
    ) -> impl Iterator<Item = &'a ServicePackage> + 'a {
        self.packages.iter().filter(move |p| &p.category == category)
    }

    /// Monthly discounts of every package that offers one.
    pub fn tier_discounts(&self) -> TierDiscountTable {
        let mut table = TierDiscountTable::new();
        for package in &self.packages {
            if let Some(discount) = package.monthly_discount {
                table.insert(package.id.clone(), PricingTier::Monthly, discount);
            }
        }
        table
    }

    /// Resolver priced against this catalog.
    pub fn resolver(&self) -> PricingResolver {
        PricingResolver::new(self.currency).with_tier_discounts(self.tier_discounts())
    }

    /// Whether `id` names a catalog package.
    pub fn contains(&self, id: &PackageId) -> bool {
        self.packages.iter().any(|p| &p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::LineId;

    #[test]
    fn test_standard_catalog_lookup() {
        let catalog = Catalog::standard();
        let premium = catalog.package("car-premium").unwrap();
        assert_eq!(premium.name, "Premium");
        assert_eq!(premium.base_price, Money::from_major(699, Currency::INR));
        assert!(matches!(
            catalog.package("boat-wash"),
            Err(CommerceError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_packages_by_category() {
        let catalog = Catalog::standard();
        let helmets: Vec<_> = catalog.packages_in(&ServiceCategory::HelmetWash).collect();
        assert_eq!(helmets.len(), 2);
    }

    #[test]
    fn test_only_curated_add_ons() {
        let catalog = Catalog::standard();
        let premium = catalog.package("car-premium").unwrap();
        assert!(premium.add_on("tyre polish", 1).is_ok());
        assert!(matches!(
            premium.add_on("Ceramic Spray", 1),
            Err(CommerceError::AddOnNotOffered { .. })
        ));
    }

    #[test]
    fn test_tier_table_from_catalog() {
        let catalog = Catalog::standard();
        let table = catalog.tier_discounts();
        assert_eq!(
            table.discount_for(&PackageId::new("car-premium"), PricingTier::Monthly, Currency::INR),
            Money::from_major(100, Currency::INR)
        );
        // helmet-sanitize has no monthly tier
        assert!(table
            .discount_for(&PackageId::new("helmet-sanitize"), PricingTier::Monthly, Currency::INR)
            .is_zero());
    }

    #[test]
    fn test_laundry_add_on_relevance() {
        let laundry = Catalog::standard().laundry;
        assert!(laundry.add_on(LaundryService::WashAndIron, "Starch").is_ok());
        assert!(laundry.add_on(LaundryService::DryClean, "Starch").is_err());
        assert!(laundry.add_on(LaundryService::DryClean, "Stain Treatment").is_ok());
    }

    #[test]
    fn test_default_detergent_is_free() {
        let laundry = Catalog::standard().laundry;
        let detergent = laundry.detergent(None).unwrap().unwrap();
        assert!(detergent.price.is_zero());
        assert!(laundry.detergent(Some("bleach")).is_err());
    }

    #[test]
    fn test_catalog_package_line_validates() {
        let catalog = Catalog::standard();
        let premium = catalog.package("car-premium").unwrap();
        let line = catalog
            .resolver()
            .package_line(
                LineId::new("line-1"),
                premium,
                vec![premium.add_on("Air Freshener", 2).unwrap()],
                PricingTier::Monthly,
            )
            .unwrap();
        assert_eq!(line.unit_price, Money::from_major(699 - 100 + 50, Currency::INR));
        assert!(line.validate(Currency::INR).is_ok());
    }
}
