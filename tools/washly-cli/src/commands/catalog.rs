//! Catalog listing.

use anyhow::Result;
use washly_commerce::cart::ServiceCategory;

use super::CatalogArgs;
use crate::context::Context;

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let storefront = ctx.storefront()?;
    let catalog = storefront.catalog();
    let category = args.category.as_deref().map(ServiceCategory::parse);

    if ctx.output.is_json() {
        match &category {
            Some(category) => {
                let packages: Vec<_> = catalog.packages_in(category).collect();
                ctx.output.json(&packages);
            }
            None => ctx.output.json(catalog),
        }
        return Ok(());
    }

    ctx.output.header("Packages");
    let widths = [16, 12, 12, 10, 12];
    ctx.output
        .table_row(&["ID", "CATEGORY", "TYPE", "PRICE", "MONTHLY"], &widths);
    let packages: Vec<_> = match &category {
        Some(category) => catalog.packages_in(category).collect(),
        None => catalog.packages.iter().collect(),
    };
    for package in &packages {
        let monthly = package
            .monthly_discount
            .map(|d| format!("-{}", d))
            .unwrap_or_default();
        let price = package.base_price.to_string();
        ctx.output.table_row(
            &[
                package.id.as_str(),
                package.category.label(),
                &package.service_type,
                &price,
                &monthly,
            ],
            &widths,
        );
        for add_on in &package.add_ons {
            ctx.output
                .list_item(&format!("{} +{}", add_on.name, add_on.price));
        }
    }
    if packages.is_empty() {
        ctx.output.info("No packages in this category");
    }

    if category.is_none() || category == Some(ServiceCategory::Laundry) {
        let laundry = &catalog.laundry;
        ctx.output.header("Laundry (per piece)");
        for price in &laundry.items {
            ctx.output.kv(&price.item, &price.unit_price.to_string());
        }
        ctx.output.header("Laundry add-ons");
        for add_on in &laundry.add_ons {
            let services: Vec<&str> = add_on.services.iter().map(|s| s.as_str()).collect();
            ctx.output.kv(
                &add_on.name,
                &format!("{} ({})", add_on.price, services.join(", ")),
            );
        }
        ctx.output.header("Detergents");
        for detergent in &laundry.detergents {
            ctx.output.kv(&detergent.name, &detergent.price.to_string());
        }
    }

    Ok(())
}
