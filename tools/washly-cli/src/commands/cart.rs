//! Cart commands.

use anyhow::{anyhow, bail, Context as _, Result};
use dialoguer::Confirm;
use washly_auth::{AddOutcome, GateOutcome, Identity, LaundrySelection, PackageSelection};
use washly_commerce::cart::{LaundryService, PricingTier, ServiceCategory};
use washly_commerce::ids::LineId;
use washly_commerce::money::Money;

use super::{parse_name_qty, CartArgs, CartCommand};
use crate::context::{CliStorefront, Context};
use crate::output::describe_line;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut storefront = ctx.storefront()?;

    match args.command.unwrap_or(CartCommand::List) {
        CartCommand::List => list(&storefront, ctx),
        CartCommand::AddPackage {
            package,
            add_ons,
            monthly,
            distance,
            sign_in,
        } => {
            let mut selection = PackageSelection::new(package);
            for raw in &add_ons {
                let (name, qty) = parse_name_qty(raw)?;
                selection = selection.with_add_on(name, qty);
            }
            if monthly {
                selection = selection.with_tier(PricingTier::Monthly);
            }
            if let Some(km) = distance {
                selection = selection.with_distance(km);
            }

            let outcome = storefront.add_package(&selection)?;
            finish_add(&mut storefront, outcome, sign_in.as_deref(), ctx)
        }
        CartCommand::AddLaundry {
            service,
            items,
            add_ons,
            detergent,
            distance,
            sign_in,
        } => {
            let service = LaundryService::from_name(&service)
                .ok_or_else(|| anyhow!("Unknown laundry service: {}", service))?;
            let mut selection = LaundrySelection::new(service);
            for raw in &items {
                let (item, pieces) = parse_name_qty(raw)?;
                selection = selection.with_item(item, pieces);
            }
            for name in add_ons {
                selection = selection.with_add_on(name);
            }
            if let Some(name) = detergent {
                selection = selection.with_detergent(name);
            }
            if let Some(km) = distance {
                selection = selection.with_distance(km);
            }

            let outcome = storefront.add_laundry(&selection)?;
            finish_add(&mut storefront, outcome, sign_in.as_deref(), ctx)
        }
        CartCommand::AddItem {
            name,
            price,
            category,
            service_type,
            sign_in,
        } => {
            let currency = storefront.cart().currency();
            let price = Money::from_decimal(price, currency)
                .filter(|p| !p.is_negative())
                .ok_or_else(|| anyhow!("Invalid price: {}", price))?;
            let category = ServiceCategory::parse(&category);
            let id = LineId::for_invocation(&category.label().to_lowercase().replace(' ', "-"));
            let line = storefront
                .resolver()
                .generic_line(id, name, category, service_type, price, Vec::new())?;

            let outcome = storefront.add_to_cart(line)?;
            finish_add(&mut storefront, outcome, sign_in.as_deref(), ctx)
        }
        CartCommand::Remove { id } => {
            if storefront.cart_mut().remove(&LineId::new(id.clone())) {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.info(&format!("No line {} in the cart", id));
            }
            Ok(())
        }
        CartCommand::Qty { id, quantity } => {
            let line_id = LineId::new(id.clone());
            if storefront.cart().get(&line_id).is_none() {
                bail!("No line {} in the cart", id);
            }
            storefront.cart_mut().set_quantity(&line_id, quantity)?;
            if quantity <= 0 {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.success(&format!("Set {} to {}", id, quantity));
            }
            Ok(())
        }
        CartCommand::Clear { yes } => {
            if storefront.cart().is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !yes && ctx.output.is_interactive() {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove all {} items?", storefront.cart().count()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.info("Cancelled");
                    return Ok(());
                }
            }
            storefront.cart_mut().clear();
            ctx.output.success("Cart cleared");
            Ok(())
        }
    }
}

fn list(storefront: &CliStorefront, ctx: &Context) -> Result<()> {
    let cart = storefront.cart();
    let subtotal = cart.subtotal()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "lines": cart.lines(),
            "count": cart.count(),
            "subtotal": subtotal,
        }));
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    ctx.output.header("Cart");
    let widths = [28, 20, 5, 12];
    ctx.output.table_row(&["ID", "NAME", "QTY", "TOTAL"], &widths);
    for line in cart.lines() {
        let quantity = line.quantity.to_string();
        let total = line.line_total()?.to_string();
        ctx.output
            .table_row(&[line.id.as_str(), &line.name, &quantity, &total], &widths);
        ctx.output.list_item(&describe_line(line));
    }
    ctx.output.info("");
    ctx.output.kv("Items", &cart.count().to_string());
    ctx.output.kv("Subtotal", &subtotal.to_string());
    Ok(())
}

/// Report an add, signing in first when the gate parked it.
fn finish_add(
    storefront: &mut CliStorefront,
    outcome: AddOutcome,
    sign_in: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    if let GateOutcome::Deferred { .. } = outcome.gate {
        let Some(email) = sign_in else {
            storefront.dismiss_sign_in();
            bail!("Sign in to add items: pass --sign-in <EMAIL> or run `washly login` first");
        };
        let identity = Identity::from_email(email)?;
        let replayed = storefront.sign_in(identity.clone());
        // the gate keeps the identity even when the replayed add fails
        if storefront.current_user() == Some(&identity) {
            ctx.remember(&identity)?;
            ctx.output
                .info(&format!("Signed in as {}", identity.display_name()));
        }
        replayed.context("Sign-in failed")?;
    }

    let line = storefront
        .cart()
        .get(&outcome.line_id)
        .ok_or_else(|| anyhow!("Line {} was not added", outcome.line_id))?;
    if ctx.output.is_json() {
        ctx.output.json(line);
    } else {
        ctx.output.success(&format!(
            "Added {} ({}) for {}",
            line.name,
            line.id,
            line.unit_price
        ));
        ctx.output.kv("Subtotal", &storefront.cart().subtotal()?.to_string());
    }
    Ok(())
}
