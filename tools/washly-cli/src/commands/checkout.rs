//! Checkout handoff.

use anyhow::Result;
use dialoguer::Confirm;
use washly_commerce::checkout::{CheckoutPayload, Navigator};
use washly_commerce::CommerceError;

use super::CheckoutArgs;
use crate::context::Context;
use crate::output::Output;

/// Prints the checkout route and the payload handed to it.
struct ConsoleNavigator<'a> {
    output: &'a Output,
}

impl Navigator for ConsoleNavigator<'_> {
    fn navigate(&mut self, route: &str, payload: &CheckoutPayload) {
        if self.output.is_json() {
            self.output.json(&serde_json::json!({
                "route": route,
                "payload": payload,
            }));
            return;
        }

        self.output.header(&format!("Checkout → {}", route));
        if let Some(customer) = &payload.customer {
            self.output.kv("Customer", &format!("{} <{}>", customer.name, customer.email));
        }
        for line in &payload.lines {
            self.output.list_item(&format!(
                "{} × {} = {}",
                line.name, line.quantity, line.line_total
            ));
        }
        self.output.kv("Items", &payload.item_count.to_string());
        self.output.kv("Subtotal", &payload.subtotal.to_string());
    }
}

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut storefront = ctx.storefront()?;
    let mut navigator = ConsoleNavigator {
        output: &ctx.output,
    };

    match storefront.proceed_to_checkout(&mut navigator) {
        Ok(_) => {}
        Err(CommerceError::EmptyCart) => {
            ctx.output
                .warn("Your cart is empty. Add a package or laundry basket first.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    if !args.complete {
        return Ok(());
    }

    if !args.yes && ctx.output.is_interactive() {
        let confirmed = Confirm::new()
            .with_prompt("Mark this order as placed?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Order left open");
            return Ok(());
        }
    }

    storefront.complete_checkout();
    ctx.output.success("Order placed, cart cleared");
    Ok(())
}
