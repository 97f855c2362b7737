//! Pending booking drafts.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use washly_commerce::cart::ServiceCategory;
use washly_commerce::storage::{PendingBooking, PersistencePort};

use super::{BookingArgs, BookingCommand};
use crate::context::Context;

/// Run the booking command.
pub fn run(args: BookingArgs, ctx: &Context) -> Result<()> {
    match args.command {
        BookingCommand::Draft {
            category,
            date,
            phone,
            address,
        } => {
            let draft = save_draft(ctx, &category, &date, phone, address)?;
            if ctx.output.is_json() {
                ctx.output.json(&draft);
            } else {
                ctx.output.success(&format!(
                    "Saved {} booking for {}, valid for {} minutes",
                    draft.category, draft.pickup_date, ctx.config.booking.draft_ttl_minutes
                ));
            }
            Ok(())
        }
        BookingCommand::Show => {
            let draft = ctx.persistence()?.read_pending_booking()?;
            print_draft(draft.as_ref(), ctx);
            Ok(())
        }
        BookingCommand::Consume => {
            let draft = consume(ctx)?;
            print_draft(draft.as_ref(), ctx);
            Ok(())
        }
    }
}

fn save_draft(
    ctx: &Context,
    category: &str,
    date: &str,
    phone: String,
    address: String,
) -> Result<PendingBooking> {
    let pickup_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid pickup date '{}', expected YYYY-MM-DD", date))?;
    let draft = PendingBooking::new(ServiceCategory::parse(category), pickup_date, phone, address);
    ctx.persistence()?.save_pending_booking(&draft)?;
    Ok(draft)
}

/// Read the draft and remove it, as the category page does on arrival.
fn consume(ctx: &Context) -> Result<Option<PendingBooking>> {
    Ok(ctx.storefront()?.take_pending_booking()?)
}

fn print_draft(draft: Option<&PendingBooking>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&draft);
        return;
    }
    match draft {
        Some(draft) => {
            ctx.output.header("Pending booking");
            ctx.output.kv("Category", draft.category.label());
            ctx.output.kv("Pickup", &draft.pickup_date.to_string());
            ctx.output.kv("Phone", &draft.phone_number);
            ctx.output.kv("Address", &draft.address);
            ctx.output.kv("Saved", &draft.timestamp.to_rfc3339());
        }
        None => ctx.output.info("No pending booking"),
    }
}
