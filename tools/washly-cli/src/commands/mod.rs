//! CLI command implementations.

pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod session;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Only show packages in this category (e.g. `car-wash`).
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List cart lines and the subtotal.
    List,
    /// Add a wash package.
    AddPackage {
        /// Package id (see `washly catalog`).
        package: String,
        /// Add-on as NAME or NAME:QTY. Repeatable.
        #[arg(short, long = "add-on")]
        add_ons: Vec<String>,
        /// Book on the monthly plan.
        #[arg(long)]
        monthly: bool,
        /// Pickup distance in kilometres.
        #[arg(short, long)]
        distance: Option<f64>,
        /// Sign in with this email first.
        #[arg(long, value_name = "EMAIL")]
        sign_in: Option<String>,
    },
    /// Add a laundry basket as one line.
    AddLaundry {
        /// wash-and-fold, wash-and-iron, dry-clean or steam-iron.
        #[arg(short, long)]
        service: String,
        /// Garment as NAME:QTY. Repeatable.
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,
        /// Service add-on by name. Repeatable.
        #[arg(short, long = "add-on")]
        add_ons: Vec<String>,
        /// Detergent by name, defaults to the standard one.
        #[arg(long)]
        detergent: Option<String>,
        /// Pickup distance in kilometres.
        #[arg(short, long)]
        distance: Option<f64>,
        /// Sign in with this email first.
        #[arg(long, value_name = "EMAIL")]
        sign_in: Option<String>,
    },
    /// Add a free-form line for any other surface.
    AddItem {
        /// Line name.
        name: String,
        /// Price in major units.
        #[arg(short, long)]
        price: f64,
        /// Category label.
        #[arg(long)]
        category: String,
        /// Service type shown with the line.
        #[arg(long, default_value = "Standard")]
        service_type: String,
        /// Sign in with this email first.
        #[arg(long, value_name = "EMAIL")]
        sign_in: Option<String>,
    },
    /// Remove a line.
    Remove {
        /// Line id.
        id: String,
    },
    /// Set a line's quantity. Zero or less removes it.
    Qty {
        /// Line id.
        id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Email address to sign in with.
    pub email: String,
    /// Display name, defaults to the email's local part.
    #[arg(short, long)]
    pub name: Option<String>,
    /// Contact phone number.
    #[arg(short, long)]
    pub phone: Option<String>,
}

/// Arguments for the booking command.
#[derive(Args)]
pub struct BookingArgs {
    #[command(subcommand)]
    pub command: BookingCommand,
}

#[derive(Subcommand)]
pub enum BookingCommand {
    /// Save a pending booking for a category page to pick up.
    Draft {
        /// Service category.
        #[arg(long)]
        category: String,
        /// Pickup date, YYYY-MM-DD.
        #[arg(short, long)]
        date: String,
        /// Contact phone number.
        #[arg(short, long)]
        phone: String,
        /// Pickup address.
        #[arg(short, long)]
        address: String,
    },
    /// Show the pending booking without consuming it.
    Show,
    /// Read the pending booking and remove it.
    Consume,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Mark the order as placed and clear the cart.
    #[arg(long)]
    pub complete: bool,
    /// Skip confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}

/// Split `NAME:QTY`; a bare `NAME` means one.
pub(crate) fn parse_name_qty(raw: &str) -> anyhow::Result<(String, u32)> {
    match raw.rsplit_once(':') {
        Some((name, qty)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid quantity in '{}'", raw))?;
            if qty == 0 {
                anyhow::bail!("Quantity must be at least 1 in '{}'", raw);
            }
            Ok((name.trim().to_string(), qty))
        }
        None => Ok((raw.trim().to_string(), 1)),
    }
}
