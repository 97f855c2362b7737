//! Washly CLI - drive the booking storefront's cart from a terminal.
//!
//! Commands:
//! - `washly catalog` - List packages, laundry prices and add-ons
//! - `washly cart` - List, add, update and clear cart lines
//! - `washly login` / `washly logout` - Manage the signed-in user
//! - `washly booking` - Save and read pending booking drafts
//! - `washly checkout` - Hand the cart to checkout
//! - `washly config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BookingArgs, CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, LoginArgs};

/// Washly CLI - Browse services, fill the cart and check out
#[derive(Parser)]
#[command(name = "washly")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the service catalog
    Catalog(CatalogArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Sign in
    Login(LoginArgs),

    /// Sign out and clear the cart
    Logout,

    /// Manage the pending booking draft
    Booking(BookingArgs),

    /// Proceed to checkout
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };
    logging::init_tracing(&ctx.config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Login(args) => commands::session::login(args, &ctx),
        Commands::Logout => commands::session::logout(&ctx),
        Commands::Booking(args) => commands::booking::run(args, &ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_quantity_parses() {
        let cli = Cli::try_parse_from(["washly", "cart", "qty", "line-1", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Cart(_)));
    }
}
