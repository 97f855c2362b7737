//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[storage]");
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());

    ctx.output.info("[pricing]");
    ctx.output.kv("currency", &ctx.config.pricing.currency);
    match &ctx.config.pricing.surcharge_bands {
        Some(bands) => {
            for band in bands {
                ctx.output.list_item(&format!(
                    "{}-{} km: +{}",
                    band.from_km, band.to_km, band.surcharge
                ));
            }
        }
        None => ctx.output.kv("surcharge_bands", "built-in"),
    }

    ctx.output.info("[booking]");
    ctx.output.kv(
        "draft_ttl_minutes",
        &ctx.config.booking.draft_ttl_minutes.to_string(),
    );

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("format", &ctx.config.logging.format);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("washly.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    ctx.config.validate()?;
    if ctx.config.pricing.surcharge_bands.is_none() {
        ctx.output.debug("using built-in surcharge bands");
    }
    // the storefront refuses a currency the catalog is not priced in
    ctx.storefront()?;

    ctx.output.success("Configuration is valid");
    Ok(())
}
