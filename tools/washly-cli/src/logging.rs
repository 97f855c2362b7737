//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const VERBOSE_DIRECTIVE: &str =
    "washly_commerce=debug,washly_auth=debug,washly_cache=debug,washly_cli=debug";

/// Install the global subscriber. `--verbose` forces the washly crates to
/// `debug`; otherwise `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) {
    use tracing_subscriber::fmt;

    let directive = filter_directive(config, verbose, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if config.format == "json" {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.with_target(false).try_init();
    }
}

fn filter_directive(config: &LoggingConfig, verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return VERBOSE_DIRECTIVE.to_string();
    }
    rust_log
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| config.level.clone())
}
