//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use washly_auth::{AuthSession, Identity, SessionStore, Storefront};
use washly_cache::FileStore;
use washly_commerce::catalog::Catalog;
use washly_commerce::storage::KvPersistence;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, from the working directory up.
const CONFIG_NAMES: [&str; 3] = ["washly.toml", ".washly.toml", "washly.json"];

/// The storefront the CLI drives, backed by files under the data directory.
pub type CliStorefront = Storefront<KvPersistence<FileStore>>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was read from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&Path>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(path.to_path_buf()))
        } else {
            match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding cart, session and draft files.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.data_dir)
    }

    fn file_store(&self) -> Result<FileStore> {
        let dir = self.data_dir();
        FileStore::open(&dir).with_context(|| format!("Failed to open data directory {}", dir.display()))
    }

    /// Persistence for the cart and booking drafts.
    pub fn persistence(&self) -> Result<KvPersistence<FileStore>> {
        Ok(KvPersistence::new(self.file_store()?)
            .with_draft_ttl(self.config.booking.draft_ttl_minutes))
    }

    /// Stored sign-in session.
    pub fn sessions(&self) -> Result<SessionStore<FileStore>> {
        Ok(SessionStore::new(self.file_store()?))
    }

    /// The signed-in identity, if a session is stored.
    pub fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self.sessions()?.load()?.map(|s| s.identity))
    }

    /// Remember `identity` as signed in.
    pub fn remember(&self, identity: &Identity) -> Result<()> {
        self.sessions()?.save(&AuthSession::new(identity.clone()))?;
        Ok(())
    }

    /// Open the storefront with the stored cart and session restored.
    pub fn storefront(&self) -> Result<CliStorefront> {
        let catalog = Catalog::standard();
        let currency = self.config.currency()?;
        if currency != catalog.currency {
            bail!(
                "The catalog is priced in {}, but pricing.currency is {}",
                catalog.currency,
                currency
            );
        }

        let mut resolver = catalog.resolver();
        if let Some(bands) = &self.config.pricing.surcharge_bands {
            resolver = resolver.with_surcharge_bands(bands.clone());
        }

        let mut storefront = Storefront::open(self.persistence()?, catalog).with_resolver(resolver);
        if let Some(identity) = self.current_identity()? {
            tracing::debug!(user = %identity.id, "restored session");
            storefront = storefront.with_user(identity);
        }
        Ok(storefront)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
impl Context {
    /// Default config, JSON output, rooted at `dir`.
    pub(crate) fn in_dir(dir: &Path) -> Self {
        Self {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".washly.toml"), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(dir.path().join(".washly.toml")));
    }

    #[test]
    fn test_session_is_restored_into_storefront() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::in_dir(dir.path());
        assert!(ctx.storefront().unwrap().current_user().is_none());

        let identity = Identity::from_email("asha@example.com").unwrap();
        ctx.remember(&identity).unwrap();
        assert_eq!(ctx.storefront().unwrap().current_user(), Some(&identity));
    }

    #[test]
    fn test_currency_must_match_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = Context::in_dir(dir.path());
        ctx.config.pricing.currency = "USD".to_string();
        assert!(ctx.storefront().is_err());
    }
}
