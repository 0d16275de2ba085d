//! Command implementations.
//!
//! Every command writes its human-readable output to a caller-supplied
//! writer so the binary can hand in stdout and tests can hand in a buffer.

pub mod cart;
pub mod checkout;
pub mod menu;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use warung_core::cart::FileStorage;
use warung_core::{
    Cart, CartError, CartStore, Catalog, CatalogError, CheckoutError, LineItemId,
};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Menu file could not be read.
    #[error("failed to read menu file {path}: {source}")]
    MenuFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Menu file is invalid.
    #[error("invalid menu: {0}")]
    Menu(#[from] CatalogError),

    /// No menu item has this handle.
    #[error("no menu item with handle {0:?} (see `warung menu`)")]
    UnknownItem(String),

    /// No cart line has this id.
    #[error("no cart line with id {0} (see `warung cart show`)")]
    UnknownLine(LineItemId),

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Order could not be placed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Where the CLI finds its menu and cart.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub menu_path: Option<PathBuf>,
}

impl Context {
    /// Load the configured menu, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured menu file cannot be read or parsed.
    pub fn catalog(&self) -> Result<Catalog, CommandError> {
        let Some(path) = &self.menu_path else {
            return Ok(Catalog::builtin());
        };
        let json = std::fs::read_to_string(path).map_err(|source| CommandError::MenuFile {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Catalog::from_json(&json)?)
    }

    /// Open the cart persisted under the data directory.
    #[must_use]
    pub fn open_store(&self) -> CartStore {
        open_store(&self.data_dir)
    }
}

fn open_store(data_dir: &Path) -> CartStore {
    let mut store = CartStore::open(Arc::new(FileStorage::new(data_dir)));
    store.subscribe(|cart: &Cart| {
        tracing::debug!(lines = cart.len(), total = %cart.total(), "cart changed");
    });
    tracing::debug!(data_dir = %data_dir.display(), lines = store.items().len(), "cart opened");
    store
}
