//! Application state shared across handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use warung_core::cart::{CartStorage, FileStorage};
use warung_core::{Bill, Cart, Catalog, CatalogError, CartStore};

use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read menu file {path}: {source}")]
    MenuFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid menu: {0}")]
    Menu(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the single cart store
/// for this storefront; handlers lock it, run one operation, and release it
/// before rendering.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<CartStore>,
    last_bill: Mutex<Option<Bill>>,
    revision: Arc<AtomicU64>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Menu offered for sale
    /// * `storage` - Where the cart is persisted
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, storage: Arc<dyn CartStorage>) -> Self {
        let mut store = CartStore::open(storage);

        // Every render notification bumps the revision so pages can tell
        // whether the cart moved underneath them.
        let revision = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&revision);
        store.subscribe(move |cart: &Cart| {
            let revision = counter.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(
                revision,
                lines = cart.len(),
                total = %cart.total(),
                "cart render notification"
            );
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(store),
                last_bill: Mutex::new(None),
                revision,
            }),
        }
    }

    /// Build state from configuration: load the menu and open file storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured menu file cannot be read or parsed.
    pub fn from_config(config: StorefrontConfig) -> Result<(Self, FileStorage), StateError> {
        let catalog = match &config.menu_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| StateError::MenuFile {
                    path: path.display().to_string(),
                    source,
                })?;
                Catalog::from_json(&json)?
            }
            None => Catalog::builtin(),
        };
        tracing::info!(items = catalog.items().len(), "menu loaded");

        let storage = FileStorage::new(&config.data_dir);
        let state = Self::new(config, catalog, Arc::new(storage.clone()));
        Ok((state, storage))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the menu catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the cart store.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if a previous holder panicked.
    pub fn cart(&self) -> Result<MutexGuard<'_, CartStore>, AppError> {
        self.inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("cart lock poisoned".to_string()))
    }

    /// Number of render notifications so far.
    #[must_use]
    pub fn cart_revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Relaxed)
    }

    /// The bill currently on screen, if any.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if a previous holder panicked.
    pub fn last_bill(&self) -> Result<MutexGuard<'_, Option<Bill>>, AppError> {
        self.inner
            .last_bill
            .lock()
            .map_err(|_| AppError::Internal("bill lock poisoned".to_string()))
    }
}
