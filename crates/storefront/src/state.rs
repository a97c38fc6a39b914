//! Shared application state.
//!
//! Everything the UI shell needs hangs off one [`AppState`], built
//! explicitly from a [`StorefrontConfig`]. Cloning is cheap; clones share
//! the HTTP client, catalog cache, and local store.

use std::sync::Arc;

use tracing::info;

use crate::cart::CartManager;
use crate::catalog::CatalogService;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::orders::OrderService;
use crate::store::LocalStore;
use crate::supabase::SupabaseClient;
use crate::wishlist::WishlistService;

/// The storefront's shared state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    supabase: SupabaseClient,
    store: LocalStore,
    catalog: CatalogService,
}

impl AppState {
    /// Build the state from a config: data client, local store, catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let supabase = SupabaseClient::new(&config.supabase);
        let store = LocalStore::open(&config.data_dir)?;
        let catalog = CatalogService::new(supabase.clone());
        info!(data_dir = %config.data_dir.display(), "storefront state initialized");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                store,
                catalog,
            }),
        })
    }

    /// Build the state from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is missing or invalid, or if
    /// the data directory cannot be created.
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(StorefrontConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Cart operations over the shared local store.
    #[must_use]
    pub fn cart(&self) -> CartManager<'_> {
        CartManager::new(&self.inner.store)
    }

    /// Checkout service over the shared data client.
    #[must_use]
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.inner.supabase.clone())
    }

    /// Wishlist service over the shared data client.
    #[must_use]
    pub fn wishlist(&self) -> WishlistService {
        WishlistService::new(self.inner.supabase.clone())
    }
}
