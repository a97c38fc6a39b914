//! The product catalog.
//!
//! [`CatalogService`] fetches products through the remote data client and
//! caches the full list for 5 minutes with `moka`, so a browsing session
//! filters and searches in memory instead of refetching per interaction.
//! Filtering, sorting, and search are pure functions over the cached list.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use chronos_core::{Category, ProductId};

use crate::supabase::types::Product;
use crate::supabase::{SupabaseClient, SupabaseError};

pub mod filter;
pub mod search;

pub use filter::{ActiveFilters, SortKey};

const CACHE_TTL: Duration = Duration::from_secs(300);
const PRODUCTS_KEY: &str = "products";

/// Cached read access to the product catalog.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    client: SupabaseClient,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl CatalogService {
    /// Create a catalog service over a data client.
    #[must_use]
    pub fn new(client: SupabaseClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { client, cache }),
        }
    }

    /// All products, newest first.
    ///
    /// Served from cache for 5 minutes after a fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails and no cached copy exists.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, SupabaseError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_KEY).await {
            debug!("cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .inner
            .client
            .select("products", None, &[], Some("created_at.desc"), None)
            .await?;
        debug!(count = products.len(), "fetched product catalog");

        let products = Arc::new(products);
        self.inner
            .cache
            .insert(PRODUCTS_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// A single product by ID, `None` if the catalog has no such product.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, SupabaseError> {
        let products = self.products().await?;
        Ok(find(&products, id).cloned())
    }

    /// Drop the cached catalog so the next read refetches.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(PRODUCTS_KEY).await;
    }
}

// =============================================================================
// Pure catalog queries
// =============================================================================

/// Find a product by ID.
#[must_use]
pub fn find(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|product| product.id == id)
}

/// The products in one category, catalog order preserved.
#[must_use]
pub fn in_category(products: &[Product], category: Category) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| product.category == category)
        .collect()
}

/// Product count per category, in [`Category::ALL`] order.
#[must_use]
pub fn category_counts(products: &[Product]) -> Vec<(Category, usize)> {
    Category::ALL
        .iter()
        .map(|&category| {
            let count = products
                .iter()
                .filter(|product| product.category == category)
                .count();
            (category, count)
        })
        .collect()
}

/// Distinct brands with product counts, in order of first appearance.
///
/// Products without a brand contribute to no facet.
#[must_use]
pub fn brand_facets(products: &[Product]) -> Vec<(String, usize)> {
    let mut facets: Vec<(String, usize)> = Vec::new();
    for brand in products.iter().filter_map(|product| product.brand.as_deref()) {
        match facets.iter_mut().find(|(name, _)| name == brand) {
            Some((_, count)) => *count += 1,
            None => facets.push((brand.to_string(), 1)),
        }
    }
    facets
}
