//! The shopping cart.
//!
//! Cart contents live in the [`LocalStore`] under [`keys::CART`], as full
//! product snapshots plus quantities. Snapshotting the product means the
//! cart page renders without a catalog fetch and a later price edit does
//! not silently reprice what the buyer already added.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use chronos_core::{Price, ProductId};

use crate::store::{LocalStore, StoreError, keys};
use crate::supabase::types::Product;

/// One cart line: a product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// The line total at the product's effective price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.effective_price().saturating_mul(self.quantity)
    }
}

/// Cart operations over a [`LocalStore`].
#[derive(Debug, Clone, Copy)]
pub struct CartManager<'a> {
    store: &'a LocalStore,
}

impl<'a> CartManager<'a> {
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// The current cart lines, oldest first.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.store.get(keys::CART).unwrap_or_default()
    }

    fn save(&self, items: &[CartItem]) -> Result<(), StoreError> {
        self.store.set(keys::CART, &items)
    }

    /// Add `quantity` units of a product, looked up in `products` by ID.
    ///
    /// Adding a product already in the cart increments its quantity.
    /// An ID absent from `products` or a zero quantity leaves the cart
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self, products))]
    pub fn add(
        &self,
        products: &[Product],
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        if quantity == 0 {
            return Ok(());
        }
        let Some(product) = products.iter().find(|product| product.id == product_id) else {
            debug!(%product_id, "add ignored, product not in catalog");
            return Ok(());
        };

        let mut items = self.items();
        match items.iter_mut().find(|item| item.product.id == product_id) {
            Some(item) => item.quantity += quantity,
            None => items.push(CartItem {
                product: product.clone(),
                quantity,
            }),
        }
        self.save(&items)
    }

    /// Adjust a line's quantity by a signed delta.
    ///
    /// A quantity landing at or below zero removes the line. An ID not in
    /// the cart is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, product_id: ProductId, delta: i32) -> Result<(), StoreError> {
        let mut items = self.items();
        let Some(item) = items.iter_mut().find(|item| item.product.id == product_id) else {
            return Ok(());
        };

        let quantity = i64::from(item.quantity) + i64::from(delta);
        match u32::try_from(quantity) {
            Ok(quantity) if quantity > 0 => {
                item.quantity = quantity;
            }
            _ => {
                items.retain(|item| item.product.id != product_id);
            }
        }
        self.save(&items)
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove(&self, product_id: ProductId) -> Result<(), StoreError> {
        let mut items = self.items();
        items.retain(|item| item.product.id != product_id);
        self.save(&items)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items().iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals at effective prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items()
            .iter()
            .fold(Price::ZERO, |total, item| total.saturating_add(item.line_total()))
    }

    /// The flat shipping cost chosen at checkout, zero until one is set.
    #[must_use]
    pub fn shipping_cost(&self) -> Price {
        self.store.get(keys::SHIPPING_COST).unwrap_or(Price::ZERO)
    }

    /// Persist the shipping cost for the summary and checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    pub fn set_shipping_cost(&self, cost: Price) -> Result<(), StoreError> {
        self.store.set(keys::SHIPPING_COST, &cost)
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal().saturating_add(self.shipping_cost())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CART)
    }
}
