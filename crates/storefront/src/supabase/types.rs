//! Row types for the storefront's tables.
//!
//! Field names mirror the database columns so the rows serialize straight
//! through [`SupabaseClient`](super::SupabaseClient) without rename
//! annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chronos_core::{Category, OrderId, OrderStatus, Price, ProductId, UserId};

// =============================================================================
// Products
// =============================================================================

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub category: Category,
    /// List price.
    pub price: Price,
    /// Discounted price, when a sale has ever been configured.
    #[serde(default)]
    pub sale_price: Option<Price>,
    #[serde(default)]
    pub is_on_sale: bool,
    /// Marketing ribbon shown on the product card ("New", "Bestseller", ...).
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub stock_quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Stock level bucket driving the product card's availability label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    /// Five or fewer units left.
    LowStock,
    OutOfStock,
}

impl StockStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in-stock",
            Self::LowStock => "low-stock",
            Self::OutOfStock => "out-of-stock",
        }
    }
}

impl Product {
    /// Units remaining at or below which stock counts as low.
    pub const LOW_STOCK_THRESHOLD: u32 = 5;

    /// The price a buyer actually pays.
    ///
    /// The sale price applies when the sale flag is set, and also whenever
    /// it undercuts the list price even if the flag was left unset. A sale
    /// price at or above the list price with the flag unset is ignored.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if self.is_on_sale || sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Whether the buyer pays less than the list price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Discount as a whole percentage of the list price, `None` when the
    /// product sells at list price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let effective = self.effective_price();
        if effective >= self.price || self.price.is_zero() {
            return None;
        }
        let saved = self.price.amount() - effective.amount();
        let percent = saved * 100 / self.price.amount();
        u32::try_from(percent).ok()
    }

    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        match self.stock_quantity {
            0 => StockStatus::OutOfStock,
            1..=Self::LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Shipping details captured at checkout, stored denormalized on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

/// A new row for the `orders` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_info: ShippingInfo,
}

/// A row of the `orders` table as returned on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_info: ShippingInfo,
    pub created_at: DateTime<Utc>,
}

/// A new row for the `order_items` table.
///
/// `price` is the unit price at purchase time, frozen so later catalog
/// edits do not rewrite order history.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

// =============================================================================
// Wishlist
// =============================================================================

/// A new row for the `wishlist` table.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistEntry {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// Projection used when only the product IDs of a wishlist are needed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WishlistProductId {
    pub product_id: ProductId,
}
