//! Checkout and order history.
//!
//! Placing an order writes an `orders` row and its `order_items` rows under
//! the signed-in user's session, then clears the cart. The cart is cleared
//! only after the remote service confirms the order; any failure along the
//! way surfaces to the caller with the cart intact.

use tracing::{info, instrument};

use chronos_core::{OrderStatus, Price};

use crate::cart::{CartItem, CartManager};
use crate::store::StoreError;
use crate::supabase::types::{NewOrder, NewOrderItem, Order, ShippingInfo};
use crate::supabase::{Filter, Session, SupabaseClient, SupabaseError};

/// Errors that can occur placing or listing orders.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Checkout requires a signed-in session.
    #[error("not signed in")]
    NotAuthenticated,

    /// An empty cart cannot be ordered.
    #[error("cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The remote service rejected or failed the request.
    #[error(transparent)]
    Supabase(#[from] SupabaseError),

    /// The local cart could not be updated.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The checkout form as typed, before validation.
#[derive(Debug, Clone, Default)]
pub struct ShippingForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl ShippingForm {
    /// Validate the form into shipping info.
    ///
    /// Every field is required; whitespace-only counts as blank.
    /// Validation reports the first blank field in form order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::MissingField` naming the first blank field.
    pub fn validate(&self) -> Result<ShippingInfo, OrderError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(OrderError::MissingField(field));
            }
        }

        Ok(ShippingInfo {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
        })
    }
}

/// The order total as the `orders` table records it.
///
/// Totals are computed from list prices. The cart summary shows effective
/// prices, so a cart containing sale items totals lower on screen than on
/// the stored order.
#[must_use]
pub fn order_total(items: &[CartItem]) -> Price {
    items.iter().fold(Price::ZERO, |total, item| {
        total.saturating_add(item.product.price.saturating_mul(item.quantity))
    })
}

/// Checkout against the remote data service.
#[derive(Clone)]
pub struct OrderService {
    client: SupabaseClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Place an order for the cart's contents.
    ///
    /// Validates the form, writes the order and its items under the
    /// session's user, and clears the cart. On any failure the error
    /// propagates and the cart is left untouched, so the buyer can retry.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotAuthenticated` without a session,
    /// `OrderError::EmptyCart` for an empty cart, a validation error for a
    /// bad form, or the underlying service error.
    #[instrument(skip_all)]
    pub async fn place_order(
        &self,
        session: Option<&Session>,
        cart: &CartManager<'_>,
        form: &ShippingForm,
    ) -> Result<Order, OrderError> {
        let session = session.ok_or(OrderError::NotAuthenticated)?;
        let shipping_info = form.validate()?;

        let items = cart.items();
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order: Order = self
            .client
            .insert_returning(
                "orders",
                &NewOrder {
                    user_id: session.user.id,
                    total: order_total(&items),
                    status: OrderStatus::Pending,
                    shipping_info,
                },
                Some(session),
            )
            .await?;

        let order_items: Vec<NewOrderItem> = items
            .iter()
            .map(|item| NewOrderItem {
                order_id: order.id,
                product_id: item.product.id,
                quantity: item.quantity,
                price: item.product.price,
            })
            .collect();
        self.client
            .insert("order_items", &order_items, Some(session))
            .await?;

        cart.clear()?;
        info!(order_id = %order.id, items = order_items.len(), "order placed");
        Ok(order)
    }

    /// The session user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotAuthenticated` without a session, or the
    /// underlying service error.
    #[instrument(skip_all)]
    pub async fn history(&self, session: Option<&Session>) -> Result<Vec<Order>, OrderError> {
        let session = session.ok_or(OrderError::NotAuthenticated)?;
        let orders = self
            .client
            .select(
                "orders",
                None,
                &[Filter::eq("user_id", session.user.id)],
                Some("created_at.desc"),
                Some(session),
            )
            .await?;
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chronos_core::ProductId;

    use super::*;
    use crate::catalog::test_fixtures::sample_catalog;
    use crate::store::LocalStore;

    fn filled_form() -> ShippingForm {
        ShippingForm {
            name: "Ada Lovelace".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            address: "1 Analytical Way".to_string(),
            city: "London".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_filled_form() {
        let info = filled_form().validate().unwrap();
        assert_eq!(info.name, "Ada Lovelace");
        assert_eq!(info.city, "London");
    }

    #[test]
    fn test_validate_reports_first_blank_field() {
        let mut form = filled_form();
        form.phone = "   ".to_string();
        form.city = String::new();
        let err = form.validate().unwrap_err();
        assert!(matches!(err, OrderError::MissingField("phone")));
    }

    #[test]
    fn test_validate_trims_fields() {
        let mut form = filled_form();
        form.name = "  Ada Lovelace  ".to_string();
        let info = form.validate().unwrap();
        assert_eq!(info.name, "Ada Lovelace");
    }

    #[test]
    fn test_validate_rejects_empty_form() {
        let err = ShippingForm::default().validate().unwrap_err();
        assert!(matches!(err, OrderError::MissingField("name")));
    }

    #[test]
    fn test_order_total_uses_list_prices() {
        let catalog = sample_catalog();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let cart = CartManager::new(&store);

        // Product 2 lists at 2000 (sells at 1500), product 3 at 400.
        cart.add(&catalog, ProductId::new(2), 1).unwrap();
        cart.add(&catalog, ProductId::new(3), 1).unwrap();

        assert_eq!(order_total(&cart.items()), Price::new(2400));
        assert_eq!(cart.subtotal(), Price::new(1900));
    }

    #[test]
    fn test_order_total_multiplies_quantity() {
        let catalog = sample_catalog();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let cart = CartManager::new(&store);

        cart.add(&catalog, ProductId::new(3), 1).unwrap();
        cart.update_quantity(ProductId::new(3), 4).unwrap();
        assert_eq!(order_total(&cart.items()), Price::new(2000));
    }
}
