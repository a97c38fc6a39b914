//! The wishlist.
//!
//! Signed-in users keep their wishlist in the remote `wishlist` table, one
//! row per (user, product). Anonymous visitors get a local wishlist in the
//! [`LocalStore`] so hearts still work before sign-in.

use tracing::instrument;

use chronos_core::ProductId;

use crate::store::{LocalStore, StoreError, keys};
use crate::supabase::types::{WishlistEntry, WishlistProductId};
use crate::supabase::{Filter, Session, SupabaseClient, SupabaseError};

/// Remote wishlist operations.
#[derive(Clone)]
pub struct WishlistService {
    client: SupabaseClient,
}

impl WishlistService {
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// The session user's wishlisted product IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    #[instrument(skip_all)]
    pub async fn product_ids(&self, session: &Session) -> Result<Vec<ProductId>, SupabaseError> {
        let rows: Vec<WishlistProductId> = self
            .client
            .select(
                "wishlist",
                Some("product_id"),
                &[Filter::eq("user_id", session.user.id)],
                None,
                Some(session),
            )
            .await?;
        Ok(rows.into_iter().map(|row| row.product_id).collect())
    }

    /// Add a product to the session user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self, session))]
    pub async fn add(&self, session: &Session, product_id: ProductId) -> Result<(), SupabaseError> {
        self.client
            .insert(
                "wishlist",
                &WishlistEntry {
                    user_id: session.user.id,
                    product_id,
                },
                Some(session),
            )
            .await
    }

    /// Remove a product from the session user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[instrument(skip(self, session))]
    pub async fn remove(
        &self,
        session: &Session,
        product_id: ProductId,
    ) -> Result<(), SupabaseError> {
        self.client
            .delete(
                "wishlist",
                &[
                    Filter::eq("user_id", session.user.id),
                    Filter::eq("product_id", product_id),
                ],
                Some(session),
            )
            .await
    }

    /// Flip a product's membership, given its current state as rendered.
    ///
    /// Returns the new membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; membership is then unchanged.
    pub async fn toggle(
        &self,
        session: &Session,
        product_id: ProductId,
        currently_member: bool,
    ) -> Result<bool, SupabaseError> {
        if currently_member {
            self.remove(session, product_id).await?;
            Ok(false)
        } else {
            self.add(session, product_id).await?;
            Ok(true)
        }
    }
}

// =============================================================================
// Anonymous wishlist
// =============================================================================

/// The local wishlist's product IDs, insertion order preserved.
#[must_use]
pub fn local_ids(store: &LocalStore) -> Vec<ProductId> {
    store.get(keys::WISHLIST).unwrap_or_default()
}

/// Flip a product's membership in the local wishlist.
///
/// Returns the new membership.
///
/// # Errors
///
/// Returns an error if the wishlist cannot be persisted.
pub fn toggle_local(store: &LocalStore, product_id: ProductId) -> Result<bool, StoreError> {
    let mut ids = local_ids(store);
    let member = if let Some(position) = ids.iter().position(|&id| id == product_id) {
        ids.remove(position);
        false
    } else {
        ids.push(product_id);
        true
    };
    store.set(keys::WISHLIST, &ids)?;
    Ok(member)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_local_wishlist_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        assert!(local_ids(&store).is_empty());
    }

    #[test]
    fn test_toggle_local_adds_then_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        assert!(toggle_local(&store, ProductId::new(7)).unwrap());
        assert_eq!(local_ids(&store), vec![ProductId::new(7)]);

        assert!(!toggle_local(&store, ProductId::new(7)).unwrap());
        assert!(local_ids(&store).is_empty());
    }

    #[test]
    fn test_toggle_local_preserves_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        toggle_local(&store, ProductId::new(1)).unwrap();
        toggle_local(&store, ProductId::new(2)).unwrap();
        toggle_local(&store, ProductId::new(3)).unwrap();
        toggle_local(&store, ProductId::new(2)).unwrap();

        assert_eq!(local_ids(&store), vec![ProductId::new(1), ProductId::new(3)]);
    }
}
