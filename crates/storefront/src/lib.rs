//! Chronos Storefront - application core for the Chronos Timepieces shop.
//!
//! This crate is the logic layer a UI shell drives: it owns the remote
//! service client, the locally persisted cart, and the catalog
//! filter/sort/search engine. It renders nothing - the embedding layer
//! maps the state exposed here to markup.
//!
//! # Architecture
//!
//! - Supabase-style remote service for products, orders, and wishlist
//!   (REST) plus authentication (password, sign-up, external providers)
//! - File-backed local store for the cart and shipping cost, surviving
//!   restarts the way browser local storage survives reloads
//! - In-memory product snapshot with a short-TTL cache; filtering,
//!   sorting, and search are pure transformations over that snapshot
//!
//! All shared resources are constructed once via [`state::AppState::new`]
//! and handed to the components that need them - there are no ambient
//! globals and no lazily-initialized clients.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod state;
pub mod store;
pub mod supabase;
pub mod wishlist;

/// Initialize the tracing subscriber.
///
/// Call once at startup from the embedding shell. Defaults to info level
/// for this crate if `RUST_LOG` is not set.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chronos_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
