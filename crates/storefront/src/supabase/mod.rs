//! Supabase remote data/auth service client.
//!
//! # Architecture
//!
//! - The hosted service is the source of truth for products, orders, and
//!   the wishlist - no local sync, direct API calls
//! - Table access goes through the PostgREST-style endpoints under
//!   `/rest/v1/`; authentication goes through `/auth/v1/`
//! - The client is constructed exactly once from [`SupabaseConfig`] and
//!   handed to the services that need it; it is cheap to clone
//!
//! # Example
//!
//! ```rust,ignore
//! use chronos_storefront::supabase::{Filter, SupabaseClient};
//!
//! let client = SupabaseClient::new(&config.supabase);
//!
//! // Load the catalog
//! let products: Vec<Product> = client
//!     .select("products", None, &[], Some("created_at.desc"), None)
//!     .await?;
//!
//! // Authenticated wishlist insert
//! let session = client.sign_in_with_password("user@example.com", "pw").await?;
//! client
//!     .insert("wishlist", &entry, Some(&session))
//!     .await?;
//! ```
//!
//! [`SupabaseConfig`]: crate::config::SupabaseConfig

mod auth;
mod client;
pub mod types;

pub use auth::{AuthError, Provider, Session, SessionUser, SignUp};
pub use client::{Filter, SupabaseClient};

use thiserror::Error;

/// Errors that can occur when talking to the remote service.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed (network, DNS, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status.
    #[error("Service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON response could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Extract a human-readable message from a service error body.
///
/// PostgREST uses `{"message": ...}`, the auth endpoints use
/// `{"error_description": ...}` or `{"msg": ...}`. Falls back to the raw
/// body, truncated.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error_description", "msg", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    body.chars().take(200).collect()
}
