//! Crate-wide error type.
//!
//! Each module defines its own error enum; [`AppError`] unifies them at the
//! application boundary so [`AppState`](crate::state::AppState) callers
//! handle one type.

use crate::config::ConfigError;
use crate::orders::OrderError;
use crate::store::StoreError;
use crate::supabase::{AuthError, SupabaseError};

/// Any error the storefront can surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Supabase(#[from] SupabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for application-boundary results.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_display() {
        let err = AppError::from(OrderError::EmptyCart);
        assert_eq!(err.to_string(), "cart is empty");

        let err = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[test]
    fn test_nested_conversion_through_order_error() {
        let err = AppError::from(OrderError::NotAuthenticated);
        assert!(matches!(err, AppError::Order(OrderError::NotAuthenticated)));
    }
}
