//! Chronos Core - Shared types library.
//!
//! This crate provides the common types used by the Chronos Timepieces
//! storefront components.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, the product
//!   category and order status enums, and the validated email type.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
