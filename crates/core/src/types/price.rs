//! Type-safe price representation.
//!
//! Prices are stored in the smallest currency unit as integers, matching
//! the `price` and `sale_price` columns of the remote `products` table.
//! All arithmetic is on integers; there is no floating point anywhere in
//! the money path.

use serde::{Deserialize, Serialize};

/// A monetary amount in the smallest currency unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// The zero price (e.g., free shipping).
    pub const ZERO: Self = Self(0);

    /// Create a price from a raw amount in the smallest currency unit.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the raw amount in the smallest currency unit.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// Add another price, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Whether this price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for Price {
    /// Format with thousands separators, e.g. `12,500`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let raw = self.0.unsigned_abs().to_string();
        if self.0 < 0 {
            write!(f, "-")?;
        }
        let first = raw.len() % 3;
        let (head, tail) = raw.split_at(first.min(raw.len()));
        if !head.is_empty() {
            write!(f, "{head}")?;
        }
        for (i, chunk) in tail.as_bytes().chunks(3).enumerate() {
            if !head.is_empty() || i > 0 {
                write!(f, ",")?;
            }
            // Chunks of an ASCII digit string are valid UTF-8
            write!(f, "{}", String::from_utf8_lossy(chunk))?;
        }
        Ok(())
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}
