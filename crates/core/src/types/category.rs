//! Product category enum.

use serde::{Deserialize, Serialize};

/// The fixed set of product categories in the catalog.
///
/// Matches the `category` column of the remote `products` table. Category
/// landing pages address these via URL slugs, handled by [`Category::from_slug`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Everyday,
    Elite,
    Exclusive,
    Accessories,
    Masterpiece,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::Masterpiece,
        Self::Everyday,
        Self::Elite,
        Self::Exclusive,
        Self::Accessories,
    ];

    /// The category value as stored in the remote table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Everyday => "everyday",
            Self::Elite => "elite",
            Self::Exclusive => "exclusive",
            Self::Accessories => "accessories",
            Self::Masterpiece => "masterpiece",
        }
    }

    /// Parse a stored category value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "everyday" => Some(Self::Everyday),
            "elite" => Some(Self::Elite),
            "exclusive" => Some(Self::Exclusive),
            "accessories" => Some(Self::Accessories),
            "masterpiece" => Some(Self::Masterpiece),
            _ => None,
        }
    }

    /// Map a category page slug to its category.
    ///
    /// The category landing pages use marketing slugs rather than the raw
    /// column values.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "everyday-elegance" => Some(Self::Everyday),
            "elite-luxury" => Some(Self::Elite),
            "exclusive-collections" => Some(Self::Exclusive),
            "premium-accessories" => Some(Self::Accessories),
            _ => Self::parse(slug),
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("unknown"), None);
    }

    #[test]
    fn test_page_slugs() {
        assert_eq!(
            Category::from_slug("everyday-elegance"),
            Some(Category::Everyday)
        );
        assert_eq!(Category::from_slug("elite-luxury"), Some(Category::Elite));
        assert_eq!(
            Category::from_slug("exclusive-collections"),
            Some(Category::Exclusive)
        );
        assert_eq!(
            Category::from_slug("premium-accessories"),
            Some(Category::Accessories)
        );
        // Raw values also accepted
        assert_eq!(
            Category::from_slug("masterpiece"),
            Some(Category::Masterpiece)
        );
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Category::Everyday).unwrap();
        assert_eq!(json, "\"everyday\"");
        let back: Category = serde_json::from_str("\"accessories\"").unwrap();
        assert_eq!(back, Category::Accessories);
    }
}
