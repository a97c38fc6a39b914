//! In-memory catalog filtering and sorting.
//!
//! Filters are additive: a product must pass every active criterion.
//! Both `apply` and `sort` take slices and return fresh vectors, leaving
//! the cached catalog untouched.

use chronos_core::Price;

use crate::supabase::types::Product;

/// The filter panel's active selections.
///
/// Empty selections mean "no constraint". Criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveFilters {
    /// Ribbon labels; matched case-insensitively against the badge.
    pub ribbons: Vec<String>,
    /// Brand names; matched exactly.
    pub brands: Vec<String>,
    /// Inclusive lower bound on the effective price.
    pub min_price: Option<Price>,
    /// Inclusive upper bound on the effective price.
    pub max_price: Option<Price>,
}

impl ActiveFilters {
    /// Whether any criterion is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.ribbons.is_empty()
            || !self.brands.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    /// Whether a product passes every active criterion.
    ///
    /// A product missing its badge or brand never matches the respective
    /// filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.ribbons.is_empty() {
            let Some(badge) = product.badge.as_deref() else {
                return false;
            };
            if !self
                .ribbons
                .iter()
                .any(|ribbon| ribbon.eq_ignore_ascii_case(badge))
            {
                return false;
            }
        }

        if !self.brands.is_empty() {
            let Some(brand) = product.brand.as_deref() else {
                return false;
            };
            if !self.brands.iter().any(|selected| selected == brand) {
                return false;
            }
        }

        let price = product.effective_price();
        if let Some(min) = self.min_price
            && price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && price > max
        {
            return false;
        }

        true
    }

    /// The products passing every active criterion, input order preserved.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// The sort dropdown's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Catalog order as fetched. The default.
    #[default]
    Recommended,
    PriceLow,
    PriceHigh,
    Newest,
}

impl SortKey {
    /// The dropdown option values.
    pub const ALL: [Self; 4] = [Self::Recommended, Self::PriceLow, Self::PriceHigh, Self::Newest];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
        }
    }

    /// Parse a dropdown value; unknown values fall back to the default.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "newest" => Self::Newest,
            _ => Self::Recommended,
        }
    }

    /// Sort a product list by this key.
    ///
    /// All sorts are stable, so equal-priced products keep their relative
    /// catalog order.
    pub fn sort(self, products: &mut [&Product]) {
        match self {
            // The incoming order already is the recommendation.
            Self::Recommended => {}
            Self::PriceLow => {
                products.sort_by_key(|product| product.effective_price());
            }
            Self::PriceHigh => {
                products.sort_by_key(|product| std::cmp::Reverse(product.effective_price()));
            }
            Self::Newest => {
                products.sort_by_key(|product| std::cmp::Reverse(product.id));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chronos_core::ProductId;

    use super::super::test_fixtures::sample_catalog;
    use super::*;

    fn ids(products: &[&Product]) -> Vec<i64> {
        products.iter().map(|product| product.id.as_i64()).collect()
    }

    #[test]
    fn test_default_filters_match_everything() {
        let catalog = sample_catalog();
        let filters = ActiveFilters::default();
        assert!(!filters.is_active());
        assert_eq!(filters.apply(&catalog).len(), catalog.len());
    }

    #[test]
    fn test_ribbon_filter_is_case_insensitive() {
        let catalog = sample_catalog();
        let filters = ActiveFilters {
            ribbons: vec!["SALE".to_string()],
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![2]);
    }

    #[test]
    fn test_ribbon_filter_skips_unbadged_products() {
        let catalog = sample_catalog();
        let filters = ActiveFilters {
            ribbons: vec!["New".to_string(), "Bestseller".to_string()],
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![1, 5]);
    }

    #[test]
    fn test_brand_filter_is_exact() {
        let catalog = sample_catalog();
        let filters = ActiveFilters {
            brands: vec!["chronos".to_string()],
            ..ActiveFilters::default()
        };
        assert!(filters.apply(&catalog).is_empty());

        let filters = ActiveFilters {
            brands: vec!["Chronos".to_string()],
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![1, 3]);
    }

    #[test]
    fn test_brand_filter_skips_unbranded_products() {
        let mut catalog = sample_catalog();
        catalog[0].brand = None;
        let filters = ActiveFilters {
            brands: vec!["Chronos".to_string()],
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![3]);
    }

    #[test]
    fn test_price_bounds_use_effective_price() {
        let catalog = sample_catalog();
        // Product 2 lists at 2000 but sells at 1500; a 1600 cap includes it.
        let filters = ActiveFilters {
            max_price: Some(Price::new(1600)),
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![2, 3]);

        let filters = ActiveFilters {
            min_price: Some(Price::new(5000)),
            max_price: Some(Price::new(10_000)),
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![1, 5]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let catalog = sample_catalog();
        let filters = ActiveFilters {
            brands: vec!["Chronos".to_string()],
            max_price: Some(Price::new(1000)),
            ..ActiveFilters::default()
        };
        assert_eq!(ids(&filters.apply(&catalog)), vec![3]);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let catalog = sample_catalog();
        let before: Vec<_> = catalog.iter().map(|product| product.id).collect();
        let filters = ActiveFilters {
            brands: vec!["Meridian".to_string()],
            ..ActiveFilters::default()
        };
        let _ = filters.apply(&catalog);
        let after: Vec<_> = catalog.iter().map(|product| product.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = sample_catalog();
        let filters = ActiveFilters {
            brands: vec!["Meridian".to_string()],
            ..ActiveFilters::default()
        };
        let once = filters.apply(&catalog);
        let twice: Vec<&Product> = once
            .iter()
            .copied()
            .filter(|product| filters.matches(product))
            .collect();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_sort_price_low_uses_effective_price() {
        let catalog = sample_catalog();
        let mut products: Vec<&Product> = catalog.iter().collect();
        SortKey::PriceLow.sort(&mut products);
        // Product 2 sells at 1500, below product 1's 5000 list price.
        assert_eq!(ids(&products), vec![3, 2, 1, 5, 4]);
    }

    #[test]
    fn test_sort_price_high_reverses_price_low() {
        let catalog = sample_catalog();
        let mut low: Vec<&Product> = catalog.iter().collect();
        let mut high: Vec<&Product> = catalog.iter().collect();
        SortKey::PriceLow.sort(&mut low);
        SortKey::PriceHigh.sort(&mut high);
        // No price ties in the fixture, so high is exactly low reversed.
        low.reverse();
        assert_eq!(ids(&low), ids(&high));
    }

    #[test]
    fn test_sort_newest_descends_by_id() {
        let catalog = sample_catalog();
        let mut products: Vec<&Product> = catalog.iter().collect();
        SortKey::Newest.sort(&mut products);
        assert_eq!(ids(&products), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_recommended_is_identity() {
        let catalog = sample_catalog();
        let mut products: Vec<&Product> = catalog.iter().collect();
        SortKey::Recommended.sort(&mut products);
        assert_eq!(ids(&products), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_key_parse_roundtrip() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), key);
        }
        assert_eq!(SortKey::parse("garbage"), SortKey::Recommended);
    }

    #[test]
    fn test_price_low_sort_is_stable_for_ties() {
        let mut catalog = sample_catalog();
        // Give two products the same effective price.
        catalog[0].price = catalog[3].price;
        catalog[0].id = ProductId::new(1);
        let mut products: Vec<&Product> = catalog.iter().collect();
        SortKey::PriceLow.sort(&mut products);
        let ids = ids(&products);
        let first = ids.iter().position(|&id| id == 1).unwrap();
        let second = ids.iter().position(|&id| id == 4).unwrap();
        assert!(first < second);
    }
}
