//! Catalog text search.
//!
//! Case-insensitive substring matching over the cached catalog. Two entry
//! points with different field sets: the results page searches name, brand,
//! and category; the suggestion dropdowns also match on SKU so staff can
//! paste one straight into the search box.

use crate::supabase::types::Product;

/// Maximum suggestions shown under the results page's search box.
pub const PAGE_SUGGESTION_LIMIT: usize = 3;
/// Maximum suggestions shown in the site-wide top bar.
pub const TOP_BAR_SUGGESTION_LIMIT: usize = 5;

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Full search over name, brand, and category.
///
/// A blank query passes everything, so the results page with no query
/// shows the whole catalog. Results keep catalog order.
#[must_use]
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|product| {
            contains_ignore_case(&product.name, &query)
                || product
                    .brand
                    .as_deref()
                    .is_some_and(|brand| contains_ignore_case(brand, &query))
                || contains_ignore_case(product.category.as_str(), &query)
        })
        .collect()
}

/// Suggestion matching over name, SKU, and category, truncated to `limit`.
///
/// A blank query yields no suggestions.
#[must_use]
pub fn suggest<'a>(products: &'a [Product], query: &str, limit: usize) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| {
            contains_ignore_case(&product.name, &query)
                || product
                    .sku
                    .as_deref()
                    .is_some_and(|sku| contains_ignore_case(sku, &query))
                || contains_ignore_case(product.category.as_str(), &query)
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::sample_catalog;
    use super::*;

    fn names<'a>(products: &'a [&'a Product]) -> Vec<&'a str> {
        products.iter().map(|product| product.name.as_str()).collect()
    }

    #[test]
    fn test_search_matches_name_substring_case_insensitive() {
        let catalog = sample_catalog();
        // "chrono" hits "Chronos Elite" by name and "Leather Strap" by its
        // "Chronos" brand; the full-name query narrows to the name match.
        assert_eq!(
            names(&search(&catalog, "chrono")),
            vec!["Chronos Elite", "Leather Strap"]
        );
        assert_eq!(names(&search(&catalog, "CHRONOS ELITE")), vec!["Chronos Elite"]);
    }

    #[test]
    fn test_search_matches_brand() {
        let catalog = sample_catalog();
        assert_eq!(
            names(&search(&catalog, "meridian")),
            vec!["Field Classic", "Diver Exclusive"]
        );
    }

    #[test]
    fn test_search_matches_category() {
        let catalog = sample_catalog();
        assert_eq!(names(&search(&catalog, "masterpiece")), vec!["Grand Tourbillon"]);
    }

    #[test]
    fn test_search_blank_query_passes_everything() {
        let catalog = sample_catalog();
        assert_eq!(search(&catalog, "").len(), catalog.len());
        assert_eq!(search(&catalog, "   ").len(), catalog.len());
    }

    #[test]
    fn test_search_excludes_non_matching_products() {
        let catalog = sample_catalog();
        let results = search(&catalog, "chrono");
        assert!(!names(&results).contains(&"Grand Tourbillon"));
    }

    #[test]
    fn test_search_tolerates_missing_brand() {
        let mut catalog = sample_catalog();
        for product in &mut catalog {
            product.brand = None;
        }
        assert!(search(&catalog, "meridian").is_empty());
    }

    #[test]
    fn test_suggest_matches_sku_but_search_does_not() {
        let catalog = sample_catalog();
        assert!(search(&catalog, "MER-010").is_empty());
        assert_eq!(
            names(&suggest(&catalog, "mer-010", TOP_BAR_SUGGESTION_LIMIT)),
            vec!["Field Classic"]
        );
    }

    #[test]
    fn test_suggest_respects_limit() {
        let catalog = sample_catalog();
        // Brands are not a suggestion field, so match on category instead:
        // every fixture product has a distinct category. Search by the "e"
        // in several names and categories to exceed the page limit.
        let suggestions = suggest(&catalog, "e", PAGE_SUGGESTION_LIMIT);
        assert_eq!(suggestions.len(), PAGE_SUGGESTION_LIMIT);
        let all = suggest(&catalog, "e", usize::MAX);
        assert!(all.len() > PAGE_SUGGESTION_LIMIT);
        // Truncation keeps the leading results.
        assert_eq!(names(&suggestions), names(&all)[..PAGE_SUGGESTION_LIMIT]);
    }
}
