//! Category-driven product filtering and search.
//!
//! All functions operate on the full product list as fetched from the
//! backend and preserve source order.

use crate::types::Product;

/// Collect the distinct category names across `products`, in first-seen order.
///
/// Products listed under several categories contribute each of them.
#[must_use]
pub fn unique_categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in products.iter().flat_map(|p| p.category.iter()) {
        if !seen.iter().any(|s| s == name) {
            seen.push(name.clone());
        }
    }
    seen
}

/// Resolve the active category for a filtered listing.
///
/// A requested category wins if it is non-empty; otherwise the first
/// category in `categories` is used. Returns `None` when there is nothing to
/// choose from.
#[must_use]
pub fn active_category(categories: &[String], requested: Option<&str>) -> Option<String> {
    requested
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .or_else(|| categories.first().cloned())
}

/// Products whose category list contains `category`.
pub fn filter_by_category<'a>(
    products: &'a [Product],
    category: &'a str,
) -> impl Iterator<Item = &'a Product> + 'a {
    products.iter().filter(move |p| p.in_category(category))
}

/// Case-insensitive substring search on product names.
///
/// A blank query matches nothing.
#[must_use]
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Up to `limit` other products sharing at least one category with `product`.
#[must_use]
pub fn related<'a>(products: &'a [Product], product: &Product, limit: usize) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.id != product.id)
        .filter(|p| p.category.iter().any(|c| product.in_category(c)))
        .take(limit)
        .collect()
}
