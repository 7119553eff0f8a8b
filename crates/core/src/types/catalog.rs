//! Catalog records received from the backend API.
//!
//! These mirror the backend's JSON documents. Field names follow the
//! backend's camelCase convention and its `_id` primary keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, ProductId, SliderId};
use super::price::{Price, deserialize_optional_price};

/// A product for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    /// Category names. The backend stores either a single name or a list.
    #[serde(default, deserialize_with = "one_or_many")]
    pub category: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub regular_price: Price,
    #[serde(default, deserialize_with = "deserialize_optional_price")]
    pub discount_price: Option<Price>,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The price a customer pays: the discount price when set and non-zero,
    /// otherwise the regular price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discount_price
            .filter(|p| !p.is_zero())
            .unwrap_or(self.regular_price)
    }

    /// Returns `true` when a discount applies.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective_price() != self.regular_price
    }

    /// The first image, used for cards and cart lines.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Returns `true` if the product is listed under `category`.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.iter().any(|c| c == category)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// An image on the home page slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderImage {
    #[serde(rename = "_id")]
    pub id: SliderId,
    pub image_url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
    Null,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null => Vec::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_with_category_list() {
        let json = r#"{
            "_id": "p1",
            "name": "Cotton Saree",
            "category": ["Saree", "Women"],
            "description": "Handwoven",
            "regularPrice": "2500",
            "discountPrice": "2200",
            "images": ["https://img/1.jpg", "https://img/2.jpg"],
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.category, vec!["Saree", "Women"]);
        assert_eq!(product.effective_price(), Price::from_taka(2200));
        assert!(product.is_discounted());
        assert_eq!(product.primary_image(), Some("https://img/1.jpg"));
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_product_with_scalar_category_and_numbers() {
        let json = r#"{
            "_id": "p2",
            "name": "Panjabi",
            "category": "Men",
            "regularPrice": 1800,
            "discountPrice": 0
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.category, vec!["Men"]);
        assert_eq!(product.effective_price(), Price::from_taka(1800));
        assert!(!product.is_discounted());
        assert!(product.images.is_empty());
        assert_eq!(product.primary_image(), None);
    }

    #[test]
    fn test_product_empty_discount_is_absent() {
        let json = r#"{"_id": "p3", "name": "Lungi", "regularPrice": "450", "discountPrice": ""}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.discount_price, None);
        assert!(product.category.is_empty());
    }

    #[test]
    fn test_in_category_is_exact() {
        let json = r#"{"_id": "p4", "name": "Scarf", "category": ["Women"], "regularPrice": 300}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.in_category("Women"));
        assert!(!product.in_category("women"));
        assert!(!product.in_category("Wom"));
    }

    #[test]
    fn test_category_and_slider() {
        let category: Category =
            serde_json::from_str(r#"{"_id": "c1", "name": "Saree", "image": "https://img/c.jpg"}"#)
                .unwrap();
        assert_eq!(category.image.as_deref(), Some("https://img/c.jpg"));

        let slider: SliderImage =
            serde_json::from_str(r#"{"_id": "s1", "imageUrl": "https://img/s.jpg"}"#).unwrap();
        assert_eq!(slider.image_url, "https://img/s.jpg");
    }
}
