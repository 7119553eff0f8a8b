//! The checkout cart.
//!
//! The cart is a list of lines, serialized whole into the visitor's session.
//! The badge in the navbar shows [`Cart::len`], the number of lines.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// One line in the cart: a snapshot of a product at the time it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot `product` at its effective price.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.effective_price(),
            image: product.primary_image().map(str::to_owned),
            quantity: quantity.max(1),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, or bump the quantity of an existing line for the same product.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Set the quantity of a line. A quantity of zero removes it.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if the product was not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() != before
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: u32, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_taka(price),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 1));
        cart.add(item("b", 50, 2));
        cart.add(item("a", 100, 2));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items().first().unwrap().quantity, 3);
        assert_eq!(cart.subtotal(), Price::from_taka(400));
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(item("a", 100, 1));
        cart.add(item("b", 50, 1));

        assert!(cart.set_quantity(&ProductId::new("a"), 4));
        assert_eq!(cart.subtotal(), Price::from_taka(450));

        assert!(cart.set_quantity(&ProductId::new("b"), 0));
        assert_eq!(cart.len(), 1);

        assert!(!cart.remove(&ProductId::new("missing")));
        assert!(cart.remove(&ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_product_uses_effective_price_and_first_image() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "p", "name": "Saree", "regularPrice": 900, "discountPrice": 750,
                "images": ["https://img/a.jpg", "https://img/b.jpg"]}"#,
        )
        .unwrap();

        let line = CartItem::from_product(&product, 0);
        assert_eq!(line.price, Price::from_taka(750));
        assert_eq!(line.image.as_deref(), Some("https://img/a.jpg"));
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add(item("a", 10, 1));
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 1);

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
