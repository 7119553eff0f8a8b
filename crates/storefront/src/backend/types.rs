//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

use feriwala_core::{CartItem, DeliveryArea, Price};

/// Identity returned by `GET /me`.
///
/// Only used as a liveness check for the token; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AdminProfile {
    /// Best label for the dashboard header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Admin")
    }
}

/// Body for `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body for `POST /orders`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest<'a> {
    pub customer_name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub delivery_area: DeliveryArea,
    pub delivery_charge: Price,
    pub items: &'a [CartItem],
    pub subtotal: Price,
    pub total: Price,
}

/// Response of `POST /orders`. The backend may return nothing useful.
///
/// The id may arrive as `orderId`, `_id` or `id`, sometimes several at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderReceipt {
    #[serde(default, rename = "orderId")]
    order_id: Option<String>,
    #[serde(default, rename = "_id")]
    document_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl OrderReceipt {
    /// The order id, preferring `orderId` over the document ids.
    #[must_use]
    pub fn into_order_id(self) -> Option<String> {
        self.order_id.or(self.document_id).or(self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_profile_is_lenient() {
        let profile: AdminProfile = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert_eq!(profile.display_name(), "Admin");

        let profile: AdminProfile =
            serde_json::from_str(r#"{"email":"owner@example.com"}"#).unwrap();
        assert_eq!(profile.display_name(), "owner@example.com");
    }

    #[test]
    fn test_order_receipt_aliases() {
        let receipt: OrderReceipt = serde_json::from_str(r#"{"_id":"ord-1"}"#).unwrap();
        assert_eq!(receipt.into_order_id().as_deref(), Some("ord-1"));

        let receipt: OrderReceipt = serde_json::from_str(r#"{"id":7}"#).unwrap_or_default();
        assert!(receipt.into_order_id().is_none());

        let receipt: OrderReceipt = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(receipt.into_order_id().is_none());
    }

    #[test]
    fn test_order_receipt_with_several_ids() {
        let receipt: OrderReceipt = serde_json::from_str(
            r#"{"_id":"65f0c0ffee","orderId":"ORD-42","id":"65f0c0ffee"}"#,
        )
        .unwrap();
        assert_eq!(receipt.into_order_id().as_deref(), Some("ORD-42"));

        let receipt: OrderReceipt =
            serde_json::from_str(r#"{"_id":"65f0c0ffee","id":"other"}"#).unwrap();
        assert_eq!(receipt.into_order_id().as_deref(), Some("65f0c0ffee"));
    }

    #[test]
    fn test_order_request_wire_names() {
        let items = Vec::new();
        let order = OrderRequest {
            customer_name: "Rahim",
            phone: "01700000000",
            address: "Mirpur 10",
            delivery_area: DeliveryArea::OutsideDhaka,
            delivery_charge: Price::from_taka(150),
            items: &items,
            subtotal: Price::ZERO,
            total: Price::from_taka(150),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerName"], "Rahim");
        assert_eq!(json["deliveryArea"], "outsideDhaka");
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
