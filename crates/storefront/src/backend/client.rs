//! Backend API client implementation.
//!
//! Thin wrapper over `reqwest` 0.13. Every method maps one backend endpoint;
//! non-2xx answers become [`BackendError::Status`] carrying the backend's
//! `message`/`error` text.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode, multipart::Form};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use feriwala_core::{
    Category, CategoryId, DeliveryCharge, Product, ProductId, SliderId, SliderImage,
};

use super::{
    AdminProfile, BackendError, LoginRequest, LoginResponse, OrderReceipt, OrderRequest,
    extract_error_message,
};

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend REST API.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, BackendError> {
        let body = self.send(request, path).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Send a request and return the raw body of a 2xx answer.
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        debug!(status = %status, path, "Backend request succeeded");
        Ok(body)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.inner.client.get(self.url(path))
    }

    fn authed(&self, request: RequestBuilder, token: &SecretString) -> RequestBuilder {
        request.bearer_auth(token.expose_secret())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the home page slider images.
    #[instrument(skip(self))]
    pub async fn sliders(&self) -> Result<Vec<SliderImage>, BackendError> {
        self.send_json(self.get("/sliders"), "/sliders").await
    }

    /// Fetch all categories.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        self.send_json(self.get("/categories"), "/categories").await
    }

    /// Fetch the full product list.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, BackendError> {
        self.send_json(self.get("/products"), "/products").await
    }

    /// Fetch a single product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, BackendError> {
        let path = format!("/product/{}", urlencoding::encode(id.as_str()));
        self.send_json(self.get(&path), &path).await
    }

    /// Fetch current delivery charges.
    #[instrument(skip(self))]
    pub async fn delivery_charge(&self) -> Result<DeliveryCharge, BackendError> {
        self.send_json(self.get("/deliverycharge"), "/deliverycharge")
            .await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, BackendError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let request = self.inner.client.post(self.url("/login")).json(&body);
        let response: LoginResponse = self.send_json(request, "/login").await?;
        Ok(SecretString::from(response.token))
    }

    /// Validate a token against `GET /me`.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &SecretString) -> Result<AdminProfile, BackendError> {
        let request = self.authed(self.get("/me"), token);
        self.send_json(request, "/me").await
    }

    // =========================================================================
    // Admin mutations
    // =========================================================================

    async fn delete(&self, token: &SecretString, path: &str) -> Result<(), BackendError> {
        let request = self.authed(self.inner.client.delete(self.url(path)), token);
        self.send(request, path).await.map(|_| ())
    }

    async fn post_multipart(
        &self,
        token: &SecretString,
        path: &str,
        form: Form,
    ) -> Result<(), BackendError> {
        let request = self.authed(self.inner.client.post(self.url(path)), token).multipart(form);
        self.send(request, path).await.map(|_| ())
    }

    /// Delete a product.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        token: &SecretString,
        id: &ProductId,
    ) -> Result<(), BackendError> {
        let path = format!("/product/{}", urlencoding::encode(id.as_str()));
        self.delete(token, &path).await
    }

    /// Delete a category.
    #[instrument(skip(self, token), fields(category_id = %id))]
    pub async fn delete_category(
        &self,
        token: &SecretString,
        id: &CategoryId,
    ) -> Result<(), BackendError> {
        let path = format!("/category/{}", urlencoding::encode(id.as_str()));
        self.delete(token, &path).await
    }

    /// Delete a slider image.
    #[instrument(skip(self, token), fields(slider_id = %id))]
    pub async fn delete_slider(
        &self,
        token: &SecretString,
        id: &SliderId,
    ) -> Result<(), BackendError> {
        let path = format!("/slider/{}", urlencoding::encode(id.as_str()));
        self.delete(token, &path).await
    }

    /// Create a product from a multipart form (fields plus image files).
    #[instrument(skip_all)]
    pub async fn create_product(&self, token: &SecretString, form: Form) -> Result<(), BackendError> {
        self.post_multipart(token, "/products", form).await
    }

    /// Create a category from a multipart form (`name`, optional `image`).
    #[instrument(skip_all)]
    pub async fn create_category(
        &self,
        token: &SecretString,
        form: Form,
    ) -> Result<(), BackendError> {
        self.post_multipart(token, "/categories", form).await
    }

    /// Upload a slider image from a multipart form (`image`).
    #[instrument(skip_all)]
    pub async fn create_slider(&self, token: &SecretString, form: Form) -> Result<(), BackendError> {
        self.post_multipart(token, "/sliders", form).await
    }

    /// Replace both delivery charges.
    #[instrument(skip(self, token))]
    pub async fn update_delivery_charge(
        &self,
        token: &SecretString,
        charge: &DeliveryCharge,
    ) -> Result<(), BackendError> {
        let request = self
            .authed(self.inner.client.patch(self.url("/updatedeliverycharge")), token)
            .json(charge);
        self.send(request, "/updatedeliverycharge").await.map(|_| ())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit a checkout order.
    #[instrument(skip_all, fields(items = order.items.len()))]
    pub async fn place_order(&self, order: &OrderRequest<'_>) -> Result<OrderReceipt, BackendError> {
        let request = self.inner.client.post(self.url("/orders")).json(order);
        let body = self.send(request, "/orders").await?;
        if body.trim().is_empty() {
            return Ok(OrderReceipt::default());
        }
        // An unreadable receipt is not a failed order
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let url = Url::parse("http://localhost:5000/api/").unwrap();
        let client = BackendClient::new(&url);
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/products"), "http://localhost:5000/api/products");

        let url = Url::parse("https://api.example.com").unwrap();
        let client = BackendClient::new(&url);
        assert_eq!(client.url("/me"), "https://api.example.com/me");
    }
}
