//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (backend reachable)
//!
//! GET  /                            - Home page (sliders, categories, products)
//! GET  /products-category/{name}    - Products in one category
//! GET  /product/{id}                - Product detail + related products
//! GET  /search?query=               - Search by product name
//!
//! # Cart (HTMX fragments, session-backed)
//! GET  /cart                        - Cart page
//! POST /cart/add                    - Add to cart (badge fragment, triggers cartUpdated)
//! POST /cart/update                 - Update quantity (0 removes)
//! POST /cart/remove                 - Remove line
//! GET  /cart/count                  - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                    - Order form
//! POST /checkout                    - Place order
//!
//! # Auth
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! POST /logout                      - Logout action
//!
//! # Dashboard (requires admin token)
//! GET  /dashboard                   - Overview
//! GET  /dashboard/allProducts       - Product list (?category=)
//! POST /dashboard/allProducts/{id}/delete, /delete/confirm, /delete/cancel
//! GET  /dashboard/createProduct     - Product form
//! POST /dashboard/createProduct     - Create product (multipart)
//! GET  /dashboard/categories        - Category list + form
//! POST /dashboard/categories        - Create category (multipart)
//! POST /dashboard/categories/{id}/delete, /delete/confirm, /delete/cancel
//! GET  /dashboard/slider            - Slider images + upload
//! POST /dashboard/slider            - Upload slider image (multipart)
//! POST /dashboard/slider/{id}/delete, /delete/confirm, /delete/cancel
//! GET  /dashboard/deliveryform      - Delivery charge form
//! POST /dashboard/deliveryform      - Update delivery charges
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod products;
pub mod search;
pub mod views;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Response header that raises a client-side event in htmx.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Event raised whenever the cart changes; the navbar badge listens for it.
pub const CART_UPDATED: &str = "cartUpdated";

/// Whether the request was issued by htmx.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Catalog
        .route("/", get(home::home))
        .route("/products-category/{name}", get(products::category))
        .route("/product/{id}", get(products::show))
        .route("/search", get(search::search))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Admin dashboard
        .nest("/dashboard", dashboard::routes())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }
}
