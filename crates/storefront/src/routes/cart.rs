//! Cart route handlers.
//!
//! The cart lives in the session under `checkout_cart`. Every mutation sends
//! `HX-Trigger: cartUpdated` so the navbar badge re-fetches `/cart/count`;
//! plain form posts are redirected back to the cart page instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::{Cart, CartItem, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{Flash, session};
use crate::routes::views::NavView;
use crate::routes::{CART_UPDATED, HX_TRIGGER, is_htmx};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub href: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub count: usize,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.name.clone(),
            href: format!("/product/{}", urlencoding::encode(item.product_id.as_str())),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_total: item.line_total().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            count: cart.len(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Blank or malformed quantities count as 1.
    #[serde(default)]
    pub quantity: Option<String>,
}

impl AddToCartForm {
    fn quantity(&self) -> u32 {
        self.quantity
            .as_deref()
            .and_then(|q| q.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl UpdateCartForm {
    /// `None` leaves the line alone; negative input clears it.
    fn quantity(&self) -> Option<u32> {
        let raw = self.quantity.as_deref()?.trim();
        match raw.strip_prefix('-') {
            Some(magnitude) => magnitude.parse::<u64>().ok().map(|_| 0),
            None => raw.parse().ok(),
        }
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let cart = session::load_cart(&session).await?;

    Ok(CartShowTemplate {
        nav: NavView::load(&state, &session).await?,
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart.
///
/// The product is fetched so the cart line snapshots its current name,
/// effective price and first image. HTMX callers get the new badge.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .backend()
        .product(&ProductId::new(form.product_id.trim()))
        .await?;

    let mut cart = session::load_cart(&session).await?;
    cart.add(CartItem::from_product(&product, form.quantity()));
    session::save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));

    if is_htmx(&headers) {
        return Ok((
            AppendHeaders([(HX_TRIGGER, CART_UPDATED)]),
            CartCountTemplate { count: cart.len() },
        )
            .into_response());
    }

    session::set_flash(&session, Flash::success(format!("{} added to cart", product.name))).await?;
    Ok(Redirect::to("/cart").into_response())
}

/// Change a line's quantity. Zero removes the line.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    if let Some(quantity) = form.quantity() {
        cart.set_quantity(&ProductId::new(form.product_id.trim()), quantity);
        session::save_cart(&session, &cart).await?;
    }

    Ok(cart_changed(&headers, &cart))
}

/// Remove a line from the cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    cart.remove(&ProductId::new(form.product_id));
    session::save_cart(&session, &cart).await?;

    Ok(cart_changed(&headers, &cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = session::load_cart(&session).await?;
    Ok(CartCountTemplate { count: cart.len() })
}

/// Response after an in-page cart edit.
fn cart_changed(headers: &HeaderMap, cart: &Cart) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([(HX_TRIGGER, CART_UPDATED)]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}
