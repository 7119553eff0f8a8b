//! Checkout handlers.
//!
//! Collects the customer's details, prices delivery from the backend's
//! current charges and submits the order. A successful order empties the
//! session cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::{Cart, DeliveryArea, DeliveryCharge};

use crate::backend::OrderRequest;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::routes::cart::CartView;
use crate::routes::views::NavView;
use crate::routes::{CART_UPDATED, HX_TRIGGER};
use crate::state::AppState;

/// Minimum number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 10;

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub area: DeliveryArea,
}

impl CheckoutForm {
    /// Check required fields, returning the first problem found.
    fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Please enter your name.");
        }
        let phone = self.phone.trim();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        let plain = phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '));
        if !plain || digits < MIN_PHONE_DIGITS {
            return Err("Please enter a valid phone number.");
        }
        if self.address.trim().is_empty() {
            return Err("Please enter your delivery address.");
        }
        Ok(())
    }
}

/// Delivery area option for the form.
#[derive(Clone)]
pub struct AreaOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub charge: String,
    pub total: String,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
    pub cart: CartView,
    pub areas: Vec<AreaOptionView>,
    pub form: CheckoutForm,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub nav: NavView,
    pub order_id: Option<String>,
    pub customer_name: String,
    pub total: String,
}

/// Current delivery charges, falling back to the defaults.
async fn delivery_charges(state: &AppState) -> DeliveryCharge {
    match state.backend().delivery_charge().await {
        Ok(charge) => charge,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load delivery charges, using defaults");
            DeliveryCharge::default()
        }
    }
}

fn area_options(cart: &Cart, charges: &DeliveryCharge, selected: DeliveryArea) -> Vec<AreaOptionView> {
    [DeliveryArea::InsideDhaka, DeliveryArea::OutsideDhaka]
        .into_iter()
        .map(|area| {
            let charge = charges.charge_for(area);
            AreaOptionView {
                value: area.as_str(),
                label: area.label(),
                charge: charge.to_string(),
                total: (cart.subtotal() + charge).to_string(),
                selected: area == selected,
            }
        })
        .collect()
}

async fn render_form(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    form: CheckoutForm,
    error: Option<String>,
) -> Result<CheckoutTemplate> {
    let charges = delivery_charges(state).await;

    Ok(CheckoutTemplate {
        nav: NavView::load(state, session).await?,
        cart: CartView::from(cart),
        areas: area_options(cart, &charges, form.area),
        form,
        error,
    })
}

/// Display the checkout form. An empty cart goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = session::load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(render_form(&state, &session, &cart, CheckoutForm::default(), None)
        .await?
        .into_response())
}

/// Submit the order.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    if let Err(message) = form.validate() {
        return Ok(
            render_form(&state, &session, &cart, form, Some(message.to_string()))
                .await?
                .into_response(),
        );
    }

    let charges = delivery_charges(&state).await;
    let delivery_charge = charges.charge_for(form.area);
    let subtotal = cart.subtotal();
    let total = subtotal + delivery_charge;

    let order = OrderRequest {
        customer_name: form.name.trim(),
        phone: form.phone.trim(),
        address: form.address.trim(),
        delivery_area: form.area,
        delivery_charge,
        items: cart.items(),
        subtotal,
        total,
    };

    let placed = state.backend().place_order(&order).await;
    let receipt = match placed {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to place order");
            let message = e.user_message();
            return Ok(render_form(&state, &session, &cart, form, Some(message))
                .await?
                .into_response());
        }
    };

    let order_id = receipt.into_order_id();
    tracing::info!(order_id = ?order_id, items = cart.len(), "Order placed");
    add_breadcrumb("checkout", "Order placed", None);

    cart.clear();
    session::save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([(HX_TRIGGER, CART_UPDATED)]),
        CheckoutSuccessTemplate {
            nav: NavView::load(&state, &session).await?,
            order_id,
            customer_name: form.name.trim().to_string(),
            total: total.to_string(),
        },
    )
        .into_response())
}
