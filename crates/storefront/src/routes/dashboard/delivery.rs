//! Dashboard delivery charge form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::DeliveryCharge;

use super::DashboardShell;
use crate::backend::BackendError;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Flash, session};
use crate::state::AppState;

const FORM_PATH: &str = "/dashboard/deliveryform";

/// Delivery charge form data. Kept as text so bad input can be re-shown.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryForm {
    #[serde(default)]
    pub inside_dhaka: String,
    #[serde(default)]
    pub outside_dhaka: String,
}

impl DeliveryForm {
    /// Parse both fields as non-negative whole numbers.
    fn parse(&self) -> std::result::Result<DeliveryCharge, &'static str> {
        let parse = |raw: &str| raw.trim().parse::<u32>();
        match (parse(&self.inside_dhaka), parse(&self.outside_dhaka)) {
            (Ok(inside_dhaka), Ok(outside_dhaka)) => Ok(DeliveryCharge {
                inside_dhaka,
                outside_dhaka,
            }),
            _ => Err("Delivery charges must be whole numbers of zero or more."),
        }
    }
}

impl From<DeliveryCharge> for DeliveryForm {
    fn from(charge: DeliveryCharge) -> Self {
        Self {
            inside_dhaka: charge.inside_dhaka.to_string(),
            outside_dhaka: charge.outside_dhaka.to_string(),
        }
    }
}

/// Delivery charge form template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/delivery.html")]
pub struct DeliveryTemplate {
    pub shell: DashboardShell,
    pub inside_dhaka: String,
    pub outside_dhaka: String,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    session: &Session,
    admin: &RequireAdmin,
    form: DeliveryForm,
    error: Option<String>,
) -> Result<DeliveryTemplate> {
    Ok(DeliveryTemplate {
        shell: DashboardShell::load(state, session, admin, FORM_PATH).await?,
        inside_dhaka: form.inside_dhaka,
        outside_dhaka: form.outside_dhaka,
        error,
    })
}

/// Display the form pre-filled with the current charges.
#[instrument(skip_all)]
pub async fn edit(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<DeliveryTemplate> {
    let charge = match state.backend().delivery_charge().await {
        Ok(charge) => charge,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load delivery charges, showing defaults");
            DeliveryCharge::default()
        }
    };

    render(&state, &session, &admin, charge.into(), None).await
}

/// Save new delivery charges.
#[instrument(skip(admin, state, session))]
pub async fn update(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DeliveryForm>,
) -> Result<Response> {
    let charge = match form.parse() {
        Ok(charge) => charge,
        Err(message) => {
            return Ok(render(&state, &session, &admin, form, Some(message.to_string()))
                .await?
                .into_response());
        }
    };

    match state
        .backend()
        .update_delivery_charge(&admin.token, &charge)
        .await
    {
        Ok(()) => {
            tracing::info!(
                inside_dhaka = charge.inside_dhaka,
                outside_dhaka = charge.outside_dhaka,
                "Delivery charges updated"
            );
            session::set_flash(
                &session,
                Flash::success("Delivery charges updated successfully!"),
            )
            .await?;
            Ok(Redirect::to(FORM_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Delivery charge update failed");
            let message = update_failure_message(&e);
            Ok(render(&state, &session, &admin, form, Some(message))
                .await?
                .into_response())
        }
    }
}

fn update_failure_message(err: &BackendError) -> String {
    match err {
        BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
        BackendError::Status { .. } | BackendError::NotFound(_) => {
            "Failed to update delivery charges".to_string()
        }
        _ => "Something went wrong!".to_string(),
    }
}
