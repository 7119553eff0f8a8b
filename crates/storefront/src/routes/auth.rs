//! Admin login and logout handlers.
//!
//! Login exchanges credentials for a backend bearer token which is kept in
//! the session. Logout only forgets the token; the backend is not told.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::Result;
use crate::filters;
use crate::models::{Flash, session};
use crate::routes::views::NavView;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub email: String,
    pub error: Option<String>,
}

/// Display the login page.
#[instrument(skip(state, session))]
pub async fn login_page(State(state): State<AppState>, session: Session) -> Result<LoginTemplate> {
    Ok(LoginTemplate {
        nav: NavView::load(&state, &session).await?,
        email: String::new(),
        error: None,
    })
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim().to_string();
    let password = SecretString::from(form.password);

    if email.is_empty() || password.expose_secret().is_empty() {
        return render_error(&state, &session, email, "Email and password are required.").await;
    }

    match state.backend().login(&email, &password).await {
        Ok(token) => {
            // New session ID on privilege change
            session.cycle_id().await?;
            session::set_token(&session, token.expose_secret()).await?;
            tracing::info!("Admin logged in");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            tracing::info!(error = %e, "Login failed");
            let message = login_failure_message(&e);
            render_error(&state, &session, email, &message).await
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    session::clear_token(&session).await?;
    session::set_flash(&session, Flash::success("Logout successfully")).await?;
    Ok(Redirect::to("/login"))
}

async fn render_error(
    state: &AppState,
    session: &Session,
    email: String,
    message: &str,
) -> Result<Response> {
    Ok(LoginTemplate {
        nav: NavView::load(state, session).await?,
        email,
        error: Some(message.to_string()),
    }
    .into_response())
}

/// Backend message when it sent one, otherwise a credentials hint.
fn login_failure_message(err: &BackendError) -> String {
    match err {
        BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
        BackendError::Status { status: 400 | 401 | 403, .. } | BackendError::NotFound(_) => {
            "Invalid email or password.".to_string()
        }
        other => other.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GENERIC_FAILURE;

    #[test]
    fn test_login_failure_message() {
        let err = BackendError::Status {
            status: 401,
            message: "User not found".to_string(),
        };
        assert_eq!(login_failure_message(&err), "User not found");

        let err = BackendError::Status {
            status: 401,
            message: String::new(),
        };
        assert_eq!(login_failure_message(&err), "Invalid email or password.");

        let err = BackendError::Status {
            status: 502,
            message: String::new(),
        };
        assert_eq!(login_failure_message(&err), GENERIC_FAILURE);
    }
}
