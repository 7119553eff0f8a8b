//! Admin authentication extractor.
//!
//! Every dashboard handler takes [`RequireAdmin`]. The extractor reads the
//! bearer token from the session and validates it with `GET /me` on each
//! request. There is no refresh and no retry: a missing token, a rejected
//! token and an unreachable backend all send the visitor to `/login`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use tower_sessions::Session;

use crate::backend::AdminProfile;
use crate::models::session;
use crate::state::AppState;

/// Extractor that requires a valid admin token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(admin: RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.profile.display_name())
/// }
/// ```
pub struct RequireAdmin {
    /// Token to forward to privileged backend calls.
    pub token: SecretString,
    /// Identity returned by `/me`.
    pub profile: AdminProfile,
}

/// Error returned when a dashboard page is requested without a valid token.
#[derive(Debug)]
pub enum AdminRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session layer is missing from the stack.
    MissingSession,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminRejection::MissingSession)?;

        let token = match session::token(&session).await {
            Ok(Some(token)) => token,
            Ok(None) => return Err(AdminRejection::RedirectToLogin),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read token from session");
                return Err(AdminRejection::RedirectToLogin);
            }
        };

        match state.backend().me(&token).await {
            Ok(profile) => Ok(Self { token, profile }),
            Err(e) => {
                tracing::info!(error = %e, "Admin token rejected");
                Err(AdminRejection::RedirectToLogin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_rejection_redirects_to_login() {
        let response = AdminRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }
}
