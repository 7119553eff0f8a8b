//! Dashboard home-slider management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::SliderId;

use super::{
    DashboardShell, DeleteMessages, attach_files, cancel_deletion, confirm_deletion, file_count,
    read_multipart, request_deletion,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{DeleteTarget, Flash, session};
use crate::state::AppState;

const LIST_PATH: &str = "/dashboard/slider";

const DELETE_MESSAGES: DeleteMessages = DeleteMessages {
    success: "Slider image deleted successfully!",
    failure: "Failed to delete the slider image",
};

/// Slider image tile.
#[derive(Clone)]
pub struct SlideRowView {
    pub id: String,
    pub image_url: String,
    pub pending: bool,
}

/// Slider management template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/sliders.html")]
pub struct SlidersTemplate {
    pub shell: DashboardShell,
    pub slides: Vec<SlideRowView>,
    pub confirming: bool,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    session: &Session,
    admin: &RequireAdmin,
    error: Option<String>,
) -> Result<SlidersTemplate> {
    let sliders = state.backend().sliders().await?;
    let pending = session::pending_deletion(session, DeleteTarget::Slider).await?;

    let slides: Vec<SlideRowView> = sliders
        .into_iter()
        .map(|s| SlideRowView {
            pending: pending.as_ref().is_some_and(|p| p.id == s.id.as_str()),
            id: s.id.into_inner(),
            image_url: s.image_url,
        })
        .collect();

    Ok(SlidersTemplate {
        shell: DashboardShell::load(state, session, admin, LIST_PATH).await?,
        confirming: pending.is_some(),
        slides,
        error,
    })
}

/// Slider images with the upload form.
#[instrument(skip_all)]
pub async fn index(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<SlidersTemplate> {
    render(&state, &session, &admin, None).await
}

/// Upload a slider image (`image`).
#[instrument(skip_all)]
pub async fn create(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let parts = read_multipart(multipart).await?;

    if file_count(&parts, "image") != 1 {
        let error = Some("Please choose an image to upload.".to_string());
        return Ok(render(&state, &session, &admin, error).await?.into_response());
    }

    let form = attach_files(reqwest::multipart::Form::new(), parts, "image")?;

    match state.backend().create_slider(&admin.token, form).await {
        Ok(()) => {
            tracing::info!("Slider image uploaded");
            session::set_flash(&session, Flash::success("Slider image uploaded successfully"))
                .await?;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Slider upload failed");
            let error = Some(e.user_message());
            Ok(render(&state, &session, &admin, error).await?.into_response())
        }
    }
}

/// Ask for confirmation before deleting a slider image.
#[instrument(skip(_admin, session))]
pub async fn request_delete(
    _admin: RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    request_deletion(&session, DeleteTarget::Slider, id, LIST_PATH).await
}

/// Delete the pending slider image.
#[instrument(skip_all)]
pub async fn confirm_delete(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect> {
    let backend = state.backend();
    confirm_deletion(
        &session,
        DeleteTarget::Slider,
        &DELETE_MESSAGES,
        LIST_PATH,
        |id| async move { backend.delete_slider(&admin.token, &SliderId::new(id)).await },
    )
    .await
}

/// Dismiss the confirmation dialog.
#[instrument(skip_all)]
pub async fn cancel_delete(_admin: RequireAdmin, session: Session) -> Result<Redirect> {
    cancel_deletion(&session, DeleteTarget::Slider, LIST_PATH).await
}
