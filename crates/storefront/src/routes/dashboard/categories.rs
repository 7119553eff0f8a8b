//! Dashboard category management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::{Category, CategoryId};

use super::{
    DashboardShell, DeleteMessages, attach_files, cancel_deletion, confirm_deletion, file_count,
    read_multipart, request_deletion, text_value,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{DeleteTarget, Flash, session};
use crate::state::AppState;

const LIST_PATH: &str = "/dashboard/categories";

const DELETE_MESSAGES: DeleteMessages = DeleteMessages {
    success: "Category deleted successfully!",
    failure: "Failed to delete the category",
};

/// Row in the category table.
#[derive(Clone)]
pub struct CategoryRowView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&Category> for CategoryRowView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            image: category.image.clone(),
        }
    }
}

/// Category management template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/categories.html")]
pub struct CategoriesTemplate {
    pub shell: DashboardShell,
    pub categories: Vec<CategoryRowView>,
    pub confirm_name: Option<String>,
    pub name: String,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    session: &Session,
    admin: &RequireAdmin,
    name: String,
    error: Option<String>,
) -> Result<CategoriesTemplate> {
    let categories = state.backend().categories().await?;
    let confirm_name = session::pending_deletion(session, DeleteTarget::Category)
        .await?
        .map(|pending| {
            categories
                .iter()
                .find(|c| c.id.as_str() == pending.id)
                .map_or_else(|| "this category".to_string(), |c| c.name.clone())
        });

    Ok(CategoriesTemplate {
        shell: DashboardShell::load(state, session, admin, LIST_PATH).await?,
        categories: categories.iter().map(CategoryRowView::from).collect(),
        confirm_name,
        name,
        error,
    })
}

/// Category list with the creation form.
#[instrument(skip_all)]
pub async fn index(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<CategoriesTemplate> {
    render(&state, &session, &admin, String::new(), None).await
}

/// Create a category (`name`, optional `image`).
#[instrument(skip_all)]
pub async fn create(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let parts = read_multipart(multipart).await?;
    let name = text_value(&parts, "name").to_string();

    if name.is_empty() {
        let error = Some("Please enter a category name.".to_string());
        return Ok(render(&state, &session, &admin, name, error).await?.into_response());
    }
    if file_count(&parts, "image") > 1 {
        let error = Some("Please choose a single image.".to_string());
        return Ok(render(&state, &session, &admin, name, error).await?.into_response());
    }

    let form = reqwest::multipart::Form::new().text("name", name.clone());
    let form = attach_files(form, parts, "image")?;

    match state.backend().create_category(&admin.token, form).await {
        Ok(()) => {
            tracing::info!(%name, "Category created");
            session::set_flash(&session, Flash::success("Category added successfully")).await?;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Category creation failed");
            let error = Some(e.user_message());
            Ok(render(&state, &session, &admin, name, error).await?.into_response())
        }
    }
}

/// Ask for confirmation before deleting a category.
#[instrument(skip(_admin, session))]
pub async fn request_delete(
    _admin: RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    request_deletion(&session, DeleteTarget::Category, id, LIST_PATH).await
}

/// Delete the pending category.
#[instrument(skip_all)]
pub async fn confirm_delete(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect> {
    let backend = state.backend();
    confirm_deletion(
        &session,
        DeleteTarget::Category,
        &DELETE_MESSAGES,
        LIST_PATH,
        |id| async move { backend.delete_category(&admin.token, &CategoryId::new(id)).await },
    )
    .await
}

/// Dismiss the confirmation dialog.
#[instrument(skip_all)]
pub async fn cancel_delete(_admin: RequireAdmin, session: Session) -> Result<Redirect> {
    cancel_deletion(&session, DeleteTarget::Category, LIST_PATH).await
}
