//! Admin dashboard.
//!
//! Every handler here extracts [`RequireAdmin`], so a visitor without a
//! valid token is redirected to `/login` before anything renders.
//!
//! Deletes are two-step: `POST …/{id}/delete` stores a [`PendingDeletion`]
//! and re-renders the list with a confirmation dialog, then
//! `POST …/delete/confirm` or `POST …/delete/cancel` resolves it.

pub mod categories;
pub mod delivery;
pub mod products;
pub mod sliders;

use std::future::Future;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{DeleteTarget, Flash, PendingDeletion, session};
use crate::state::AppState;

/// Upload limit for dashboard forms (product images arrive several at once).
const UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// Shell (sidebar + header)
// =============================================================================

/// Sidebar entry.
#[derive(Clone)]
pub struct SidebarLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Sidebar destinations in display order.
const SIDEBAR: [(&str, &str); 5] = [
    ("/dashboard", "Dashboard"),
    ("/dashboard/allProducts", "Products"),
    ("/dashboard/categories", "Categories"),
    ("/dashboard/slider", "Home Slider"),
    ("/dashboard/deliveryform", "Delivery Charges"),
];

/// Layout data shared by every dashboard page.
#[derive(Clone)]
pub struct DashboardShell {
    pub store_name: String,
    pub admin_name: String,
    pub current_path: String,
    pub sidebar: Vec<SidebarLink>,
    pub flash: Option<Flash>,
}

impl DashboardShell {
    /// Build the shell for `current_path`, consuming any pending flash.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(
        state: &AppState,
        session: &Session,
        admin: &RequireAdmin,
        current_path: &str,
    ) -> Result<Self> {
        Ok(Self {
            store_name: state.config().store_name.clone(),
            admin_name: admin.profile.display_name().to_string(),
            current_path: current_path.to_string(),
            sidebar: sidebar(current_path),
            flash: session::take_flash(session).await?,
        })
    }
}

/// Sidebar links with the entry for `current_path` highlighted.
#[must_use]
pub fn sidebar(current_path: &str) -> Vec<SidebarLink> {
    SIDEBAR
        .iter()
        .map(|&(href, label)| SidebarLink {
            href,
            label,
            active: href == current_path,
        })
        .collect()
}

// =============================================================================
// Overview
// =============================================================================

/// Dashboard overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub shell: DashboardShell,
    pub product_count: usize,
    pub category_count: usize,
    pub slider_count: usize,
}

/// Dashboard overview with catalog counts.
#[instrument(skip_all)]
pub async fn index(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let backend = state.backend();
    let (products, categories, sliders) =
        tokio::try_join!(backend.products(), backend.categories(), backend.sliders())?;

    Ok(DashboardTemplate {
        shell: DashboardShell::load(&state, &session, &admin, "/dashboard").await?,
        product_count: products.len(),
        category_count: categories.len(),
        slider_count: sliders.len(),
    })
}

// =============================================================================
// Delete confirmation flow
// =============================================================================

/// Messages for one delete target.
pub(crate) struct DeleteMessages {
    pub success: &'static str,
    pub failure: &'static str,
}

/// Step 1: remember which record the admin wants to delete.
pub(crate) async fn request_deletion(
    session: &Session,
    target: DeleteTarget,
    id: String,
    list_path: &str,
) -> Result<Redirect> {
    session::set_pending_deletion(session, &PendingDeletion { target, id }).await?;
    Ok(Redirect::to(list_path))
}

/// Step 2a: delete the pending record through `delete`.
///
/// The pending state is cleared whatever the outcome. On failure the
/// backend's message (or `messages.failure`) is flashed.
pub(crate) async fn confirm_deletion<F, Fut>(
    session: &Session,
    target: DeleteTarget,
    messages: &DeleteMessages,
    list_path: &str,
    delete: F,
) -> Result<Redirect>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = std::result::Result<(), BackendError>>,
{
    let Some(pending) = session::take_pending_deletion(session, target).await? else {
        return Ok(Redirect::to(list_path));
    };

    let flash = match delete(pending.id.clone()).await {
        Ok(()) => {
            tracing::info!(kind = target.noun(), id = %pending.id, "Deleted");
            Flash::success(messages.success)
        }
        Err(e) => {
            tracing::warn!(kind = target.noun(), id = %pending.id, error = %e, "Delete failed");
            Flash::error(delete_failure_message(&e, messages.failure))
        }
    };
    session::set_flash(session, flash).await?;

    Ok(Redirect::to(list_path))
}

/// Step 2b: forget the pending record without calling the backend.
pub(crate) async fn cancel_deletion(
    session: &Session,
    target: DeleteTarget,
    list_path: &str,
) -> Result<Redirect> {
    session::take_pending_deletion(session, target).await?;
    Ok(Redirect::to(list_path))
}

fn delete_failure_message(err: &BackendError, fallback: &str) -> String {
    match err {
        BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

// =============================================================================
// Multipart forwarding
// =============================================================================

/// A field read from an incoming dashboard form.
pub(crate) enum FormPart {
    Text { name: String, value: String },
    File {
        name: String,
        file_name: String,
        content_type: Option<String>,
        data: Bytes,
    },
}

/// Read every field of a multipart upload into memory.
///
/// File inputs left empty by the browser (no file name, no bytes) are dropped.
pub(crate) async fn read_multipart(mut multipart: Multipart) -> Result<Vec<FormPart>> {
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);

        match file_name {
            Some(file_name) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                parts.push(FormPart::File {
                    name,
                    file_name,
                    content_type,
                    data,
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                parts.push(FormPart::Text { name, value });
            }
        }
    }

    Ok(parts)
}

/// Text values submitted under `name`, in order.
pub(crate) fn text_values<'a>(parts: &'a [FormPart], name: &'a str) -> impl Iterator<Item = &'a str> {
    parts.iter().filter_map(move |part| match part {
        FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
        _ => None,
    })
}

/// First text value submitted under `name`, trimmed (empty if absent).
pub(crate) fn text_value<'a>(parts: &'a [FormPart], name: &'a str) -> &'a str {
    text_values(parts, name).next().map_or("", str::trim)
}

/// Number of files submitted under `name`.
pub(crate) fn file_count(parts: &[FormPart], name: &str) -> usize {
    parts
        .iter()
        .filter(|part| matches!(part, FormPart::File { name: n, .. } if n == name))
        .count()
}

/// Append the files submitted under `name` to an outgoing form.
pub(crate) fn attach_files(
    mut form: reqwest::multipart::Form,
    parts: Vec<FormPart>,
    name: &str,
) -> Result<reqwest::multipart::Form> {
    for part in parts {
        let FormPart::File {
            name: field,
            file_name,
            content_type,
            data,
        } = part
        else {
            continue;
        };
        if field != name {
            continue;
        }

        let mut file = reqwest::multipart::Part::bytes(data.to_vec()).file_name(file_name);
        if let Some(content_type) = content_type {
            file = file
                .mime_str(&content_type)
                .map_err(|e| AppError::BadRequest(format!("Invalid file type: {e}")))?;
        }
        form = form.part(field, file);
    }
    Ok(form)
}

// =============================================================================
// Router
// =============================================================================

/// Create the dashboard routes router (mounted at `/dashboard`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        // Products
        .route("/allProducts", get(products::index))
        .route("/allProducts/{id}/delete", post(products::request_delete))
        .route("/allProducts/delete/confirm", post(products::confirm_delete))
        .route("/allProducts/delete/cancel", post(products::cancel_delete))
        .route(
            "/createProduct",
            get(products::new_product).post(products::create),
        )
        // Categories
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route("/categories/{id}/delete", post(categories::request_delete))
        .route("/categories/delete/confirm", post(categories::confirm_delete))
        .route("/categories/delete/cancel", post(categories::cancel_delete))
        // Slider
        .route("/slider", get(sliders::index).post(sliders::create))
        .route("/slider/{id}/delete", post(sliders::request_delete))
        .route("/slider/delete/confirm", post(sliders::confirm_delete))
        .route("/slider/delete/cancel", post(sliders::cancel_delete))
        // Delivery charges
        .route(
            "/deliveryform",
            get(delivery::edit).post(delivery::update),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_highlights_current_path() {
        let links = sidebar("/dashboard/categories");
        let active: Vec<_> = links.iter().filter(|l| l.active).map(|l| l.label).collect();
        assert_eq!(active, vec!["Categories"]);

        let labels: Vec<_> = links.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec!["Dashboard", "Products", "Categories", "Home Slider", "Delivery Charges"]
        );

        assert!(sidebar("/elsewhere").iter().all(|l| !l.active));
    }

    #[test]
    fn test_text_values() {
        let parts = vec![
            FormPart::Text {
                name: "category".to_string(),
                value: "Men".to_string(),
            },
            FormPart::Text {
                name: "name".to_string(),
                value: "  Panjabi ".to_string(),
            },
            FormPart::Text {
                name: "category".to_string(),
                value: "Eid".to_string(),
            },
            FormPart::File {
                name: "images".to_string(),
                file_name: "a.jpg".to_string(),
                content_type: Some("image/jpeg".to_string()),
                data: Bytes::from_static(b"\xff\xd8"),
            },
        ];

        assert_eq!(text_values(&parts, "category").collect::<Vec<_>>(), vec!["Men", "Eid"]);
        assert_eq!(text_value(&parts, "name"), "Panjabi");
        assert_eq!(text_value(&parts, "missing"), "");
        assert_eq!(file_count(&parts, "images"), 1);
        assert_eq!(file_count(&parts, "image"), 0);
    }

    #[test]
    fn test_delete_failure_message() {
        let err = BackendError::Status {
            status: 409,
            message: "Category has products".to_string(),
        };
        assert_eq!(delete_failure_message(&err, "fallback"), "Category has products");

        let err = BackendError::NotFound("/product/x".to_string());
        assert_eq!(delete_failure_message(&err, "Failed to delete the product"), "Failed to delete the product");
    }
}
