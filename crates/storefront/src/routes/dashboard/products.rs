//! Dashboard product management: filtered list, delete flow, creation form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::{Price, Product, ProductId, catalog};

use super::{
    DashboardShell, DeleteMessages, FormPart, attach_files, cancel_deletion, confirm_deletion,
    read_multipart, request_deletion, text_value, text_values,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{DeleteTarget, Flash, session};
use crate::state::AppState;

const LIST_PATH: &str = "/dashboard/allProducts";

const DELETE_MESSAGES: DeleteMessages = DeleteMessages {
    success: "Product deleted successfully!",
    failure: "Failed to delete the product",
};

/// Category filter on the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// Form posted by the delete buttons; carries the active filter back.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub category: Option<String>,
}

/// Product list URL, keeping the category filter.
fn list_path(category: Option<&str>) -> String {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => format!("{LIST_PATH}?category={}", urlencoding::encode(category)),
        None => LIST_PATH.to_string(),
    }
}

// =============================================================================
// Views
// =============================================================================

/// Category `<option>`.
#[derive(Clone)]
pub struct CategoryOptionView {
    pub name: String,
    pub selected: bool,
}

/// Row in the product table.
#[derive(Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub price: String,
    pub categories: String,
    pub created: Option<String>,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_owned),
            price: product.effective_price().to_string(),
            categories: product.category.join(", "),
            created: product
                .created_at
                .map(|at| at.format("%d %b %Y").to_string()),
        }
    }
}

/// Confirmation dialog for a pending deletion.
#[derive(Clone)]
pub struct ConfirmDeleteView {
    pub title: String,
    pub confirm_action: String,
    pub cancel_action: String,
    /// Hidden `category` field echoed back on confirm/cancel.
    pub category: String,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products/index.html")]
pub struct ProductListTemplate {
    pub shell: DashboardShell,
    pub categories: Vec<CategoryOptionView>,
    pub active_category: String,
    pub products: Vec<ProductRowView>,
    pub confirm: Option<ConfirmDeleteView>,
}

/// Product creation form values (re-rendered on error).
#[derive(Clone, Default)]
pub struct ProductFormValues {
    pub name: String,
    pub description: String,
    pub regular_price: String,
    pub discount_price: String,
    pub categories: Vec<String>,
}

/// Selectable category on the creation form.
#[derive(Clone)]
pub struct CategoryChoiceView {
    pub name: String,
    pub checked: bool,
}

/// Product creation template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products/new.html")]
pub struct NewProductTemplate {
    pub shell: DashboardShell,
    pub categories: Vec<CategoryChoiceView>,
    pub values: ProductFormValues,
    pub error: Option<String>,
}

// =============================================================================
// List + delete
// =============================================================================

/// Product list filtered by category.
///
/// Without a `category` parameter the first category (in first-seen order
/// across all products) is active.
#[instrument(skip(admin, state, session))]
pub async fn index(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<ProductListTemplate> {
    let products = state.backend().products().await?;
    let categories = catalog::unique_categories(&products);
    let active = catalog::active_category(&categories, query.category.as_deref());

    let rows: Vec<ProductRowView> = match active.as_deref() {
        Some(category) => catalog::filter_by_category(&products, category)
            .map(ProductRowView::from)
            .collect(),
        None => products.iter().map(ProductRowView::from).collect(),
    };

    let active_category = active.unwrap_or_default();
    let confirm = session::pending_deletion(&session, DeleteTarget::Product)
        .await?
        .map(|pending| {
            let name = products
                .iter()
                .find(|p| p.id.as_str() == pending.id)
                .map_or_else(|| "this product".to_string(), |p| format!("\u{201c}{}\u{201d}", p.name));
            ConfirmDeleteView {
                title: format!("Delete {name}?"),
                confirm_action: format!("{LIST_PATH}/delete/confirm"),
                cancel_action: format!("{LIST_PATH}/delete/cancel"),
                category: active_category.clone(),
            }
        });

    Ok(ProductListTemplate {
        shell: DashboardShell::load(&state, &session, &admin, LIST_PATH).await?,
        categories: categories
            .iter()
            .map(|name| CategoryOptionView {
                name: name.clone(),
                selected: *name == active_category,
            })
            .collect(),
        active_category,
        products: rows,
        confirm,
    })
}

/// Ask for confirmation before deleting a product.
#[instrument(skip(_admin, session))]
pub async fn request_delete(
    _admin: RequireAdmin,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    request_deletion(
        &session,
        DeleteTarget::Product,
        id,
        &list_path(form.category.as_deref()),
    )
    .await
}

/// Delete the pending product.
#[instrument(skip(admin, state, session))]
pub async fn confirm_delete(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    let backend = state.backend();
    confirm_deletion(
        &session,
        DeleteTarget::Product,
        &DELETE_MESSAGES,
        &list_path(form.category.as_deref()),
        |id| async move { backend.delete_product(&admin.token, &ProductId::new(id)).await },
    )
    .await
}

/// Dismiss the confirmation dialog.
#[instrument(skip(_admin, session))]
pub async fn cancel_delete(
    _admin: RequireAdmin,
    session: Session,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    cancel_deletion(
        &session,
        DeleteTarget::Product,
        &list_path(form.category.as_deref()),
    )
    .await
}

// =============================================================================
// Create
// =============================================================================

async fn render_form(
    state: &AppState,
    session: &Session,
    admin: &RequireAdmin,
    values: ProductFormValues,
    error: Option<String>,
) -> Result<NewProductTemplate> {
    let categories = match state.backend().categories().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load categories for product form");
            Vec::new()
        }
    };

    Ok(NewProductTemplate {
        shell: DashboardShell::load(state, session, admin, "/dashboard/createProduct").await?,
        categories: categories
            .into_iter()
            .map(|c| CategoryChoiceView {
                checked: values.categories.contains(&c.name),
                name: c.name,
            })
            .collect(),
        values,
        error,
    })
}

/// Display the product creation form.
#[instrument(skip_all)]
pub async fn new_product(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<NewProductTemplate> {
    render_form(&state, &session, &admin, ProductFormValues::default(), None).await
}

/// Check the submitted product fields.
fn validate(values: &ProductFormValues) -> std::result::Result<(), &'static str> {
    if values.name.is_empty() {
        return Err("Please enter a product name.");
    }
    if values.categories.is_empty() {
        return Err("Please select at least one category.");
    }
    if Price::parse(&values.regular_price).is_err() {
        return Err("Please enter a valid regular price.");
    }
    if !values.discount_price.is_empty() && Price::parse(&values.discount_price).is_err() {
        return Err("Please enter a valid discount price.");
    }
    Ok(())
}

fn form_values(parts: &[FormPart]) -> ProductFormValues {
    ProductFormValues {
        name: text_value(parts, "name").to_string(),
        description: text_value(parts, "description").to_string(),
        regular_price: text_value(parts, "regularPrice").to_string(),
        discount_price: text_value(parts, "discountPrice").to_string(),
        categories: text_values(parts, "category")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

/// Create a product, forwarding fields and image files to the backend.
#[instrument(skip_all)]
pub async fn create(
    admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let parts = read_multipart(multipart).await?;
    let values = form_values(&parts);

    if let Err(message) = validate(&values) {
        return Ok(render_form(&state, &session, &admin, values, Some(message.to_string()))
            .await?
            .into_response());
    }

    let mut form = reqwest::multipart::Form::new().text("name", values.name.clone());
    for category in &values.categories {
        form = form.text("category", category.clone());
    }
    form = form
        .text("description", values.description.clone())
        .text("regularPrice", values.regular_price.clone())
        .text("discountPrice", values.discount_price.clone());
    let form = attach_files(form, parts, "images")?;

    match state.backend().create_product(&admin.token, form).await {
        Ok(()) => {
            tracing::info!(name = %values.name, "Product created");
            session::set_flash(&session, Flash::success("Product added successfully")).await?;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Product creation failed");
            let message = match &e {
                crate::backend::BackendError::Status { message, .. } if !message.is_empty() => {
                    format!("Error: {message}")
                }
                _ => "Something went wrong.".to_string(),
            };
            Ok(render_form(&state, &session, &admin, values, Some(message))
                .await?
                .into_response())
        }
    }
}
