//! Product search handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::catalog;

use crate::error::Result;
use crate::filters;
use crate::routes::views::{NavView, ProductCardView};
use crate::state::AppState;

/// Search page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Search results page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub nav: NavView,
    pub query: String,
    pub products: Vec<ProductCardView>,
}

/// Display search results.
///
/// Matching is a case-insensitive substring test on the product name. A
/// blank query has nothing to search for and goes back to the home page.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchQuery>,
) -> Result<Response> {
    let query = params.query.trim();
    if query.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let products = state.backend().products().await?;
    let results = catalog::search(&products, query)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Ok(SearchTemplate {
        nav: NavView::load(&state, &session)
            .await?
            .with_search_query(query),
        query: query.to_string(),
        products: results,
    }
    .into_response())
}
