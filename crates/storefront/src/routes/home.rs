//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::pagination::paginate;

use crate::error::Result;
use crate::filters;
use crate::routes::views::{
    CategoryLinkView, NavView, PageQuery, PaginationView, ProductCardView,
};
use crate::state::AppState;

/// Slider image display data.
#[derive(Clone)]
pub struct SlideView {
    pub image_url: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub slides: Vec<SlideView>,
    pub categories: Vec<CategoryLinkView>,
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationView,
}

/// Display the home page.
///
/// Sliders, categories and products are fetched concurrently. The page is
/// all-or-nothing: if any of the three fails, the error page is rendered.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<HomeTemplate> {
    let backend = state.backend();
    let (sliders, categories, products) =
        tokio::try_join!(backend.sliders(), backend.categories(), backend.products())?;

    let page = paginate(&products, query.requested());

    Ok(HomeTemplate {
        nav: NavView::with_categories(&state, &session, &categories).await?,
        slides: sliders
            .into_iter()
            .map(|s| SlideView {
                image_url: s.image_url,
            })
            .collect(),
        categories: categories.iter().map(CategoryLinkView::from).collect(),
        products: page.items.iter().map(ProductCardView::from).collect(),
        pagination: PaginationView::new(&page, "/"),
    })
}
