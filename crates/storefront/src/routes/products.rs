//! Product detail and category listing handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use tower_sessions::Session;
use tracing::instrument;

use feriwala_core::{Product, ProductId, catalog, pagination::paginate};

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::views::{
    NavView, PageQuery, PaginationView, ProductCardView, category_href,
};
use crate::state::AppState;

/// Number of related products shown under a product.
pub const RELATED_LIMIT: usize = 4;

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub regular_price: Option<String>,
    pub images: Vec<String>,
    pub categories: Vec<CategoryTagView>,
}

/// Category chip on the product page.
#[derive(Clone)]
pub struct CategoryTagView {
    pub name: String,
    pub href: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.effective_price().to_string(),
            regular_price: product
                .is_discounted()
                .then(|| product.regular_price.to_string()),
            images: product.images.clone(),
            categories: product
                .category
                .iter()
                .map(|name| CategoryTagView {
                    name: name.clone(),
                    href: category_href(name),
                })
                .collect(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductDetailView,
    pub related: Vec<ProductCardView>,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/category.html")]
pub struct CategoryTemplate {
    pub nav: NavView,
    pub category: String,
    pub total: usize,
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationView,
}

/// Display a single product with related products.
///
/// An unknown id renders the 404 page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = ProductId::new(id);
    let backend = state.backend();
    let (product, products) = tokio::try_join!(backend.product(&id), backend.products())?;

    let related = catalog::related(&products, &product, RELATED_LIMIT)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Ok(ProductShowTemplate {
        nav: NavView::load(&state, &session).await?,
        product: ProductDetailView::from(&product),
        related,
    })
}

/// Display the products in one category, paginated.
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<CategoryTemplate> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::NotFound("empty category".to_string()));
    }

    let products = state.backend().products().await?;
    let matching: Vec<Product> = catalog::filter_by_category(&products, &name)
        .cloned()
        .collect();
    let page = paginate(&matching, query.requested());

    Ok(CategoryTemplate {
        nav: NavView::load(&state, &session).await?,
        total: matching.len(),
        products: page.items.iter().map(ProductCardView::from).collect(),
        pagination: PaginationView::new(&page, &category_href(&name)),
        category: name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_view_lists_category_links() {
        let product: Product = serde_json::from_str(
            r#"{"_id":"p1","name":"Nakshi Kantha","category":["Home","Handicraft"],"regularPrice":3000,"images":["1.jpg","2.jpg"]}"#,
        )
        .unwrap();
        let view = ProductDetailView::from(&product);

        assert_eq!(view.images.len(), 2);
        assert_eq!(view.categories.len(), 2);
        assert_eq!(view.categories[1].href, "/products-category/Handicraft");
        assert!(view.regular_price.is_none());
    }
}
