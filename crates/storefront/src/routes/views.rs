//! Display types shared by several page templates.
//!
//! - [`NavView`]: the site navbar (categories, cart badge, search, dashboard link)
//! - [`ProductCardView`]: one tile in a product grid
//! - [`PaginationView`]: the page-link strip under a grid

use feriwala_core::{Category, Page, PageLink, Product};
use serde::{Deserialize, Deserializer};
use tower_sessions::Session;

use crate::error::Result;
use crate::models::{Flash, session};
use crate::state::AppState;

// =============================================================================
// Navbar
// =============================================================================

/// Category link in the navbar.
#[derive(Clone)]
pub struct CategoryLinkView {
    pub name: String,
    pub href: String,
    pub image: Option<String>,
}

impl From<&Category> for CategoryLinkView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            href: category_href(&category.name),
            image: category.image.clone(),
        }
    }
}

/// Navbar and flash banner shown on every public page.
#[derive(Clone)]
pub struct NavView {
    pub store_name: String,
    pub categories: Vec<CategoryLinkView>,
    pub cart_count: usize,
    pub is_admin: bool,
    pub whatsapp_url: Option<String>,
    pub search_query: String,
    pub flash: Option<Flash>,
}

impl NavView {
    /// Build the navbar, fetching categories from the backend.
    ///
    /// A failed category fetch is logged and renders an empty category menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(state: &AppState, session: &Session) -> Result<Self> {
        let categories = match state.backend().categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load navbar categories");
                Vec::new()
            }
        };
        Self::with_categories(state, session, &categories).await
    }

    /// Build the navbar from categories the caller already fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn with_categories(
        state: &AppState,
        session: &Session,
        categories: &[Category],
    ) -> Result<Self> {
        let cart = session::load_cart(session).await?;
        let is_admin = session::token(session).await?.is_some();
        let flash = session::take_flash(session).await?;
        let config = state.config();

        Ok(Self {
            store_name: config.store_name.clone(),
            categories: categories.iter().map(CategoryLinkView::from).collect(),
            cart_count: cart.len(),
            is_admin,
            whatsapp_url: config.contact_whatsapp.as_deref().map(whatsapp_url),
            search_query: String::new(),
            flash,
        })
    }

    /// Pre-fill the navbar search box.
    #[must_use]
    pub fn with_search_query(mut self, query: &str) -> Self {
        self.search_query = query.to_string();
        self
    }
}

/// `wa.me` link for a phone number, keeping digits only.
fn whatsapp_url(number: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{digits}")
}

// =============================================================================
// Product cards
// =============================================================================

/// Path of the category page for `name`.
#[must_use]
pub fn category_href(name: &str) -> String {
    format!("/products-category/{}", urlencoding::encode(name))
}

/// Path of the product detail page.
#[must_use]
pub fn product_href(product: &Product) -> String {
    format!("/product/{}", urlencoding::encode(product.id.as_str()))
}

/// One tile in a product grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub href: String,
    pub image: Option<String>,
    /// Price the customer pays.
    pub price: String,
    /// Struck-through regular price, only when discounted.
    pub regular_price: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            href: product_href(product),
            image: product.primary_image().map(str::to_owned),
            price: product.effective_price().to_string(),
            regular_price: product
                .is_discounted()
                .then(|| product.regular_price.to_string()),
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// `?page=` query parameter. Missing or malformed values mean page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<usize>,
}

impl PageQuery {
    /// Requested page, defaulting to 1. Clamping happens in `paginate`.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

fn lenient_page<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse().ok()))
}

/// Entry in the page-link strip.
#[derive(Clone)]
pub struct PageLinkView {
    pub label: String,
    pub href: Option<String>,
    pub current: bool,
}

/// Pagination controls. Hidden unless the list spans more than one page.
#[derive(Clone)]
pub struct PaginationView {
    pub show: bool,
    pub current_page: usize,
    pub total_pages: usize,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub links: Vec<PageLinkView>,
}

impl PaginationView {
    /// Build controls for `page`, linking to `base_path?page=N`.
    ///
    /// `base_path` may already carry a query string.
    #[must_use]
    pub fn new<T>(page: &Page<'_, T>, base_path: &str) -> Self {
        let separator = if base_path.contains('?') { '&' } else { '?' };
        let href = |n: usize| format!("{base_path}{separator}page={n}");

        Self {
            show: page.show_controls(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            previous_href: page.previous().map(href),
            next_href: page.next().map(href),
            links: page
                .links()
                .into_iter()
                .map(|link| match link {
                    PageLink::Number { page, current } => PageLinkView {
                        label: page.to_string(),
                        href: Some(href(page)),
                        current,
                    },
                    PageLink::Gap => PageLinkView {
                        label: "…".to_string(),
                        href: None,
                        current: false,
                    },
                })
                .collect(),
        }
    }
}
