//! Integration test harness for the Feriwala storefront.
//!
//! Every test spawns two in-process servers on ephemeral ports: a stub of
//! the backend REST API holding an in-memory catalog, and the storefront
//! router pointed at it. Requests go over real HTTP through a cookie-aware
//! client that does not follow redirects, so tests can assert on `303`s.
//!
//! ```rust,ignore
//! let app = TestApp::spawn(BackendData::sample()).await;
//! app.login().await;
//! let page = app.get_text("/dashboard/allProducts").await;
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use feriwala_storefront::config::StorefrontConfig;
use feriwala_storefront::state::AppState;

/// Admin credentials the stub backend accepts.
pub const ADMIN_EMAIL: &str = "admin@feriwala.test";
pub const ADMIN_PASSWORD: &str = "correct-horse";
const ADMIN_TOKEN: &str = "stub-admin-token";

// =============================================================================
// Stub backend
// =============================================================================

/// In-memory state of the stub backend.
#[derive(Debug, Default)]
pub struct BackendData {
    pub products: Vec<Value>,
    pub categories: Vec<Value>,
    pub sliders: Vec<Value>,
    pub delivery: Value,
    /// Order bodies received on `POST /orders`.
    pub orders: Vec<Value>,
    /// Paths of successful deletes, e.g. `/product/p1`.
    pub deleted: Vec<String>,
    /// Text fields of multipart creates, keyed by path.
    pub created: Vec<(String, Vec<(String, String)>)>,
    /// Number of files received by multipart creates.
    pub uploaded_files: usize,
    /// Make every delete fail with a 500.
    pub fail_deletes: bool,
    /// Make `GET /sliders` fail with a 500.
    pub fail_sliders: bool,
    /// Whether `GET /me` accepts the issued token.
    pub token_revoked: bool,
}

impl BackendData {
    /// A small catalog across three categories.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            products: vec![
                product("p1", "Cotton Panjabi", &["Men"], 1200, Some(950)),
                product("p2", "Jamdani Saree", &["Women"], 4500, None),
                product("p3", "Summer Fotua", &["Men", "Summer"], 800, Some(650)),
                product("p4", "Printed Frock", &["Kids"], 600, None),
                product("p5", "Linen Kurti", &["Women", "Summer"], 1500, None),
            ],
            categories: vec![
                category("c1", "Men"),
                category("c2", "Women"),
                category("c3", "Kids"),
                category("c4", "Summer"),
            ],
            sliders: vec![slider("s1", "https://cdn.feriwala.test/slide-1.jpg")],
            delivery: json!({ "insideDhaka": 60, "outsideDhaka": 120 }),
            ..Self::default()
        }
    }

    /// `count` products named `Item 01`, `Item 02`, ... in one category.
    #[must_use]
    pub fn numbered(count: usize) -> Self {
        Self {
            products: (1..=count)
                .map(|n| product(&format!("n{n}"), &format!("Item {n:02}"), &["Bulk"], 100, None))
                .collect(),
            categories: vec![category("c1", "Bulk")],
            delivery: json!({ "insideDhaka": 60, "outsideDhaka": 120 }),
            ..Self::default()
        }
    }
}

/// A product document as the backend returns it.
#[must_use]
pub fn product(
    id: &str,
    name: &str,
    categories: &[&str],
    regular: u32,
    discount: Option<u32>,
) -> Value {
    json!({
        "_id": id,
        "name": name,
        "category": categories,
        "description": format!("{name} from the Feriwala collection"),
        "regularPrice": regular,
        "discountPrice": discount,
        "images": [format!("https://cdn.feriwala.test/{id}.jpg")],
        "createdAt": "2025-03-01T10:00:00Z",
    })
}

/// A category document.
#[must_use]
pub fn category(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "image": null })
}

/// A slider document.
#[must_use]
pub fn slider(id: &str, image_url: &str) -> Value {
    json!({ "_id": id, "imageUrl": image_url })
}

type Shared = Arc<Mutex<BackendData>>;

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn authorized(data: &Shared, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {ADMIN_TOKEN}");
    let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    presented == Some(expected.as_str()) && !data.lock().await.token_revoked
}

async fn list_sliders(State(data): State<Shared>) -> Response {
    let data = data.lock().await;
    if data.fail_sliders {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Slider store unavailable");
    }
    Json(data.sliders.clone()).into_response()
}

async fn list_categories(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(data.lock().await.categories.clone())
}

async fn list_products(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(data.lock().await.products.clone())
}

async fn show_product(State(data): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let data = data.lock().await;
    data.products
        .iter()
        .find(|p| p["_id"] == id.as_str())
        .map_or_else(
            || failure(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn delivery_charge(State(data): State<Shared>) -> Json<Value> {
    Json(data.lock().await.delivery.clone())
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == ADMIN_EMAIL && body["password"] == ADMIN_PASSWORD {
        Json(json!({ "token": ADMIN_TOKEN })).into_response()
    } else {
        failure(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn me(State(data): State<Shared>, headers: HeaderMap) -> Response {
    if authorized(&data, &headers).await {
        Json(json!({ "name": "Feriwala Admin", "email": ADMIN_EMAIL })).into_response()
    } else {
        failure(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

async fn remove(data: &Shared, headers: &HeaderMap, kind: &str, id: &str) -> Response {
    if !authorized(data, headers).await {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let mut data = data.lock().await;
    if data.fail_deletes {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    let list = match kind {
        "product" => &mut data.products,
        "category" => &mut data.categories,
        _ => &mut data.sliders,
    };
    let before = list.len();
    list.retain(|item| item["_id"] != id);
    if list.len() == before {
        return failure(StatusCode::NOT_FOUND, "Not found");
    }
    data.deleted.push(format!("/{kind}/{id}"));
    StatusCode::OK.into_response()
}

async fn delete_product(
    State(data): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    remove(&data, &headers, "product", &id).await
}

async fn delete_category(
    State(data): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    remove(&data, &headers, "category", &id).await
}

async fn delete_slider(
    State(data): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    remove(&data, &headers, "slider", &id).await
}

async fn record_upload(
    data: &Shared,
    headers: &HeaderMap,
    path: &str,
    mut multipart: Multipart,
) -> Response {
    if !authorized(data, headers).await {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let mut fields = Vec::new();
    let mut files = 0;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            files += 1;
            let _ = field.bytes().await;
        } else {
            fields.push((name, field.text().await.unwrap_or_default()));
        }
    }
    let mut data = data.lock().await;
    data.uploaded_files += files;
    data.created.push((path.to_string(), fields));
    (StatusCode::CREATED, Json(json!({ "message": "created" }))).into_response()
}

async fn create_product(
    State(data): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    record_upload(&data, &headers, "/products", multipart).await
}

async fn create_category(
    State(data): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    record_upload(&data, &headers, "/categories", multipart).await
}

async fn create_slider(
    State(data): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    record_upload(&data, &headers, "/sliders", multipart).await
}

async fn update_delivery(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&data, &headers).await {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    data.lock().await.delivery = body;
    Json(json!({ "message": "updated" })).into_response()
}

async fn place_order(State(data): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut data = data.lock().await;
    data.orders.push(body);
    let n = data.orders.len();
    Json(json!({ "_id": format!("665f00000000000000000{n:03}"), "orderId": format!("ORD-{n}") }))
}

/// Handle on a running stub backend.
#[derive(Clone)]
pub struct StubBackend {
    pub url: String,
    data: Shared,
}

impl StubBackend {
    /// Serve `data` on an ephemeral port.
    pub async fn spawn(data: BackendData) -> Self {
        let data: Shared = Arc::new(Mutex::new(data));
        let router = Router::new()
            .route("/sliders", get(list_sliders).post(create_slider))
            .route("/categories", get(list_categories).post(create_category))
            .route("/products", get(list_products).post(create_product))
            .route("/product/{id}", get(show_product).delete(delete_product))
            .route("/category/{id}", delete(delete_category))
            .route("/slider/{id}", delete(delete_slider))
            .route("/deliverycharge", get(delivery_charge))
            .route("/updatedeliverycharge", patch(update_delivery))
            .route("/login", post(login))
            .route("/me", get(me))
            .route("/orders", post(place_order))
            .with_state(Arc::clone(&data));

        let addr = serve(router).await;
        Self {
            url: format!("http://{addr}"),
            data,
        }
    }

    /// Inspect or change the backend state.
    pub async fn data(&self) -> tokio::sync::MutexGuard<'_, BackendData> {
        self.data.lock().await
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A running storefront wired to a [`StubBackend`].
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub backend: StubBackend,
}

impl TestApp {
    /// Start a stub backend holding `data` and a storefront in front of it.
    pub async fn spawn(data: BackendData) -> Self {
        let backend = StubBackend::spawn(data).await;
        let backend_url = backend.url.clone();
        let config = StorefrontConfig::from_lookup(move |key| match key {
            "BACKEND_API_URL" => Some(backend_url.clone()),
            "CONTACT_WHATSAPP" => Some("8801700000000".to_string()),
            _ => None,
        })
        .unwrap();

        let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/static");
        let router = feriwala_storefront::app_with_static_dir(AppState::new(config), &static_dir);
        let addr = serve(router).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            address: format!("http://{addr}"),
            client,
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// GET a page and return its body.
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// POST a form the way htmx does.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Log in with the stub admin credentials.
    pub async fn login(&self) {
        let response = self
            .post_form("/login", &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
            .await;
        assert_eq!(response.status(), 303);
        assert_eq!(location(&response), "/dashboard");
    }
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
