//! Admin login and dashboard flows against the stub backend.

use feriwala_integration_tests::{ADMIN_EMAIL, BackendData, TestApp, location};
use reqwest::multipart::{Form, Part};

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
async fn test_dashboard_requires_login() {
    let app = TestApp::spawn(BackendData::sample()).await;

    for path in [
        "/dashboard",
        "/dashboard/allProducts",
        "/dashboard/createProduct",
        "/dashboard/categories",
        "/dashboard/slider",
        "/dashboard/deliveryform",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), 303, "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
}

#[tokio::test]
async fn test_revoked_token_redirects_to_login() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;
    assert_eq!(app.get("/dashboard").await.status(), 200);

    app.backend.data().await.token_revoked = true;

    let response = app.get("/dashboard").await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_failure_shows_backend_message() {
    let app = TestApp::spawn(BackendData::sample()).await;

    let response = app
        .post_form("/login", &[("email", ADMIN_EMAIL), ("password", "wrong")])
        .await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains(ADMIN_EMAIL));

    let response = app.get("/dashboard").await;
    assert_eq!(response.status(), 303);
}

#[tokio::test]
async fn test_logout_flashes_and_clears_token() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let dashboard = app.get_text("/dashboard").await;
    assert!(dashboard.contains("Feriwala Admin"));
    assert!(dashboard.contains(">5<"));

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");

    let login = app.get_text("/login").await;
    assert!(login.contains("Logout successfully"));

    // Flash is shown once
    let login = app.get_text("/login").await;
    assert!(!login.contains("Logout successfully"));

    assert_eq!(app.get("/dashboard").await.status(), 303);
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_list_defaults_to_first_category() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let body = app.get_text("/dashboard/allProducts").await;
    assert!(body.contains("Cotton Panjabi"));
    assert!(body.contains("Summer Fotua"));
    assert!(!body.contains("Jamdani Saree"));
    assert!(body.contains("<option value=\"Men\" selected>"));
}

#[tokio::test]
async fn test_product_list_filters_by_category() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let body = app.get_text("/dashboard/allProducts?category=Women").await;
    assert!(body.contains("Jamdani Saree"));
    assert!(body.contains("Linen Kurti"));
    assert!(!body.contains("Cotton Panjabi"));
    assert!(!body.contains("Printed Frock"));
}

#[tokio::test]
async fn test_product_delete_confirm_flow() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let response = app
        .post_form("/dashboard/allProducts/p2/delete", &[("category", "Women")])
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard/allProducts?category=Women");

    let body = app.get_text("/dashboard/allProducts?category=Women").await;
    assert!(body.contains("Delete \u{201c}Jamdani Saree\u{201d}?"));
    assert!(app.backend.data().await.deleted.is_empty());

    let response = app
        .post_form("/dashboard/allProducts/delete/confirm", &[("category", "Women")])
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard/allProducts?category=Women");
    assert_eq!(app.backend.data().await.deleted, vec!["/product/p2"]);

    let body = app.get_text("/dashboard/allProducts?category=Women").await;
    assert!(body.contains("Product deleted successfully!"));
    assert!(!body.contains("Jamdani Saree"));
    assert!(!body.contains("Yes, delete"));
}

#[tokio::test]
async fn test_product_delete_cancel_keeps_product() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    app.post_form("/dashboard/allProducts/p1/delete", &[]).await;
    let response = app
        .post_form("/dashboard/allProducts/delete/cancel", &[])
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard/allProducts");

    let body = app.get_text("/dashboard/allProducts").await;
    assert!(body.contains("Cotton Panjabi"));
    assert!(!body.contains("Yes, delete"));
    assert!(app.backend.data().await.deleted.is_empty());
}

#[tokio::test]
async fn test_product_delete_failure_flashes_error() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;
    app.backend.data().await.fail_deletes = true;

    app.post_form("/dashboard/allProducts/p1/delete", &[]).await;
    app.post_form("/dashboard/allProducts/delete/confirm", &[])
        .await;

    // The backend's own message wins over the generic text
    let body = app.get_text("/dashboard/allProducts").await;
    assert!(body.contains("Database unavailable"));
    assert!(body.contains("Cotton Panjabi"));
    // Pending deletion is cleared either way
    assert!(!body.contains("Yes, delete"));
}

#[tokio::test]
async fn test_create_product_forwards_fields_and_images() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let form = Form::new()
        .text("name", "Khadi Shirt")
        .text("description", "Hand-woven")
        .text("regularPrice", "1800")
        .text("discountPrice", "")
        .text("category", "Men")
        .text("category", "Summer")
        .part(
            "images",
            Part::bytes(vec![0xFF, 0xD8, 0xFF])
                .file_name("front.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        )
        .part(
            "images",
            Part::bytes(vec![0xFF, 0xD8, 0xFF])
                .file_name("back.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        );
    let response = app
        .client
        .post(app.url("/dashboard/createProduct"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard/allProducts");

    let data = app.backend.data().await;
    assert_eq!(data.uploaded_files, 2);
    let (path, fields) = &data.created[0];
    assert_eq!(path, "/products");
    let categories: Vec<&str> = fields
        .iter()
        .filter(|(name, _)| name == "category")
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(categories, ["Men", "Summer"]);
    assert!(fields.contains(&("name".to_string(), "Khadi Shirt".to_string())));
    assert!(fields.contains(&("regularPrice".to_string(), "1800".to_string())));
}

#[tokio::test]
async fn test_create_product_requires_category() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let form = Form::new()
        .text("name", "Khadi Shirt")
        .text("regularPrice", "1800");
    let response = app
        .client
        .post(app.url("/dashboard/createProduct"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Please select at least one category."));
    assert!(body.contains("value=\"Khadi Shirt\""));
    assert!(app.backend.data().await.created.is_empty());
}

// ============================================================================
// Categories and slider
// ============================================================================

#[tokio::test]
async fn test_category_create_and_delete() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let response = app
        .client
        .post(app.url("/dashboard/categories"))
        .multipart(Form::new().text("name", "Winter"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard/categories");
    assert!(app
        .get_text("/dashboard/categories")
        .await
        .contains("Category added successfully"));

    app.post_form("/dashboard/categories/c3/delete", &[]).await;
    let body = app.get_text("/dashboard/categories").await;
    assert!(body.contains("Delete Kids?"));

    app.post_form("/dashboard/categories/delete/confirm", &[])
        .await;
    assert_eq!(app.backend.data().await.deleted, vec!["/category/c3"]);
}

#[tokio::test]
async fn test_slider_upload_requires_one_image() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let response = app
        .client
        .post(app.url("/dashboard/slider"))
        .multipart(Form::new().text("caption", "no file"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Please choose an image to upload."));
    assert!(app.backend.data().await.created.is_empty());

    let image = Part::bytes(vec![0x89, 0x50, 0x4E, 0x47])
        .file_name("banner.png")
        .mime_str("image/png")
        .unwrap();
    let response = app
        .client
        .post(app.url("/dashboard/slider"))
        .multipart(Form::new().part("image", image))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(app.backend.data().await.uploaded_files, 1);

    let body = app.get_text("/dashboard/slider").await;
    assert!(body.contains("Slider image uploaded successfully"));
}

#[tokio::test]
async fn test_slider_delete() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    app.post_form("/dashboard/slider/s1/delete", &[]).await;
    assert!(app
        .get_text("/dashboard/slider")
        .await
        .contains("Delete this slider image?"));

    app.post_form("/dashboard/slider/delete/confirm", &[]).await;
    assert_eq!(app.backend.data().await.deleted, vec!["/slider/s1"]);
    assert!(app
        .get_text("/dashboard/slider")
        .await
        .contains("Slider image deleted successfully!"));
}

// ============================================================================
// Delivery charges
// ============================================================================

#[tokio::test]
async fn test_delivery_charges_update() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let body = app.get_text("/dashboard/deliveryform").await;
    assert!(body.contains("value=\"60\""));
    assert!(body.contains("value=\"120\""));

    let response = app
        .post_form(
            "/dashboard/deliveryform",
            &[("insideDhaka", "80"), ("outsideDhaka", "160")],
        )
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard/deliveryform");

    let delivery = app.backend.data().await.delivery.clone();
    assert_eq!(delivery["insideDhaka"], 80);
    assert_eq!(delivery["outsideDhaka"], 160);

    let body = app.get_text("/dashboard/deliveryform").await;
    assert!(body.contains("Delivery charges updated successfully!"));
    assert!(body.contains("value=\"80\""));
}

#[tokio::test]
async fn test_delivery_charges_reject_non_numbers() {
    let app = TestApp::spawn(BackendData::sample()).await;
    app.login().await;

    let response = app
        .post_form(
            "/dashboard/deliveryform",
            &[("insideDhaka", "eighty"), ("outsideDhaka", "160")],
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(app.backend.data().await.delivery["insideDhaka"], 60);
}
