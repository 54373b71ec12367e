mod common;

use haat::client::{ApiClient, ApiError, NewListing};

/// The critical seller journey: register, list an item, watch it appear,
/// mark it sold, delete it, and confirm it is gone.
#[tokio::test]
async fn full_listing_lifecycle() {
    let server = common::spawn().await;
    let client = ApiClient::new(server.base_url.clone()).unwrap();

    let account = client
        .register("rahim", "rahim@example.com", "correct horse battery")
        .await
        .unwrap();

    let categories = client.categories().await.unwrap();
    let category = &categories[0];

    let created = client
        .create_product(&NewListing {
            category_id: Some(category.id),
            title: Some("Desk".to_string()),
            price: Some(500.0),
            ..NewListing::default()
        })
        .await
        .unwrap();
    assert_eq!(created.user_id, account.id);
    assert_eq!(created.price, 500.0);
    assert!(!created.is_sold);

    // Visible in the public list and in the detail fetch
    let all = client.products(None).await.unwrap();
    assert_eq!(all.len(), 1);

    let fetched = client.product(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched.user_id, account.id);
    assert!(!fetched.is_sold);

    // Mark sold, then delete
    let sold = client.mark_sold(created.id).await.unwrap();
    assert!(sold.is_sold);

    client.delete_product(created.id).await.unwrap();

    let result = client.product(&created.id.to_string()).await;
    assert!(matches!(result, Err(ApiError::NotFound)));

    let all = client.products(None).await.unwrap();
    assert!(all.is_empty());
}

/// The server-rendered pages track the same state the API mutates.
#[tokio::test]
async fn browse_and_detail_pages_render_listings() {
    let server = common::spawn().await;

    // Authenticated browser session: register through the API, keep cookies
    let browser = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();
    browser
        .post(format!("{}/auth/register", server.base_url))
        .json(&serde_json::json!({
            "username": "rahim",
            "email": "rahim@example.com",
            "password": "correct horse battery"
        }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    // List an item through the sell form
    let response = browser
        .post(format!("{}/sell", server.base_url))
        .form(&[
            ("category_id", "1"),
            ("title", "Almirah"),
            ("price", "1200"),
            ("description", "Steel, lightly used"),
            ("location", "Chattogram"),
            ("image_url", ""),
            ("show_email", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let detail_url = response.url().clone();
    let detail_html = response.text().await.unwrap();
    assert!(detail_url.path().starts_with("/listings/"));
    assert!(detail_html.contains("Almirah"));
    assert!(detail_html.contains("Chattogram"));
    assert!(detail_html.contains("rahim@example.com"));
    assert!(detail_html.contains("Mark Sold"));

    // The browse page shows the card
    let browse_html = browser
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(browse_html.contains("Almirah"));

    // Anonymous visitors see the listing but no owner controls
    let visitor_html = reqwest::get(format!("{}{}", server.base_url, detail_url.path()))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(visitor_html.contains("Almirah"));
    assert!(!visitor_html.contains("Mark Sold"));
}

#[tokio::test]
async fn detail_page_rejects_malformed_ids_and_missing_rows() {
    let server = common::spawn().await;

    let response = reqwest::get(format!("{}/listings/abc", server.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("Invalid product id"));

    let response = reqwest::get(format!("{}/listings/12345", server.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert!(response.text().await.unwrap().contains("Product not found."));
}

#[tokio::test]
async fn sell_page_requires_a_session() {
    let server = common::spawn().await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = client
        .get(format!("{}/sell", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn mine_view_is_empty_for_anonymous_visitors() {
    let server = common::spawn().await;

    let html = reqwest::get(format!("{}/?view=my", server.base_url))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("You have not created any products yet."));
}
