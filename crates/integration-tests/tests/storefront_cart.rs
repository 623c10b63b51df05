//! Integration tests for the storefront cart over HTTP.
//!
//! Each test runs its own storefront (see [`TestContext`]); no external
//! services are required.
//!
//! Run with: cargo test -p storecart-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};
use storecart_integration_tests::TestContext;

async fn add(ctx: &TestContext, client: &reqwest::Client, id: i32) -> reqwest::Response {
    client
        .post(ctx.url("/cart/increase"))
        .header("HX-Request", "true")
        .form(&[("id", id.to_string())])
        .send()
        .await
        .expect("Failed to add to cart")
}

async fn cart(ctx: &TestContext, client: &reqwest::Client) -> Value {
    client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Cart is not JSON")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_storefront_health() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Failed to get health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read response"), "ok");
}

// ============================================================================
// Cart persistence
// ============================================================================

#[tokio::test]
async fn test_cart_survives_reload() {
    let ctx = TestContext::new().await;

    add(&ctx, &ctx.client, 1).await;
    add(&ctx, &ctx.client, 2).await;
    add(&ctx, &ctx.client, 1).await;

    let page = ctx
        .client
        .get(ctx.url("/"))
        .send()
        .await
        .expect("Failed to load catalog page")
        .text()
        .await
        .expect("Failed to read response");
    assert!(page.contains("<span class=\"quantity\">2</span> in cart"));
    assert!(page.contains("<span class=\"quantity\">1</span> in cart"));

    let body = cart(&ctx, &ctx.client).await;
    assert_eq!(body["totalQuantity"], 3);
    assert_eq!(
        body["items"],
        json!([{ "id": 1, "quantity": 2 }, { "id": 2, "quantity": 1 }])
    );
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let ctx = TestContext::new().await;
    let other = TestContext::browser();

    add(&ctx, &ctx.client, 4).await;

    assert_eq!(cart(&ctx, &ctx.client).await["totalQuantity"], 1);
    assert_eq!(cart(&ctx, &other).await["totalQuantity"], 0);
}

#[tokio::test]
async fn test_increase_then_decrease_restores_cart() {
    let ctx = TestContext::new().await;

    add(&ctx, &ctx.client, 3).await;
    let before = cart(&ctx, &ctx.client).await;

    add(&ctx, &ctx.client, 5).await;
    let resp = ctx
        .client
        .post(ctx.url("/cart/decrease"))
        .header("HX-Request", "true")
        .form(&[("id", "5")])
        .send()
        .await
        .expect("Failed to decrease");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(cart(&ctx, &ctx.client).await, before);
}

// ============================================================================
// Fragments and progressive enhancement
// ============================================================================

#[tokio::test]
async fn test_htmx_increase_announces_update() {
    let ctx = TestContext::new().await;

    let resp = add(&ctx, &ctx.client, 6).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
    let html = resp.text().await.expect("Failed to read response");
    assert!(html.contains("id=\"product-6\""));
    assert!(!html.contains("<html"));
}

#[tokio::test]
async fn test_form_post_without_htmx_lands_on_catalog() {
    let ctx = TestContext::new().await;

    // The client follows the redirect back to the catalog page.
    let resp = ctx
        .client
        .post(ctx.url("/cart/increase"))
        .form(&[("id", "2")])
        .send()
        .await
        .expect("Failed to post form");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");

    let page = resp.text().await.expect("Failed to read response");
    assert!(page.contains("<html"));
    assert!(page.contains("<span class=\"quantity\">1</span> in cart"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let resp = add(&ctx, &ctx.client, 404).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(cart(&ctx, &ctx.client).await["totalQuantity"], 0);
}
