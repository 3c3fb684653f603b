//! Integration tests for the customization flow.
//!
//! Covers the form, record creation, share links and the live preview
//! against a storefront backed by the in-memory store.

use reqwest::{StatusCode, header};
use serde_json::Value;

use teteu_integration_tests::{TestOptions, TestServer};

// ============================================================================
// Form
// ============================================================================

#[tokio::test]
async fn test_form_lists_every_option() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/customize?model=Urban%20Tote"))
        .send()
        .await
        .expect("Failed to get form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    for value in ["black", "brown", "light-brown", "silver", "gold"] {
        assert!(body.contains(&format!("value=\"{value}\"")), "missing option {value}");
    }
    assert!(body.contains("Urban Tote"));
}

#[tokio::test]
async fn test_form_shows_error_from_query() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/customize?model=Urban%20Tote&error=hardware%20is%20missing"))
        .send()
        .await
        .expect("Failed to get form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("hardware is missing"));
}

// ============================================================================
// Create & View
// ============================================================================

#[tokio::test]
async fn test_create_returns_share_link_that_renders() {
    let server = TestServer::start().await;

    let link = server.create("Urban Tote", "brown", "gold").await;
    assert!(
        link.starts_with(&format!("{}/view/", server.base_url)),
        "unexpected link {link}"
    );

    let resp = server
        .client
        .get(&link)
        .send()
        .await
        .expect("Failed to follow share link");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Urban Tote"));
    assert!(body.contains("Brown"));
    assert!(body.contains("Gold"));
    assert!(body.contains(&link));
}

#[tokio::test]
async fn test_create_stores_one_active_record() {
    let server = TestServer::start().await;

    server.create("Classic Wallet", "light-brown", "silver").await;

    assert_eq!(server.store.stored_len().expect("Store lock poisoned"), 1);
}

#[tokio::test]
async fn test_create_sanitizes_product_label() {
    let server = TestServer::start().await;

    let link = server.create("<b>Classic Wallet</b>", "black", "silver").await;
    let body = server
        .client
        .get(&link)
        .send()
        .await
        .expect("Failed to follow share link")
        .text()
        .await
        .expect("Failed to read response");

    assert!(body.contains("bClassic Wallet/b"));
    assert!(!body.contains("<b>Classic Wallet"));
}

#[tokio::test]
async fn test_invalid_color_redirects_back_to_form() {
    let server = TestServer::start().await;

    let resp = server.submit("Urban Tote", "purple", "gold").await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Redirect has no location")
        .to_owned();
    assert!(location.starts_with("/customize?model=Urban%20Tote&error="));
    assert!(location.contains("purple"));
    assert_eq!(server.store.stored_len().expect("Store lock poisoned"), 0);
}

#[tokio::test]
async fn test_missing_hardware_is_rejected() {
    let server = TestServer::start().await;

    let resp = server.submit("Urban Tote", "brown", "").await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Redirect has no location");
    assert!(location.contains("hardware"));
    assert_eq!(server.store.stored_len().expect("Store lock poisoned"), 0);
}

#[tokio::test]
async fn test_full_store_answers_service_unavailable() {
    let server = TestServer::start_with(TestOptions {
        max_records: 1,
        ..TestOptions::default()
    })
    .await;

    server.create("Urban Tote", "black", "gold").await;
    let resp = server.submit("Urban Tote", "brown", "gold").await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(server.store.stored_len().expect("Store lock poisoned"), 1);
}

#[tokio::test]
async fn test_create_is_rate_limited_per_client() {
    let server = TestServer::start().await;

    let mut limited = false;
    for _ in 0..20 {
        let resp = server.submit("Urban Tote", "black", "silver").await;
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            limited = true;
            break;
        }
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert!(limited, "burst of 20 submissions was never limited");
}

#[tokio::test]
async fn test_view_unknown_and_malformed_ids_are_not_found() {
    let server = TestServer::start().await;

    for path in [
        "/view/00000000-0000-4000-8000-000000000000",
        "/view/not-a-uuid",
    ] {
        let resp = server
            .client
            .get(server.url(path))
            .send()
            .await
            .expect("Failed to get view");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

// ============================================================================
// Preview
// ============================================================================

#[tokio::test]
async fn test_preview_resolves_selection() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/preview?model=Urban%20Tote&color=light-brown&hardware=gold"))
        .send()
        .await
        .expect("Failed to get preview");

    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(json["image"], "/static/model2_light_brown_gold.jpg");
    assert_eq!(json["fallback"], "/static/model2.jpg");
}

#[tokio::test]
async fn test_preview_falls_back_for_unknown_options() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/preview?model=Classic%20Wallet&color=purple&hardware=copper"))
        .send()
        .await
        .expect("Failed to get preview");

    let json: Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(json["image"], "/static/model1_black_silver.jpg");
}
