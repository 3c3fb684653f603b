//! Integration tests for the maintenance pages.
//!
//! The pages only exist when debug mode is on; with it off they must be
//! indistinguishable from unknown paths.

use chrono::{TimeDelta, Utc};
use reqwest::{Response, StatusCode, header};

use teteu_core::{CustomizationId, NewCustomization};
use teteu_integration_tests::{TestOptions, TestServer};

async fn debug_server() -> TestServer {
    TestServer::start_with(TestOptions {
        debug: true,
        ..TestOptions::default()
    })
    .await
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Redirect has no location")
}

/// Insert a record created `days_ago` days in the past.
fn insert_backdated(server: &TestServer, days_ago: i64) -> CustomizationId {
    let new = NewCustomization::parse("Classic Wallet", "black", "gold")
        .expect("Valid customization");
    let id = CustomizationId::generate();
    server
        .store
        .insert_at(new, id, Utc::now() - TimeDelta::days(days_ago))
        .expect("Insert failed");
    id
}

// ============================================================================
// Access
// ============================================================================

#[tokio::test]
async fn test_admin_pages_hidden_without_debug() {
    let server = TestServer::start().await;
    let id = CustomizationId::generate();

    let list = server
        .client
        .get(server.url("/admin/customizations"))
        .send()
        .await
        .expect("Failed to get listing");
    assert_eq!(list.status(), StatusCode::NOT_FOUND);

    let sweep = server
        .client
        .post(server.url("/admin/sweep"))
        .send()
        .await
        .expect("Failed to post sweep");
    assert_eq!(sweep.status(), StatusCode::NOT_FOUND);

    let delete = server
        .client
        .post(server.url(&format!("/admin/customizations/{id}/delete")))
        .send()
        .await
        .expect("Failed to post delete");
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_listing_shows_records_and_counts() {
    let server = debug_server().await;
    server.create("Urban Tote", "brown", "gold").await;
    server.create("Classic Wallet", "black", "gold").await;

    let resp = server
        .client
        .get(server.url("/admin/customizations"))
        .send()
        .await
        .expect("Failed to get listing");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("<strong>2</strong> active"));
    assert!(body.contains("memory store"));
    assert!(body.contains("Urban Tote"));
    assert!(body.contains("Classic Wallet"));
    assert!(body.contains("<tr><td>Gold</td><td>2</td></tr>"));
    assert!(body.contains("<tr><td>Silver</td><td>0</td></tr>"));
}

// ============================================================================
// Sweep
// ============================================================================

#[tokio::test]
async fn test_sweep_expires_old_records() {
    let server = debug_server().await;
    let old = insert_backdated(&server, 45);
    let fresh = server.create("Urban Tote", "brown", "silver").await;

    let resp = server
        .client
        .post(server.url("/admin/sweep"))
        .send()
        .await
        .expect("Failed to post sweep");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/customizations?swept=1");

    let old_view = server
        .client
        .get(server.url(&format!("/view/{old}")))
        .send()
        .await
        .expect("Failed to get view");
    assert_eq!(old_view.status(), StatusCode::NOT_FOUND);

    let fresh_view = server
        .client
        .get(&fresh)
        .send()
        .await
        .expect("Failed to get view");
    assert_eq!(fresh_view.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sweep_notice_is_rendered() {
    let server = debug_server().await;

    let body = server
        .client
        .get(server.url("/admin/customizations?swept=3"))
        .send()
        .await
        .expect("Failed to get listing")
        .text()
        .await
        .expect("Failed to read response");

    assert!(body.contains("Deactivated 3 expired customizations."));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_deactivates_record() {
    let server = debug_server().await;
    let link = server.create("Urban Tote", "black", "silver").await;
    let id = link.rsplit('/').next().expect("Link has an id");

    let resp = server
        .client
        .post(server.url(&format!("/admin/customizations/{id}/delete")))
        .send()
        .await
        .expect("Failed to post delete");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/customizations?deleted=true");

    let view = server
        .client
        .get(&link)
        .send()
        .await
        .expect("Failed to get view");
    assert_eq!(view.status(), StatusCode::NOT_FOUND);

    // A second delete finds nothing active.
    let again = server
        .client
        .post(server.url(&format!("/admin/customizations/{id}/delete")))
        .send()
        .await
        .expect("Failed to post delete");
    assert_eq!(location(&again), "/admin/customizations?deleted=false");
}

#[tokio::test]
async fn test_delete_rejects_malformed_id() {
    let server = debug_server().await;

    let resp = server
        .client
        .post(server.url("/admin/customizations/not-a-uuid/delete"))
        .send()
        .await
        .expect("Failed to post delete");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
