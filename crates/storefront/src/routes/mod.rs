//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Catalog
//! GET  /health                  - Liveness
//! GET  /health/ready            - Readiness (store ping)
//!
//! # Customization
//! GET  /customize               - Form (?model=..&error=..)
//! POST /customize               - Create record, returns share link (rate limited)
//! GET  /preview                 - Image path for a selection (JSON)
//! GET  /view/{id}               - Shared customization page
//!
//! # Maintenance (STOREFRONT_DEBUG only, 404 otherwise)
//! GET  /admin/customizations              - Listing and statistics
//! POST /admin/sweep                       - Expiry sweep
//! POST /admin/customizations/{id}/delete  - Soft delete
//! ```

pub mod admin;
pub mod customize;
pub mod health;
pub mod home;
pub mod view;

use axum::{
    Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};

use crate::error::AppError;
use crate::middleware::customize_rate_limiter;
use crate::state::AppState;

/// Create the maintenance routes router.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/customizations", get(admin::list))
        .route("/customizations/{id}/delete", post(admin::delete))
        .route("/sweep", post(admin::sweep))
        .route_layer(middleware::from_fn_with_state(state, admin::require_debug))
}

/// Create all routes for the storefront.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route(
            "/customize",
            get(customize::form).merge(post(customize::create).layer(customize_rate_limiter())),
        )
        .route("/preview", get(customize::preview))
        .route("/view/{id}", get(view::show))
        .nest("/admin", admin_routes(state))
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    AppError::NotFound("page".to_owned())
}
