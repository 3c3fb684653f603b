//! Maintenance pages, served only when `STOREFRONT_DEBUG` is on.
//!
//! With debug off every route here answers 404, indistinguishable from an
//! unknown path.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use teteu_core::{Color, CustomizationId, Hardware};

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Rows shown when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Upper bound on rows shown on one page.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Reject every request unless debug mode is enabled.
pub async fn require_debug(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.config().debug {
        next.run(request).await
    } else {
        AppError::NotFound(request.uri().path().to_owned()).into_response()
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub swept: Option<u64>,
    pub deleted: Option<bool>,
}

// =============================================================================
// Templates
// =============================================================================

/// Flash-style notice at the top of the listing.
#[derive(Debug, Clone)]
pub struct Notice {
    pub class: &'static str,
    pub text: String,
}

/// One label/count line in the statistics tables.
#[derive(Debug, Clone)]
pub struct CountRow {
    pub label: &'static str,
    pub count: u64,
}

/// One record in the listing.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub id: String,
    pub product: String,
    pub color: &'static str,
    pub hardware: &'static str,
    pub created_at: String,
    pub image: String,
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub app_name: String,
    pub backend: &'static str,
    pub retention_days: u32,
    pub limit: usize,
    pub total_active: u64,
    pub color_counts: Vec<CountRow>,
    pub hardware_counts: Vec<CountRow>,
    pub rows: Vec<RecordRow>,
    pub notice: Option<Notice>,
}

fn notice_for(query: &ListQuery) -> Option<Notice> {
    if let Some(swept) = query.swept {
        return Some(Notice {
            class: "success-message",
            text: format!("Deactivated {swept} expired customizations."),
        });
    }
    query.deleted.map(|deleted| {
        if deleted {
            Notice {
                class: "success-message",
                text: "Customization deleted.".to_owned(),
            }
        } else {
            Notice {
                class: "error-message",
                text: "Customization not found or already inactive.".to_owned(),
            }
        }
    })
}

// =============================================================================
// Routes
// =============================================================================

/// List active customizations with statistics.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);

    let store = state.store();
    let records = store.list(limit).await?;
    let stats = store.stats().await?;

    let rows = records
        .iter()
        .map(|record| RecordRow {
            id: record.id.to_string(),
            product: record.product.clone(),
            color: record.color.label(),
            hardware: record.hardware.label(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            image: record.image_path(),
        })
        .collect();

    Ok(AdminTemplate {
        app_name: state.config().app_name.clone(),
        backend: store.backend_name(),
        retention_days: state.config().retention_days,
        limit,
        total_active: stats.total_active,
        color_counts: Color::ALL
            .into_iter()
            .map(|c| CountRow {
                label: c.label(),
                count: stats.color_count(c),
            })
            .collect(),
        hardware_counts: Hardware::ALL
            .into_iter()
            .map(|h| CountRow {
                label: h.label(),
                count: stats.hardware_count(h),
            })
            .collect(),
        rows,
        notice: notice_for(&query),
    })
}

/// Run an expiry sweep now with the configured retention window.
#[instrument(skip(state))]
pub async fn sweep(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let retention_days = state.config().retention_days;
    let swept = state.store().sweep_expired(retention_days).await?;
    tracing::info!(swept, retention_days, "Manual expiry sweep");
    Ok(Redirect::to(&format!("/admin/customizations?swept={swept}")))
}

/// Soft-delete one customization.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = id
        .parse::<CustomizationId>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let deleted = state.store().delete(id).await?;
    tracing::info!(%id, deleted, "Customization delete requested");
    Ok(Redirect::to(&format!(
        "/admin/customizations?deleted={deleted}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_prefers_sweep_count() {
        let notice = notice_for(&ListQuery {
            limit: None,
            swept: Some(3),
            deleted: Some(true),
        });
        assert_eq!(
            notice.map(|n| n.text).as_deref(),
            Some("Deactivated 3 expired customizations.")
        );
    }

    #[test]
    fn test_notice_for_failed_delete_is_an_error() {
        let notice = notice_for(&ListQuery {
            deleted: Some(false),
            ..ListQuery::default()
        });
        assert_eq!(notice.map(|n| n.class), Some("error-message"));
        assert!(notice_for(&ListQuery::default()).is_none());
    }
}
