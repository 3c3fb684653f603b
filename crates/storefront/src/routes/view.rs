//! Shared customization page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use teteu_core::{CustomizationId, CustomizationRecord, expires_at};

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "customization not found";

/// Date the share link stops working, as shown on the page.
fn expiry_label(created_at: DateTime<Utc>, retention_days: u32) -> String {
    expires_at(created_at, retention_days).map_or_else(
        || "never".to_owned(),
        |at| at.format("%Y-%m-%d").to_string(),
    )
}

/// Customization page template.
#[derive(Template, WebTemplate)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub app_name: String,
    pub record: CustomizationRecord,
    pub image: String,
    pub color_label: &'static str,
    pub hardware_label: &'static str,
    pub created_at: String,
    pub created_at_iso: String,
    pub expires_at: String,
    pub share_link: String,
}

/// Display a stored customization.
///
/// Malformed, unknown and inactive ids all render the same 404 page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(id) = id.parse::<CustomizationId>() else {
        tracing::debug!(id = %id, "Malformed customization id");
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_owned()));
    };

    let Some(record) = state.store().get(id).await? else {
        tracing::warn!(%id, "Customization not found");
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_owned()));
    };

    let config = state.config();
    let image = state.images().display_path(&record).await;

    Ok(ViewTemplate {
        app_name: config.app_name.clone(),
        image,
        color_label: record.color.label(),
        hardware_label: record.hardware.label(),
        created_at: record.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        created_at_iso: record.created_at.to_rfc3339(),
        expires_at: expiry_label(record.created_at, config.retention_days),
        share_link: config.share_link(record.id),
        record,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_expiry_label_adds_retention_window() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(expiry_label(created, 30), "2026-03-31");
    }

    #[test]
    fn test_expiry_label_with_huge_window_does_not_overflow() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(expiry_label(created, u32::MAX), "never");
    }
}
