//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record store operation failed.
    #[error("Store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: &'static str,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(err) => match err {
                RepositoryError::Validation(_) => StatusCode::BAD_REQUEST,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::CapacityExceeded { .. } | RepositoryError::Unavailable(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Whether the error is our fault and should reach Sentry.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Repository(
                RepositoryError::Database(_)
                    | RepositoryError::Unavailable(_)
                    | RepositoryError::Conflict(_)
            )
        )
    }

    /// Message safe to show to shoppers.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Repository(RepositoryError::Validation(err)) => err.to_string(),
            Self::Repository(RepositoryError::CapacityExceeded { .. }) => {
                "We are not taking new customizations right now. Please try again later."
                    .to_owned()
            }
            Self::Repository(_) => "Internal server error".to_owned(),
            Self::NotFound(_) => "The page you are looking for does not exist.".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if let Self::Repository(RepositoryError::CapacityExceeded { max }) = &self {
            tracing::warn!(max, "Customization store is full");
        }

        let status = self.status();
        let page = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            message: self.public_message(),
        };

        (status, page).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_owned(),
            serde_json::Value::String((*value).to_owned()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
