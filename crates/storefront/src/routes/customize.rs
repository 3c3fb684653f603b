//! Customization form, record creation and live preview.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use teteu_core::preview::{self, ModelBucket};
use teteu_core::{Color, Hardware, sanitize_label};

use crate::db::RepositoryError;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::routes::home::DEFAULT_MODEL;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Customization form data.
///
/// Missing fields deserialize as empty strings so validation can name them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomizeForm {
    pub model: String,
    pub color: String,
    pub hardware: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the form page.
#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    pub model: Option<String>,
    pub error: Option<String>,
}

/// Query parameters for the live preview.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewQuery {
    pub model: String,
    pub color: String,
    pub hardware: String,
}

/// Live preview response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// Composed image for the selection.
    pub image: String,
    /// Model photo to show if `image` fails to load.
    pub fallback: String,
}

// =============================================================================
// Templates
// =============================================================================

/// One selectable option on the form.
#[derive(Debug, Clone, Copy)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub swatch: &'static str,
}

impl From<Color> for OptionView {
    fn from(color: Color) -> Self {
        Self {
            value: color.as_str(),
            label: color.label(),
            swatch: color.swatch_path(),
        }
    }
}

impl From<Hardware> for OptionView {
    fn from(hardware: Hardware) -> Self {
        Self {
            value: hardware.as_str(),
            label: hardware.label(),
            swatch: hardware.swatch_path(),
        }
    }
}

/// Customization form template.
#[derive(Template, WebTemplate)]
#[template(path = "customize.html")]
pub struct CustomizeTemplate {
    pub app_name: String,
    pub model: String,
    pub image: &'static str,
    pub colors: Vec<OptionView>,
    pub hardware: Vec<OptionView>,
    pub error: Option<String>,
}

/// Model label from browser input, or the default model when nothing usable is left.
fn model_label(raw: Option<&str>) -> String {
    let label = raw.map(sanitize_label).unwrap_or_default();
    if label.is_empty() {
        DEFAULT_MODEL.to_owned()
    } else {
        label
    }
}

/// Form URL that shows `error` for `model`.
fn form_url_with_error(model: &str, error: &str) -> String {
    format!(
        "/customize?model={}&error={}",
        urlencoding::encode(model),
        urlencoding::encode(error)
    )
}

// =============================================================================
// Routes
// =============================================================================

/// Display the customization form.
#[instrument(skip(state, query), fields(model = query.model.as_deref()))]
pub async fn form(State(state): State<AppState>, Query(query): Query<FormQuery>) -> impl IntoResponse {
    let model = model_label(query.model.as_deref());
    let image = ModelBucket::from_product(&model).default_image();

    CustomizeTemplate {
        app_name: state.config().app_name.clone(),
        model,
        image,
        colors: Color::ALL.into_iter().map(OptionView::from).collect(),
        hardware: Hardware::ALL.into_iter().map(OptionView::from).collect(),
        error: query.error.filter(|e| !e.trim().is_empty()),
    }
}

/// Handle form submission.
///
/// Responds with the absolute share link as plain text. Invalid input
/// redirects back to the form with the validation message.
#[instrument(skip(state, form), fields(color = %form.color, hardware = %form.hardware))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CustomizeForm>,
) -> Result<Response, AppError> {
    let model = sanitize_label(&form.model);

    match state
        .store()
        .create(&model, &form.color, &form.hardware)
        .await
    {
        Ok(record) => {
            let link = state.config().share_link(record.id);
            tracing::info!(
                id = %record.id,
                product = %record.product,
                color = %record.color,
                hardware = %record.hardware,
                "Customization created"
            );
            add_breadcrumb(
                "customize",
                "Customization created",
                &[("id", &record.id.to_string())],
            );
            Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], link).into_response())
        }
        Err(RepositoryError::Validation(e)) => {
            tracing::warn!(error = %e, "Customization rejected");
            let model = model_label(Some(&model));
            Ok(Redirect::to(&form_url_with_error(&model, &e.to_string())).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Image path for a selection, for live preview while the shopper picks options.
pub async fn preview(Query(query): Query<PreviewQuery>) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        image: preview::resolve(&query.model, &query.color, &query.hardware),
        fallback: preview::default_image(&query.model).to_owned(),
    })
}
