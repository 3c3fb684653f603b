//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use teteu_core::preview::ModelBucket;

use crate::filters;
use crate::state::AppState;

/// A model offered for customization.
#[derive(Debug, Clone, Copy)]
pub struct CatalogItem {
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

/// Models shown on the home page, in display order.
pub const CATALOG: [CatalogItem; 2] = [
    CatalogItem {
        name: "Classic Wallet",
        description: "Bifold wallet in full-grain leather with card slots and a coin pocket.",
        image: ModelBucket::Model1.default_image(),
    },
    CatalogItem {
        name: "Urban Tote",
        description: "Everyday tote with a zip pocket, sized for a laptop.",
        image: ModelBucket::Model2.default_image(),
    },
];

/// Model preselected when the form is opened without one.
pub const DEFAULT_MODEL: &str = "Classic Wallet";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub app_name: String,
    pub catalog: &'static [CatalogItem],
}

/// Display the catalog.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        app_name: state.config().app_name.clone(),
        catalog: &CATALOG,
    }
}
