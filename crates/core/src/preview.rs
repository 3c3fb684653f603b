//! Preview image paths for a product/color/hardware selection.
//!
//! Every photographed combination is served from the static root as
//! `/static/{model}_{color}_{hardware}.jpg`. Resolution is total: any input,
//! including values outside the enumerated options, yields a path. Unknown
//! colors fall back to `black` and unknown finishes to `silver`, so callers
//! that need strict checking must validate first (see
//! [`NewCustomization::parse`](crate::NewCustomization::parse)).
//!
//! ```
//! use teteu_core::preview::resolve;
//!
//! assert_eq!(resolve("Urban Tote", "brown", "gold"), "/static/model2_brown_gold.jpg");
//! assert_eq!(
//!     resolve("Classic Wallet", "light-brown", "silver"),
//!     "/static/model1_light_brown_silver.jpg"
//! );
//! assert_eq!(resolve("Classic Wallet", "purple", "gold"), "/static/model1_black_gold.jpg");
//! ```

use crate::types::{Color, Hardware};

/// Substring of a lowercase product label that selects the second model.
///
/// Also matches the Spanish catalog name ("Cartera Urbana").
const URBAN_MARKER: &str = "urban";

/// Photographed model family a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelBucket {
    /// Classic line, and anything not recognised as urban.
    Model1,
    /// Urban line.
    Model2,
}

impl ModelBucket {
    /// Pick the bucket for a free-text product label.
    #[must_use]
    pub fn from_product(product: &str) -> Self {
        if product.to_lowercase().contains(URBAN_MARKER) {
            Self::Model2
        } else {
            Self::Model1
        }
    }

    /// Filename prefix for the bucket.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model1 => "model1",
            Self::Model2 => "model2",
        }
    }

    /// Uncustomized photo of the model.
    #[must_use]
    pub const fn default_image(self) -> &'static str {
        match self {
            Self::Model1 => "/static/model1.jpg",
            Self::Model2 => "/static/model2.jpg",
        }
    }
}

/// Filename token for a raw color value; unknown values map to `black`.
#[must_use]
pub fn color_token(color: &str) -> &'static str {
    color
        .parse::<Color>()
        .unwrap_or(Color::FALLBACK)
        .file_token()
}

/// Filename token for a raw hardware value; unknown values map to `silver`.
#[must_use]
pub fn hardware_token(hardware: &str) -> &'static str {
    hardware
        .parse::<Hardware>()
        .unwrap_or(Hardware::FALLBACK)
        .file_token()
}

/// Compose the preview image path for a selection.
#[must_use]
pub fn resolve(product: &str, color: &str, hardware: &str) -> String {
    format!(
        "/static/{}_{}_{}.jpg",
        ModelBucket::from_product(product).as_str(),
        color_token(color),
        hardware_token(hardware),
    )
}

/// Uncustomized photo for a product label.
#[must_use]
pub fn default_image(product: &str) -> &'static str {
    ModelBucket::from_product(product).default_image()
}
