//! Preview image lookup against the static asset directory.
//!
//! Not every color/hardware combination has been photographed. When the
//! composed image is missing on disk the page shows the model's generic photo.

use std::path::PathBuf;

use teteu_core::CustomizationRecord;
use teteu_core::preview::{self, ModelBucket};

/// URL prefix under which the static directory is served.
pub const STATIC_URL_PREFIX: &str = "/static/";

/// Resolves preview image URLs, checking that the file exists.
#[derive(Debug, Clone)]
pub struct PreviewImages {
    static_dir: PathBuf,
}

impl PreviewImages {
    #[must_use]
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    /// Map a `/static/...` URL to a file under the static directory.
    ///
    /// Returns `None` for URLs outside the prefix or containing `..`.
    fn file_for(&self, url_path: &str) -> Option<PathBuf> {
        let relative = url_path.strip_prefix(STATIC_URL_PREFIX)?;
        if relative.is_empty() || relative.split('/').any(|part| part == "..") {
            return None;
        }
        Some(self.static_dir.join(relative))
    }

    /// Whether the file behind a `/static/...` URL exists.
    pub async fn exists(&self, url_path: &str) -> bool {
        match self.file_for(url_path) {
            Some(file) => tokio::fs::try_exists(&file).await.unwrap_or(false),
            None => false,
        }
    }

    /// Image URL for a raw selection, falling back to the model photo.
    pub async fn resolve_or_default(&self, product: &str, color: &str, hardware: &str) -> String {
        let composed = preview::resolve(product, color, hardware);
        if self.exists(&composed).await {
            composed
        } else {
            tracing::debug!(image = %composed, "Preview image missing, using model photo");
            ModelBucket::from_product(product).default_image().to_owned()
        }
    }

    /// Image URL to show for a stored record.
    pub async fn display_path(&self, record: &CustomizationRecord) -> String {
        self.resolve_or_default(
            &record.product,
            record.color.as_str(),
            record.hardware.as_str(),
        )
        .await
    }
}
