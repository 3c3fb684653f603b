//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::CustomizationStore;
use crate::services::PreviewImages;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the record store, configuration and image lookup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: CustomizationStore,
    images: PreviewImages,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Record store chosen at startup
    #[must_use]
    pub fn new(config: StorefrontConfig, store: CustomizationStore) -> Self {
        let images = PreviewImages::new(config.static_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                images,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &CustomizationStore {
        &self.inner.store
    }

    /// Get a reference to the preview image lookup.
    #[must_use]
    pub fn images(&self) -> &PreviewImages {
        &self.inner.images
    }
}
