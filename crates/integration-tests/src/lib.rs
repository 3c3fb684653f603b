//! Integration tests for the Teteu Cueros storefront.
//!
//! Each test starts the full storefront router on an ephemeral port, backed
//! by an in-memory record store, and talks to it over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p teteu-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `customize_flow` - Form, creation, share links and preview
//! - `admin_pages` - Maintenance listing, sweep and delete
//! - `platform` - Health probes, security headers and error pages

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, redirect};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use teteu_storefront::config::StorefrontConfig;
use teteu_storefront::db::{CustomizationStore, MemoryCustomizationStore};
use teteu_storefront::state::AppState;

/// Knobs for a test server.
#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Serve the maintenance pages.
    pub debug: bool,
    /// Maximum number of active records.
    pub max_records: usize,
    /// Retention window used by the sweep.
    pub retention_days: u32,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            debug: false,
            max_records: 100,
            retention_days: 30,
            static_dir: storefront_static_dir(),
        }
    }
}

/// The storefront's bundled static assets.
#[must_use]
pub fn storefront_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}

/// A storefront running on a local ephemeral port.
pub struct TestServer {
    /// Root URL, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    /// Client that does not follow redirects.
    pub client: Client,
    /// Handle onto the server's record store.
    pub store: MemoryCustomizationStore,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with default options.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind a local port.
    pub async fn start() -> Self {
        Self::start_with(TestOptions::default()).await
    }

    /// Start a storefront with the given options.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind a local port.
    #[allow(clippy::expect_used)]
    pub async fn start_with(options: TestOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: Url::parse(&base_url).expect("Test base url is valid"),
            debug: options.debug,
            retention_days: options.retention_days,
            sweep_interval: None,
            max_records: options.max_records,
            static_dir: options.static_dir,
            ..StorefrontConfig::default()
        };

        let store = MemoryCustomizationStore::with_capacity_limit(options.max_records);
        let state = AppState::new(config, CustomizationStore::Memory(store.clone()));
        let app = teteu_storefront::app(state);

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            store,
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submit the customization form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn submit(&self, model: &str, color: &str, hardware: &str) -> reqwest::Response {
        self.client
            .post(self.url("/customize"))
            .form(&[("model", model), ("color", color), ("hardware", hardware)])
            .send()
            .await
            .expect("Failed to submit customization")
    }

    /// Submit a valid customization and return its share link.
    ///
    /// # Panics
    ///
    /// Panics if the submission is not accepted.
    #[allow(clippy::expect_used)]
    pub async fn create(&self, model: &str, color: &str, hardware: &str) -> String {
        let resp = self.submit(model, color, hardware).await;
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        resp.text().await.expect("Failed to read share link")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
