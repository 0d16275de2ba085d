//! Integration tests for Warung.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p warung-integration-tests
//! ```
//!
//! The storefront router is driven in-process with `tower::ServiceExt`, so
//! no server or network is needed. Each [`TestContext`] owns a temporary data
//! directory that is removed when it is dropped.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart pages and HTMX fragments
//! - `storefront_checkout` - Checkout, bill and close policy
//! - `shared_storage` - Cart file shared between processes

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;
use warung_core::cart::FileStorage;
use warung_core::{Catalog, ClosePolicy};
use warung_storefront::config::StorefrontConfig;
use warung_storefront::routes;
use warung_storefront::state::AppState;

/// A storefront backed by a temporary cart directory.
pub struct TestContext {
    pub dir: TempDir,
    pub storage: FileStorage,
    pub state: AppState,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a response header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestContext {
    /// A storefront with the built-in menu and default close policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ClosePolicy::default())
    }

    /// A storefront that applies `policy` when a bill is closed.
    #[must_use]
    pub fn with_policy(policy: ClosePolicy) -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self::in_dir(dir, policy)
    }

    /// A storefront over an existing data directory.
    #[must_use]
    pub fn in_dir(dir: TempDir, policy: ClosePolicy) -> Self {
        let storage = FileStorage::new(dir.path());
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            close_policy: policy,
            sync_interval: None,
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, Catalog::builtin(), Arc::new(storage.clone()));
        Self {
            dir,
            storage,
            state,
        }
    }

    /// The full router, as the binary serves it minus the Sentry layers.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a form POST, as a plain browser would.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        self.send(form_request(uri, form, false)).await
    }

    /// Send a form POST, as HTMX would.
    pub async fn post_htmx(&self, uri: &str, form: &str) -> TestResponse {
        self.send(form_request(uri, form, true)).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Raw contents of the persisted cart file, if any.
    #[must_use]
    pub fn persisted(&self) -> Option<serde_json::Value> {
        use warung_core::CartStorage;

        self.storage
            .read("cart")
            .unwrap()
            .map(|json| serde_json::from_str(&json).unwrap())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn form_request(uri: &str, form: &str, htmx: bool) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder.body(Body::from(form.to_string())).unwrap()
}
