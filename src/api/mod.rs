//! Catalog REST API.
//!
//! Reads are open. Every mutating call carries the admin password in its JSON
//! body; checks run in the order password, fields, id lookup, storage.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Request},
    routing::{get, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::store::{CatalogStore, ImageStore};

pub mod blogs;
pub mod error;
pub mod products;

pub use error::ApiError;

/// Image payloads travel inline as base64, so bodies get a generous limit.
pub const BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: CatalogStore,
    images: ImageStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let catalog = CatalogStore::new(config.data_path.clone());
        let images = ImageStore::new(config.uploads_dir.clone());
        Self { inner: Arc::new(AppStateInner { config, catalog, images }) }
    }

    pub fn config(&self) -> &ServerConfig { &self.inner.config }
    pub fn catalog(&self) -> &CatalogStore { &self.inner.catalog }
    pub fn images(&self) -> &ImageStore { &self.inner.images }

    pub(crate) fn authorize(&self, password: &str) -> Result<(), ApiError> {
        if self.config().verify_admin(password) { Ok(()) } else { Err(ApiError::Unauthorized) }
    }
}

/// JSON body of an admin call.
///
/// Extraction reads the raw bytes and checks `password` before anything else,
/// so a wrong password is a 401 whatever the rest of the body holds. A missing
/// or non-JSON body counts as an empty password.
pub struct AdminBody(Value);

#[async_trait]
impl FromRequest<AppState> for AdminBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
        state.authorize(body.get("password").and_then(Value::as_str).unwrap_or_default())?;
        Ok(Self(body))
    }
}

impl AdminBody {
    /// Deserialize the authorized body. A wrong shape or field type is a 400.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.0).map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.images().dir());
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/:id", put(products::update).delete(products::delete))
        .route("/api/blogs", get(blogs::list).post(blogs::create))
        .route("/api/blogs/:id", put(blogs::update).delete(blogs::delete))
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::net::IpAddr;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use secrecy::SecretString;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    pub const PASSWORD: &str = "test-pass";
    pub const PIXEL: &str = "data:image/png;base64,aGVsbG8=";

    pub fn test_state(dir: &TempDir) -> AppState {
        AppState::new(ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            data_path: dir.path().join("data.json"),
            uploads_dir: dir.path().join("uploads"),
            admin_password: SecretString::from(PASSWORD.to_string()),
        })
    }

    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, json)
    }
}
