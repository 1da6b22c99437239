//! API error type and its JSON response mapping.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Shared secret did not match.
    #[error("Unauthorized")]
    Unauthorized,

    /// Missing or malformed field; nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request body could not be read, e.g. over the size limit.
    #[error(transparent)]
    Body(#[from] BytesRejection),

    /// Disk read/write or image decode failed.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Body(rejection) => rejection.status(),
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.field_errors().into_keys().collect();
        fields.sort_unstable();
        Self::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage { context, source } => tracing::error!(error = %source, "{context}"),
            Self::Unauthorized => tracing::warn!("rejected request with wrong admin password"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Product").status(), StatusCode::NOT_FOUND);
        let err = ApiError::storage("Failed to save product")(StoreError::InvalidImage("bad".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to save product");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound("Blog").to_string(), "Blog not found");
    }
}
