//! Error types for srw-api
//!
//! Every handler failure maps to the same opaque 500 body; the detail is only
//! logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::types::FetchError;

/// Body text of every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream fetch, parse or image failure that cannot be recovered locally
    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");

        let body = Json(json!({ "error": INTERNAL_ERROR_MESSAGE }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_error_body_is_opaque() {
        let err = ApiError::Upstream(FetchError::Parse("secret page detail".to_string()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, json!({ "error": "Internal Server Error" }));
    }

    #[test]
    fn test_fetch_error_conversion() {
        let err: ApiError = FetchError::Status(502).into();
        assert!(matches!(err, ApiError::Upstream(FetchError::Status(502))));
        assert_eq!(err.to_string(), "Upstream error: Upstream returned HTTP 502");
    }
}
