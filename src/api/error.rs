//! HTTP error mapping

use crate::error::MatchAnalyticsError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Error returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    /// The request was understood but its content is unusable
    BadRequest(String),
    /// Anything else; details are logged, never returned
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<MatchAnalyticsError>() {
            Some(domain) if domain.is_client_error() => ApiError::BadRequest(domain.to_string()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(message) => message,
            ApiError::Internal(err) => {
                error!("Request failed: {:#}", err);
                "internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_metadata_is_bad_request() {
        let err: anyhow::Error = MatchAnalyticsError::MalformedMetadata {
            key: "assistId".to_string(),
            value: "\"x\"".to_string(),
        }
        .into();

        let api_error = ApiError::from(err);
        assert_eq!(api_error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let storage: anyhow::Error = MatchAnalyticsError::StorageFailure {
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(ApiError::from(storage).status(), StatusCode::INTERNAL_SERVER_ERROR);

        let opaque = anyhow::anyhow!("connection reset");
        assert_eq!(ApiError::from(opaque).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
