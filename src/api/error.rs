//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::screening::ValidationError;
use crate::session_store::SessionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// Inline per-field messages for questionnaire validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No prediction in this session yet")]
    NoResult,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut fields = Vec::new();
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required".to_string(),
            ),
            ApiError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "MISSING_CREDENTIALS",
                "Please fill in all fields.".to_string(),
            ),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
            ApiError::Validation(err) => {
                fields = err
                    .issues()
                    .iter()
                    .map(|issue| FieldError {
                        field: issue.feature.name(),
                        message: issue.problem.to_string(),
                    })
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_FAILED",
                    "Some answers are missing or invalid".to_string(),
                )
            }
            ApiError::NoResult => (
                StatusCode::NOT_FOUND,
                "NO_RESULT",
                "No prediction has been made in this session".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Session(SessionError::UnknownSession) => ApiError::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    use crate::screening::encoder::tests::answers;
    use crate::screening::encode;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
        assert!(json["error"].get("fields").is_none());
    }

    #[tokio::test]
    async fn missing_credentials_returns_400() {
        let response = ApiError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_CREDENTIALS");
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let mut raw = answers("Maybe");
        raw.remove("AGE");
        let err = encode(&raw).unwrap_err();

        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        let fields = json["error"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "AGE");
        assert_eq!(fields[0]["message"], "This field is required");
        assert_eq!(fields[1]["field"], "SMOKING");
    }

    #[tokio::test]
    async fn no_result_returns_404() {
        let response = ApiError::NoResult.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn unknown_session_maps_to_unauthorized() {
        let api_err: ApiError = CoreError::Session(SessionError::UnknownSession).into();
        assert_eq!(api_err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
