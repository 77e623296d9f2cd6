//! API error type and response body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{DomainError, ErrorCode};

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.as_str().to_string(),
                message: message.into(),
            },
        }
    }
}

/// API error with status code
///
/// The body carries the bare code as its message. The router's
/// [`localize_errors`](crate::api::middleware::localize_errors) layer finds
/// the code in the response extensions and renders the message from the
/// injected catalog in the caller's language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode) -> Self {
        Self { status, code }
    }

    pub fn bad_request(code: ErrorCode) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code)
    }

    pub fn invalid_json() -> Self {
        Self::bad_request(ErrorCode::InvalidJson)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse::new(self.code, self.code.as_str());
        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(self.code);
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
            DomainError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            DomainError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Storage { .. } | DomainError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if err.is_infrastructure() {
            error!(error = %err, retryable = err.is_retryable(), "Request failed");
        }

        Self::new(status, err.code())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.code)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::validation(ErrorCode::InvalidEmail), StatusCode::BAD_REQUEST),
            (DomainError::invalid_credentials(), StatusCode::UNAUTHORIZED),
            (DomainError::player_not_found(), StatusCode::NOT_FOUND),
            (DomainError::not_owned(), StatusCode::NOT_FOUND),
            (DomainError::insufficient_funds(), StatusCode::CONFLICT),
            (DomainError::duplicate_identity(), StatusCode::CONFLICT),
            (DomainError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("bug"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::unavailable("timeout"), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (domain_err, expected) in cases {
            let api_err = ApiError::from(domain_err);
            assert_eq!(api_err.status, expected, "{}", api_err.code);
        }
    }

    #[test]
    fn test_infrastructure_detail_is_not_exposed() {
        let api_err = ApiError::from(DomainError::storage("relation \"teams\" does not exist"));

        assert_eq!(api_err.code, ErrorCode::InternalError);
        assert!(!api_err.to_string().contains("teams"));
    }

    #[tokio::test]
    async fn test_response_carries_code() {
        let response = ApiError::from(DomainError::self_transfer()).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.extensions().get::<ErrorCode>(),
            Some(&ErrorCode::OwnPlayerBuy)
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error.code, "own_player_buy");
        assert_eq!(parsed.error.message, "own_player_buy");
    }
}
