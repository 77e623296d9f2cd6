//! JSON extractor whose rejections use the API error format

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;

/// Wrapper around `axum::Json`
///
/// Any body problem (wrong content type, syntax, missing or mistyped
/// fields) is reported as `400 invalid_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => {
                debug!(reason = %describe_rejection(&rejection), "Rejected request body");
                Err(ApiError::invalid_json())
            }
        }
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => format!("syntax: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => "missing content type".to_string(),
        other => other.body_text(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    use crate::domain::ErrorCode;

    #[derive(Debug, Deserialize)]
    struct Payload {
        player_id: i64,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let Json(payload) =
            Json::<Payload>::from_request(request(Some("application/json"), r#"{"player_id": 3}"#), &())
                .await
                .unwrap();

        assert_eq!(payload.player_id, 3);
    }

    #[tokio::test]
    async fn test_rejections_map_to_invalid_json() {
        let cases = [
            request(Some("application/json"), "{not json"),
            request(Some("application/json"), r#"{"player_id": "three"}"#),
            request(Some("application/json"), "{}"),
            request(None, r#"{"player_id": 3}"#),
        ];

        for req in cases {
            let err = Json::<Payload>::from_request(req, &()).await.unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.code, ErrorCode::InvalidJson);
        }
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
    }
}
