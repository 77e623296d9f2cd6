//! Response language selection

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::i18n::{Locale, MessageCatalog};
use crate::api::types::ApiErrorResponse;
use crate::domain::ErrorCode;

fn locale_from_headers(headers: &HeaderMap) -> Locale {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Locale::from_accept_language)
        .unwrap_or_default()
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(locale_from_headers(&parts.headers))
    }
}

/// Rewrite error bodies in the caller's language
///
/// Applies to any response carrying an [`ErrorCode`] extension, including
/// rejections raised by extractors before a handler runs.
pub async fn localize_errors(
    State(catalog): State<Arc<MessageCatalog>>,
    request: Request,
    next: Next,
) -> Response {
    let locale = locale_from_headers(request.headers());
    let response = next.run(request).await;

    let Some(code) = response.extensions().get::<ErrorCode>().copied() else {
        return response;
    };

    let body = ApiErrorResponse::new(code, catalog.error_message(locale, code));
    let Ok(bytes) = serde_json::to_vec(&body) else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_LANGUAGE,
        header::HeaderValue::from_static(locale.as_str()),
    );

    Response::from_parts(parts, Body::from(bytes))
}
