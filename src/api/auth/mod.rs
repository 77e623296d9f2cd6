//! Registration and session endpoints

use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde::Deserialize;

use crate::api::i18n::{Locale, LOGGED_OUT, USER_CREATED};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse};
use crate::infrastructure::registration::{RegisterRequest, Registration};
use crate::infrastructure::session::SessionTokens;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

/// Registration body; absent fields surface as validation errors
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub team_name: String,
    pub country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Body of `/refresh` and `/logout`
#[derive(Debug, Deserialize)]
pub struct RefreshBody {
    pub refresh_token: String,
}

/// POST /register
///
/// Creates the account, its team and a generated squad in one unit.
pub async fn register(
    State(state): State<AppState>,
    locale: Locale,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<MessageResponse<Registration>>), ApiError> {
    let registration = state
        .registration
        .register(RegisterRequest {
            email: body.email,
            password: body.password,
            team_name: body.team_name,
            country: body.country,
        })
        .await?;

    let message = state.catalog.message(locale, USER_CREATED);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data(message, registration)),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionTokens>, ApiError> {
    let tokens = state.sessions.login(&body.email, &body.password).await?;
    Ok(Json(tokens))
}

/// POST /refresh
///
/// Exchanges a refresh token for a new pair; the old token stops working.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<SessionTokens>, ApiError> {
    let tokens = state.sessions.refresh(&body.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /logout
///
/// Succeeds whether or not the token names a live session.
pub async fn logout(
    State(state): State<AppState>,
    locale: Locale,
    Json(body): Json<RefreshBody>,
) -> Result<Json<MessageResponse<()>>, ApiError> {
    state.sessions.logout(&body.refresh_token).await?;
    Ok(Json(MessageResponse::text(
        state.catalog.message(locale, LOGGED_OUT),
    )))
}
