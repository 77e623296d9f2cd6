//! Transfer market endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::i18n::{Locale, PLAYER_LISTED, PLAYER_REMOVED_FROM_LIST, TRANSFER_SUCCESS};
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse, PlayerResponse, TransferResponse};
use crate::domain::PlayerId;

pub fn create_transfer_router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_player))
        .route("/remove", post(remove_player))
        .route("/market", get(get_market))
        .route("/buy", post(buy_player))
}

/// Asking price accepts a JSON number or a decimal string
#[derive(Debug, Deserialize)]
pub struct ListBody {
    pub player_id: PlayerId,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PlayerBody {
    pub player_id: PlayerId,
}

/// POST /transfer/list
pub async fn list_player(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    locale: Locale,
    Json(body): Json<ListBody>,
) -> Result<Json<MessageResponse<PlayerResponse>>, ApiError> {
    let player = state
        .transfers
        .list_for_sale(user_id, body.player_id, body.price)
        .await?;

    Ok(Json(MessageResponse::with_data(
        state.catalog.message(locale, PLAYER_LISTED),
        PlayerResponse::from(&player),
    )))
}

/// POST /transfer/remove
pub async fn remove_player(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    locale: Locale,
    Json(body): Json<PlayerBody>,
) -> Result<Json<MessageResponse<PlayerResponse>>, ApiError> {
    let player = state
        .transfers
        .remove_from_sale(user_id, body.player_id)
        .await?;

    Ok(Json(MessageResponse::with_data(
        state.catalog.message(locale, PLAYER_REMOVED_FROM_LIST),
        PlayerResponse::from(&player),
    )))
}

/// GET /transfer/market
pub async fn get_market(
    State(state): State<AppState>,
    _user: RequireUser,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    let players = state.transfers.get_market().await?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}

/// POST /transfer/buy
pub async fn buy_player(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    locale: Locale,
    Json(body): Json<PlayerBody>,
) -> Result<Json<TransferResponse>, ApiError> {
    let receipt = state.transfers.buy(user_id, body.player_id).await?;

    Ok(Json(MessageResponse::with_data(
        state.catalog.message(locale, TRANSFER_SUCCESS),
        receipt,
    )))
}
