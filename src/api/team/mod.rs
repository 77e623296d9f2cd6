//! Team management endpoints

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use crate::api::i18n::{Locale, PLAYER_UPDATED, TEAM_UPDATED};
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, Json, MessageResponse, PlayerResponse, TeamResponse, TeamWithSquadResponse,
};
use crate::domain::PlayerId;
use crate::infrastructure::team::{UpdatePlayerRequest, UpdateTeamRequest};

pub fn create_team_router() -> Router<AppState> {
    Router::new()
        .route("/team", get(get_team).put(update_team))
        .route("/player", put(update_player))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeamBody {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerBody {
    pub player_id: PlayerId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
}

/// GET /team
pub async fn get_team(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<TeamWithSquadResponse>, ApiError> {
    let view = state.teams.get_team_with_squad(user_id).await?;
    Ok(Json(TeamWithSquadResponse::from(&view)))
}

/// PUT /team
pub async fn update_team(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    locale: Locale,
    Json(body): Json<UpdateTeamBody>,
) -> Result<Json<MessageResponse<TeamResponse>>, ApiError> {
    let team = state
        .teams
        .update_team_profile(
            user_id,
            UpdateTeamRequest {
                name: body.name,
                country: body.country,
            },
        )
        .await?;

    Ok(Json(MessageResponse::with_data(
        state.catalog.message(locale, TEAM_UPDATED),
        TeamResponse::from(&team),
    )))
}

/// PUT /player
pub async fn update_player(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    locale: Locale,
    Json(body): Json<UpdatePlayerBody>,
) -> Result<Json<MessageResponse<PlayerResponse>>, ApiError> {
    let player = state
        .teams
        .update_player_profile(
            user_id,
            body.player_id,
            UpdatePlayerRequest {
                first_name: body.first_name,
                last_name: body.last_name,
                country: body.country,
            },
        )
        .await?;

    Ok(Json(MessageResponse::with_data(
        state.catalog.message(locale, PLAYER_UPDATED),
        PlayerResponse::from(&player),
    )))
}
