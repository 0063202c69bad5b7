use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::{error::Result, server::AppState, spotify::player, success, types::NowPlaying};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

pub async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let url = state.tokens.auth().authorize_url()?;
    Ok(Redirect::to(&url))
}

pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<&'static str> {
    state
        .tokens
        .exchange_authorization_code(&state.account_id, params.code.as_deref())
        .await?;

    success!("Spotify connected for `{}`", state.account_id);
    Ok("Spotify connected successfully. You can close this window.")
}

pub async fn now_playing(State(state): State<Arc<AppState>>) -> Result<Json<NowPlaying>> {
    let now = player::now_playing(&state.tokens, &state.player, &state.account_id).await?;
    Ok(Json(now))
}
