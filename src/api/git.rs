use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    server::AppState,
    utils,
};

#[derive(Debug, Deserialize)]
pub struct ContributionsParams {
    pub user: Option<String>,
    pub year: Option<String>,
}

pub async fn contributions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContributionsParams>,
) -> Result<Json<Value>> {
    let user = params
        .user
        .filter(|u| !u.trim().is_empty())
        .ok_or(Error::MissingParameter("user"))?;

    let year = match params.year.filter(|y| !y.trim().is_empty()) {
        Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidParameter {
            name: "year",
            value: raw,
        })?,
        None => utils::current_year(),
    };

    let calendar = state.github.contributions(&user, year).await?;
    Ok(Json(calendar))
}
