use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::Result,
    server::AppState,
    types::{ApiResponse, DailyReport, SummaryReport, WeeklyReport},
    wakatime::{SummaryFilter, report},
};

// Non-blank request filters win over the configured defaults.
fn filter(state: &AppState, query: SummaryFilter) -> SummaryFilter {
    query.or(state.wakatime.default_filter())
}

pub async fn today(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryFilter>,
) -> Result<Json<ApiResponse<DailyReport>>> {
    let day = state.wakatime.today(&filter(&state, query)).await?;
    Ok(Json(ApiResponse::ok(report::daily_report(&day))))
}

pub async fn yesterday(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryFilter>,
) -> Result<Json<ApiResponse<DailyReport>>> {
    let day = state.wakatime.yesterday(&filter(&state, query)).await?;
    Ok(Json(ApiResponse::ok(report::daily_report(&day))))
}

pub async fn weekly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryFilter>,
) -> Result<Json<ApiResponse<WeeklyReport>>> {
    let week = state.wakatime.weekly(&filter(&state, query)).await?;
    Ok(Json(ApiResponse::ok(report::weekly_report(&week))))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryFilter>,
) -> Result<Json<ApiResponse<SummaryReport>>> {
    let (today, yesterday, week) = state.wakatime.overview(&filter(&state, query)).await?;
    Ok(Json(ApiResponse::ok(report::summary_report(
        &today, &yesterday, &week,
    ))))
}
