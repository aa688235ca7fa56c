//! Trial handlers for the REST API.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use botrent_types::error::TrialError;
use botrent_types::trial::{BotId, TrialActivation};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /api/v1/trials`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTrialRequest {
    pub bot_id: i64,
    pub bot_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveResponse {
    pub bot_id: BotId,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedResponse {
    pub bot_id: BotId,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub transitions: usize,
}

/// Path segments arrive as strings so a non-integer id becomes an
/// envelope error rather than axum's plain-text rejection.
fn parse_bot_id(raw: &str) -> Result<BotId, AppError> {
    raw.parse::<BotId>()
        .map_err(|_| TrialError::InvalidBotId(raw.to_string()).into())
}

fn trial_link(bot_id: BotId) -> String {
    format!("/api/v1/trials/{bot_id}")
}

/// GET /api/v1/trials - List every trial.
pub async fn list_trials(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TrialActivation>>>, AppError> {
    let start = Instant::now();
    let trials = state.tracker.list().await;

    Ok(Json(
        ApiResponse::timed(trials, start).with_link("self", "/api/v1/trials"),
    ))
}

/// POST /api/v1/trials - Start or restart a trial.
pub async fn activate_trial(
    State(state): State<AppState>,
    body: Result<Json<ActivateTrialRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TrialActivation>>, AppError> {
    let start = Instant::now();
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let bot_id = BotId(body.bot_id);
    let record = state.tracker.activate(bot_id, body.bot_name).await;
    tracing::debug!(bot_id = %bot_id, "Activation requested over HTTP");

    Ok(Json(
        ApiResponse::timed(record, start).with_link("self", trial_link(bot_id)),
    ))
}

/// GET /api/v1/trials/{botId} - One bot's trial.
pub async fn get_trial(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<TrialActivation>>, AppError> {
    let start = Instant::now();
    let bot_id = parse_bot_id(&raw_id)?;

    let record = state
        .tracker
        .get_status(bot_id)
        .await
        .ok_or(TrialError::NotFound(bot_id.0))?;

    Ok(Json(
        ApiResponse::timed(record, start)
            .with_link("self", trial_link(bot_id))
            .with_link("active", format!("{}/active", trial_link(bot_id))),
    ))
}

/// GET /api/v1/trials/{botId}/active - Cached active check.
pub async fn is_trial_active(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<ActiveResponse>>, AppError> {
    let start = Instant::now();
    let bot_id = parse_bot_id(&raw_id)?;
    let active = state.tracker.is_active(bot_id).await;

    Ok(Json(ApiResponse::timed(ActiveResponse { bot_id, active }, start)))
}

/// DELETE /api/v1/trials/{botId} - Remove a trial record.
pub async fn deactivate_trial(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<RemovedResponse>>, AppError> {
    let start = Instant::now();
    let bot_id = parse_bot_id(&raw_id)?;
    let removed = state.tracker.deactivate(bot_id).await;

    Ok(Json(ApiResponse::timed(RemovedResponse { bot_id, removed }, start)))
}

/// POST /api/v1/trials/sweep - Recompute statuses now.
pub async fn sweep_trials(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SweepResponse>>, AppError> {
    let start = Instant::now();
    let transitions = state.tracker.sweep().await;

    Ok(Json(ApiResponse::timed(SweepResponse { transitions }, start)))
}
