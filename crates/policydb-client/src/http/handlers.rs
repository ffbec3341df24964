//! Query handlers. Batch endpoints always answer 200 with a possibly partial
//! result; only the single-rule lookup maps store errors to error statuses.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use policydb_core::{ChargingKey, PolicyRule};

use super::ApiError;
use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargingKeysReq {
    #[serde(default)]
    pub static_ids: Vec<String>,
    #[serde(default)]
    pub dynamic_rules: Vec<PolicyRule>,
}

#[derive(Debug, Serialize)]
pub struct ChargingKeysResp {
    pub keys: Vec<ChargingKey>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandReq {
    #[serde(default)]
    pub base_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpandResp {
    pub rule_ids: Vec<String>,
}

pub async fn get_rule(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PolicyRule>, ApiError> {
    let rule = state.client().resolve_rule(&id)?;
    Ok(Json(rule))
}

pub async fn charging_keys(
    State(state): State<AppState>,
    body: Result<Json<ChargingKeysReq>, JsonRejection>,
) -> Result<Json<ChargingKeysResp>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let keys = state
        .client()
        .derive_charging_keys(&req.static_ids, &req.dynamic_rules);
    Ok(Json(ChargingKeysResp { keys }))
}

pub async fn expand_base_names(
    State(state): State<AppState>,
    body: Result<Json<ExpandReq>, JsonRejection>,
) -> Result<Json<ExpandResp>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let rule_ids = state.client().expand_base_names(&req.base_names);
    Ok(Json(ExpandResp { rule_ids }))
}

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics().render()
}

pub async fn healthz() -> &'static str {
    "ok"
}
