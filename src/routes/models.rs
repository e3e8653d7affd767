use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::models::customization::Angle;
use crate::services::catalog::ModelSummary;
use crate::services::provider::{self, ProbeReport};

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelSummary>,
}

/// GET /api/v1/models — unique models available for selection.
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.generator.catalog().available_models(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ProbeParams {
    #[serde(default = "default_pose")]
    pub pose: String,
    #[serde(default = "default_skin_tone")]
    pub skin_tone: String,
    #[serde(default = "default_body_type")]
    pub body_type: String,
    #[serde(default = "default_angle")]
    pub angle: Angle,
}

fn default_pose() -> String {
    "standing".to_string()
}

fn default_skin_tone() -> String {
    "medium".to_string()
}

fn default_body_type() -> String {
    "athletic-spanish".to_string()
}

fn default_angle() -> Angle {
    Angle::Front
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub pose: String,
    pub skin_tone: String,
    pub body_type: String,
    pub angle: Angle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// GET /api/v1/models/probe — resolve a customization tuple and check that
/// the reference image answers a bounded HEAD request. Diagnostic only.
pub async fn probe_model(
    State(state): State<AppState>,
    Query(params): Query<ProbeParams>,
) -> Json<ProbeResponse> {
    let resolved = state.generator.catalog().resolve(
        &params.pose,
        &params.skin_tone,
        &params.body_type,
        params.angle,
    );

    let (probe, error) = match resolved {
        Some(url) => {
            let report = provider::probe_reference(&state.http, &url, state.probe_timeout).await;
            (Some(report), None)
        }
        None => (None, Some("no model image configured")),
    };

    Json(ProbeResponse {
        pose: params.pose,
        skin_tone: params.skin_tone,
        body_type: params.body_type,
        angle: params.angle,
        probe,
        error,
    })
}
