use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub provider: ComponentHealth,
    pub storage: ComponentHealth,
    pub catalog_entries: usize,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: String,
}

/// GET /health — component status. Demo mode is a valid configuration, so
/// this always answers 200; clients read the provider status to learn
/// whether generation is live.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = ComponentHealth {
        status: if state.generator.demo_mode() {
            "demo".to_string()
        } else {
            "live".to_string()
        },
    };

    let storage = ComponentHealth {
        status: if state.store_configured {
            "configured".to_string()
        } else {
            "disabled".to_string()
        },
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            provider,
            storage,
            catalog_entries: state.generator.catalog().len(),
        },
    })
}
