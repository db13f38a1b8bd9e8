//! HTTP handlers for the system endpoints.

use axum::extract::{Json, State};

use crate::domain::agents::AgentRegistry;
use crate::domain::foundation::Envelope;

use super::dto::{ConfigResponse, HealthResponse, ModelsResponse, ServiceInfoResponse};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "医疗智能体后端系统";

/// Shared state for the system endpoints.
#[derive(Clone)]
pub struct SystemAppState {
    pub registry: AgentRegistry,
}

impl SystemAppState {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }
}

/// GET / - Service banner
pub async fn root() -> Json<Envelope> {
    let info = ServiceInfoResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(Envelope::success_with_message(to_value(&info), "服务运行正常"))
}

/// GET /api/health - Liveness probe
pub async fn health() -> Json<Envelope> {
    let status = HealthResponse { status: "healthy" };
    Json(Envelope::success_with_message(to_value(&status), "服务健康"))
}

/// GET /api/config - Registered agents and configured models
pub async fn config(State(state): State<SystemAppState>) -> Json<Envelope> {
    let info = state.registry.gateway_info();
    let response = ConfigResponse {
        agents: state.registry.names(),
        models: ModelsResponse {
            text_model: info.text_model,
            vision_model: info.vision_model,
        },
    };
    Json(Envelope::success(to_value(&response)))
}

fn to_value<T: serde::Serialize>(data: &T) -> serde_json::Value {
    // Plain structs of strings always serialize.
    serde_json::to_value(data).unwrap_or_default()
}
