//! HTTP DTOs for the system endpoints.

use serde::Serialize;

/// Payload of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
}

/// Payload of `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Models used by the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub text_model: String,
    pub vision_model: String,
}

/// Payload of `GET /api/config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub agents: Vec<&'static str>,
    pub models: ModelsResponse,
}
