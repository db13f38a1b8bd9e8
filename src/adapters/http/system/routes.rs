//! Route configuration for the system endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{config, health, root, SystemAppState};

/// Creates the system router.
///
/// Routes:
/// - `GET /` - Service banner
/// - `GET /api/health` - Liveness probe
/// - `GET /api/config` - Agents and models (debugging aid)
pub fn system_router() -> Router<SystemAppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/config", get(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::ai::MockGateway;
    use crate::domain::agents::{AgentCatalog, AgentRegistry};
    use crate::ports::GatewayInfo;

    fn app() -> Router {
        let gateway = MockGateway::new()
            .with_gateway_info(GatewayInfo::new("mock", "qwen3-max", "qwen3-vl-plus"));
        let registry = AgentRegistry::new(Arc::new(gateway), Arc::new(AgentCatalog::new()));
        system_router().with_state(SystemAppState::new(registry))
    }

    async fn get_json(uri: &str) -> Value {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_service() {
        let body = get_json("/").await;
        assert_eq!(body["message"], "服务运行正常");
        assert_eq!(body["data"]["service"], "医疗智能体后端系统");
    }

    #[tokio::test]
    async fn health_is_healthy() {
        let body = get_json("/api/health").await;
        assert_eq!(body["data"], json!({"status": "healthy"}));
        assert_eq!(body["message"], "服务健康");
    }

    #[tokio::test]
    async fn config_lists_agents_and_models() {
        let body = get_json("/api/config").await;

        assert_eq!(body["data"]["agents"].as_array().unwrap().len(), 9);
        assert_eq!(body["data"]["agents"][0], "intent_recognition");
        assert_eq!(body["data"]["models"]["text_model"], "qwen3-max");
        assert_eq!(body["data"]["models"]["vision_model"], "qwen3-vl-plus");
    }
}
