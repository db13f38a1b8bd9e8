//! Route configuration for the medical endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{
    dermatology_consultation, health_education, medical_chat, medication_consultation,
    report_interpretation, MedicalAppState,
};

/// Creates the medical router.
///
/// Routes:
/// - `POST /api/medical-chat` - Intent routing chat
/// - `POST /api/report-interpretation` - Report upload (multipart `file`)
/// - `POST /api/health-education` - Health education question
/// - `POST /api/dermatology-consultation` - Skin photo (multipart `file`, `symptoms`)
/// - `POST /api/medication-consultation` - Medication question
///
/// The consultation endpoints accept `?payment_verified=true`.
pub fn medical_router() -> Router<MedicalAppState> {
    Router::new()
        .route("/api/medical-chat", post(medical_chat))
        .route("/api/report-interpretation", post(report_interpretation))
        .route("/api/health-education", post(health_education))
        .route("/api/dermatology-consultation", post(dermatology_consultation))
        .route("/api/medication-consultation", post(medication_consultation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::ai::MockGateway;
    use crate::adapters::document::ReportTextExtractor;
    use crate::adapters::image::JpegNormalizer;
    use crate::domain::agents::{AgentCatalog, AgentKind, AgentRegistry};

    const BOUNDARY: &str = "medagent-test-boundary";

    fn app(gateway: &MockGateway, catalog: AgentCatalog) -> Router {
        let registry = AgentRegistry::new(Arc::new(gateway.clone()), Arc::new(catalog));
        let state = MedicalAppState::new(
            registry,
            Arc::new(ReportTextExtractor::new()),
            Arc::new(JpegNormalizer::default()),
            10 * 1024 * 1024,
        );
        medical_router().with_state(state)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(uri: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn envelope(app: Router, request: Request<Body>) -> Value {
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn chat_endpoint_returns_router_payload() {
        let gateway = MockGateway::new()
            .with_response(r#"{"非医疗意图":""}"#)
            .with_response("你好");

        let body = envelope(
            app(&gateway, AgentCatalog::new()),
            json_request("/api/medical-chat", json!({"message": "你好"})),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["code"], 200);
        assert_eq!(body["data"]["agent_type"], "闲聊智能体");
    }

    #[tokio::test]
    async fn blank_chat_is_a_failure_envelope() {
        let gateway = MockGateway::new();

        let body = envelope(
            app(&gateway, AgentCatalog::new()),
            json_request("/api/medical-chat", json!({"message": "  "})),
        )
        .await;

        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 400);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn question_without_field_is_a_failure_envelope() {
        let gateway = MockGateway::new();

        let body = envelope(
            app(&gateway, AgentCatalog::new()),
            json_request("/api/health-education", json!({})),
        )
        .await;

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "请输入有效的问题");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn gated_question_reports_402_until_verified() {
        let gateway = MockGateway::new().with_response("注意剂量");
        let catalog = AgentCatalog::with_monetization(&[AgentKind::Medication], 990);
        let app = app(&gateway, catalog);

        let blocked = envelope(
            app.clone(),
            json_request("/api/medication-consultation", json!({"question": "阿司匹林"})),
        )
        .await;
        assert_eq!(blocked["code"], 402);

        let paid = envelope(
            app,
            json_request(
                "/api/medication-consultation?payment_verified=true",
                json!({"question": "阿司匹林"}),
            ),
        )
        .await;
        assert_eq!(paid["data"]["medication_result"], "注意剂量");
    }

    #[tokio::test]
    async fn report_upload_is_interpreted() {
        let gateway = MockGateway::new().with_response("指标正常");

        let body = envelope(
            app(&gateway, AgentCatalog::new()),
            multipart_request("/api/report-interpretation", "lab.txt", "血糖 5.1".as_bytes()),
        )
        .await;

        assert_eq!(body["data"]["interpretation_result"], "指标正常");
        assert_eq!(
            gateway.text_calls()[0].messages[1].content,
            "请解读以下医学报告：\n\n血糖 5.1"
        );
    }

    #[tokio::test]
    async fn wrong_image_type_is_rejected() {
        let gateway = MockGateway::new();

        let body = envelope(
            app(&gateway, AgentCatalog::new()),
            multipart_request("/api/dermatology-consultation", "arm.txt", b"text"),
        )
        .await;

        assert_eq!(body["message"], "不支持的图片格式，请上传JPG、PNG等图片文件");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn health_education_answers_question() {
        let gateway = MockGateway::new().with_response("规律作息");

        let body = envelope(
            app(&gateway, AgentCatalog::new()),
            json_request("/api/health-education", json!({"question": "失眠怎么办"})),
        )
        .await;

        assert_eq!(body["data"]["education_result"], "规律作息");
    }
}
