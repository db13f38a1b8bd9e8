//! Route configuration for the payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_payment, list_payment_services, payment_notify, query_payment, PaymentAppState,
};

/// Creates the payment router.
///
/// Routes:
/// - `POST /api/payment/create` - Create a prepaid order
/// - `POST /api/payment/query?out_trade_no=` - Query an order
/// - `POST /api/payment/notify` - Gateway callback (signature verified)
/// - `GET /api/payment/services` - Paid service list
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .route("/api/payment/create", post(create_payment))
        .route("/api/payment/query", post(query_payment))
        .route("/api/payment/notify", post(payment_notify))
        .route("/api/payment/services", get(list_payment_services))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::wechat::MockPaymentProvider;
    use crate::domain::agents::{AgentCatalog, AgentKind};
    use crate::ports::OrderStatus;

    fn app(provider: &MockPaymentProvider, paid: &[AgentKind]) -> Router {
        let catalog = Arc::new(AgentCatalog::with_monetization(paid, 990));
        payment_router().with_state(PaymentAppState::new(Arc::new(provider.clone()), catalog))
    }

    async fn send(app: Router, request: Request<Body>) -> Value {
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_pay_params() {
        let provider = MockPaymentProvider::new();

        let body = send(
            app(&provider, &[AgentKind::ReportInterpretation]),
            post_json(
                "/api/payment/create",
                json!({"service_type": "report", "openid": "openid_abcdefgh"}),
            ),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "支付订单创建成功");
        assert!(body["data"]["out_trade_no"].as_str().unwrap().ends_with("abcdefgh"));
        assert!(body["data"]["pay_params"]["package"]
            .as_str()
            .unwrap()
            .starts_with("prepay_id="));
    }

    #[tokio::test]
    async fn create_for_free_service_fails() {
        let provider = MockPaymentProvider::new();

        let body = send(
            app(&provider, &[]),
            post_json(
                "/api/payment/create",
                json!({"service_type": "education", "openid": "o1"}),
            ),
        )
        .await;

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "该服务不需要支付");
    }

    #[tokio::test]
    async fn query_reads_order_state() {
        let provider = MockPaymentProvider::new();
        provider.set_order_status(
            "report_1_abc",
            OrderStatus {
                trade_state: Some("SUCCESS".to_string()),
                transaction_id: Some("42000".to_string()),
                total_fee: Some(990),
            },
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/payment/query?out_trade_no=report_1_abc")
            .body(Body::empty())
            .unwrap();
        let body = send(app(&provider, &[]), request).await;

        assert_eq!(body["message"], "查询成功");
        assert_eq!(body["data"]["trade_state"], "SUCCESS");
        assert_eq!(body["data"]["total_fee"], 990);
    }

    #[tokio::test]
    async fn notify_acknowledges_verified_callback() {
        let provider = MockPaymentProvider::new();

        let body = send(
            app(&provider, &[]),
            post_json(
                "/api/payment/notify",
                json!({"xml_data": "<xml><result_code>SUCCESS</result_code></xml>"}),
            ),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "支付回调处理成功");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn notify_rejects_bad_signature() {
        let provider = MockPaymentProvider::rejecting_callbacks();

        let body = send(
            app(&provider, &[]),
            post_json("/api/payment/notify", json!({"xml_data": "<xml></xml>"})),
        )
        .await;

        assert_eq!(body["message"], "签名验证失败");
    }

    #[tokio::test]
    async fn services_lists_paid_agents() {
        let provider = MockPaymentProvider::new();
        let request = Request::builder()
            .uri("/api/payment/services")
            .body(Body::empty())
            .unwrap();

        let body = send(app(&provider, &[AgentKind::Medication]), request).await;

        assert_eq!(body["message"], "获取付费服务列表成功");
        assert_eq!(body["data"]["medication"]["price"], 9.9);
        assert_eq!(body["data"]["medication"]["agent"], "medication");
    }
}
