//! Integration tests for the payment flow.
//!
//! These tests cover the monetization switch end to end:
//! 1. Paid service listing follows the catalog
//! 2. Gated consultations answer 402 until payment is verified
//! 3. Orders and callbacks go through the payment provider port
//! 4. WeChat Pay signing as seen by a callback round trip

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use serde_json::{json, Value};
use tower::ServiceExt;

use medagent::adapters::ai::MockGateway;
use medagent::adapters::document::ReportTextExtractor;
use medagent::adapters::http::{
    app_router, AppStates, HttpSettings, MedicalAppState, PaymentAppState, SystemAppState,
};
use medagent::adapters::image::JpegNormalizer;
use medagent::adapters::wechat::{
    sign, to_xml, verify, MockPaymentProvider, Params, SignType, WeChatPayAdapter,
    WeChatPayConfig,
};
use medagent::domain::agents::{AgentCatalog, AgentKind, AgentRegistry};
use medagent::ports::PaymentProvider;

const API_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

fn app(gateway: &MockGateway, provider: &MockPaymentProvider, paid: &[AgentKind]) -> axum::Router {
    let catalog = Arc::new(AgentCatalog::with_monetization(paid, 990));
    let registry = AgentRegistry::new(Arc::new(gateway.clone()), Arc::clone(&catalog));
    let states = AppStates {
        medical: MedicalAppState::new(
            registry.clone(),
            Arc::new(ReportTextExtractor::new()),
            Arc::new(JpegNormalizer::default()),
            10 * 1024 * 1024,
        ),
        payment: PaymentAppState::new(Arc::new(provider.clone()), catalog),
        system: SystemAppState::new(registry),
    };
    app_router(states, &HttpSettings::default())
}

async fn call(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> Value {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn free_deployment_lists_no_services_and_never_gates() {
    let gateway = MockGateway::new().with_response("每天刷牙两次");
    let provider = MockPaymentProvider::new();

    let services = call(app(&gateway, &provider, &[]), "GET", "/api/payment/services", None).await;
    assert_eq!(services["data"], json!({}));

    let answer = call(
        app(&gateway, &provider, &[]),
        "POST",
        "/api/health-education",
        Some(json!({"question": "怎么保护牙齿"})),
    )
    .await;
    assert_eq!(answer["data"]["education_result"], "每天刷牙两次");
}

#[tokio::test]
async fn monetized_flow_from_order_to_verified_consultation() {
    let gateway = MockGateway::new().with_response("避免抓挠");
    let provider = MockPaymentProvider::new();
    let paid = [AgentKind::HealthEducation];

    let services = call(app(&gateway, &provider, &paid), "GET", "/api/payment/services", None).await;
    assert_eq!(services["data"]["education"]["price_fen"], 990);

    let blocked = call(
        app(&gateway, &provider, &paid),
        "POST",
        "/api/health-education",
        Some(json!({"question": "湿疹注意什么"})),
    )
    .await;
    assert_eq!(blocked["code"], 402);
    assert_eq!(blocked["message"], "该服务需要支付，请先完成支付");
    assert_eq!(gateway.call_count(), 0);

    let order = call(
        app(&gateway, &provider, &paid),
        "POST",
        "/api/payment/create",
        Some(json!({"service_type": "education", "openid": "o_payer_0001"})),
    )
    .await;
    assert_eq!(order["success"], true);
    let out_trade_no = order["data"]["out_trade_no"].as_str().unwrap().to_string();

    let status = call(
        app(&gateway, &provider, &paid),
        "POST",
        &format!("/api/payment/query?out_trade_no={}", out_trade_no),
        None,
    )
    .await;
    assert_eq!(status["data"]["trade_state"], "NOTPAY");

    let answer = call(
        app(&gateway, &provider, &paid),
        "POST",
        "/api/health-education?payment_verified=true",
        Some(json!({"question": "湿疹注意什么"})),
    )
    .await;
    assert_eq!(answer["data"]["education_result"], "避免抓挠");
}

#[tokio::test]
async fn unknown_service_type_is_rejected() {
    let gateway = MockGateway::new();
    let provider = MockPaymentProvider::new();

    let body = call(
        app(&gateway, &provider, &[AgentKind::Dermatology]),
        "POST",
        "/api/payment/create",
        Some(json!({"service_type": "dermatology_plus", "openid": "o1"})),
    )
    .await;

    assert_eq!(body["message"], "不支持的服务类型");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn wechat_adapter_verifies_signed_callback() {
    let adapter = WeChatPayAdapter::new(WeChatPayConfig::new(
        "wxd930ea5d5a258f4f",
        "10000100",
        API_KEY,
        "https://example.com/api/payment/notify",
    ))
    .unwrap();

    let mut params: Params = [
        ("appid", "wxd930ea5d5a258f4f"),
        ("mch_id", "10000100"),
        ("out_trade_no", "report_1700000000_12345678"),
        ("result_code", "SUCCESS"),
        ("return_code", "SUCCESS"),
        ("total_fee", "990"),
        ("transaction_id", "4200000001"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let signature = sign(&params, API_KEY, SignType::Md5).unwrap();
    params.insert("sign".to_string(), signature);
    assert!(verify(&params, API_KEY, SignType::Md5).unwrap());

    let verification = adapter.verify_callback(&to_xml(&params)).await.unwrap();
    assert!(verification.verified);
    assert_eq!(verification.out_trade_no.as_deref(), Some("report_1700000000_12345678"));
    assert_eq!(verification.total_fee, Some(990));

    params.insert("total_fee".to_string(), "1".to_string());
    let tampered = adapter.verify_callback(&to_xml(&params)).await.unwrap();
    assert!(!tampered.verified);
}
