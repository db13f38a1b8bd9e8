//! WeChat Pay (v2 XML API) payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the mini-program JSAPI flow:
//! unified order creation, order query, and callback signature verification.
//!
//! # Security
//!
//! - Every request is signed (MD5 or HMAC-SHA256) with the merchant api key
//! - Callback signatures are compared in constant time
//! - The api key is held in `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = WeChatPayConfig::new(app_id, mch_id, api_key, notify_url)
//!     .with_sign_type(SignType::HmacSha256);
//! let adapter = WeChatPayAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use super::signature::{self, nonce_str, Params, SignType, SIGN_FIELD};
use super::xml::{from_xml, to_xml};
use crate::domain::agents::DEFAULT_PRICE_FEN;
use crate::domain::payment::order_number;
use crate::ports::{
    CallbackVerification, CreateOrderRequest, CreatedOrder, OrderStatus, PayParams, PaymentError,
    PaymentProvider,
};

/// Production API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mch.weixin.qq.com";

const UNIFIED_ORDER_PATH: &str = "/pay/unifiedorder";
const ORDER_QUERY_PATH: &str = "/pay/orderquery";
const SUCCESS: &str = "SUCCESS";

/// WeChat Pay merchant configuration.
#[derive(Clone)]
pub struct WeChatPayConfig {
    app_id: String,
    mch_id: String,
    api_key: SecretString,
    notify_url: String,
    api_base_url: String,
    sign_type: SignType,
    /// Amount charged per order, in fen.
    price_fen: u32,
    /// Reported client IP for server-initiated orders.
    client_ip: String,
    timeout: Duration,
}

impl WeChatPayConfig {
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        api_key: impl Into<String>,
        notify_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            api_key: SecretString::new(api_key.into()),
            notify_url: notify_url.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            sign_type: SignType::Md5,
            price_fen: DEFAULT_PRICE_FEN,
            client_ip: "127.0.0.1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    pub fn with_price_fen(mut self, price_fen: u32) -> Self {
        self.price_fen = price_fen;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// WeChat Pay provider adapter.
pub struct WeChatPayAdapter {
    config: WeChatPayConfig,
    http_client: reqwest::Client,
}

impl WeChatPayAdapter {
    pub fn new(config: WeChatPayConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn sign(&self, params: &Params) -> Result<String, PaymentError> {
        signature::sign(params, self.config.api_key(), self.config.sign_type)
    }

    /// Adds the merchant ids, a nonce, and the signature, then posts the
    /// XML payload and parses the XML reply.
    async fn call(&self, path: &str, mut params: Params) -> Result<Params, PaymentError> {
        params.insert("appid".to_string(), self.config.app_id.clone());
        params.insert("mch_id".to_string(), self.config.mch_id.clone());
        params.insert("nonce_str".to_string(), nonce_str());
        if self.config.sign_type != SignType::Md5 {
            params.insert("sign_type".to_string(), self.config.sign_type.to_string());
        }
        let sign = self.sign(&params)?;
        params.insert(SIGN_FIELD.to_string(), sign);

        let url = format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path);
        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/xml")
            .body(to_xml(&params))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, path, "payment gateway unreachable");
                PaymentError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), path, "payment gateway returned error status");
            return Err(PaymentError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;
        from_xml(&body)
    }

    /// Parameters for `wx.requestPayment`, signed with the merchant key.
    fn mini_program_params(&self, prepay_id: &str) -> Result<PayParams, PaymentError> {
        let mut params = Params::new();
        params.insert("appId".to_string(), self.config.app_id.clone());
        params.insert("timeStamp".to_string(), Utc::now().timestamp().to_string());
        params.insert("nonceStr".to_string(), nonce_str());
        params.insert("package".to_string(), format!("prepay_id={}", prepay_id));
        params.insert("signType".to_string(), self.config.sign_type.to_string());
        let pay_sign = self.sign(&params)?;

        let mut take = |key: &str| params.remove(key).unwrap_or_default();
        Ok(PayParams {
            app_id: take("appId"),
            time_stamp: take("timeStamp"),
            nonce_str: take("nonceStr"),
            package: take("package"),
            sign_type: take("signType"),
            pay_sign,
        })
    }
}

fn is_success(reply: &Params, key: &str) -> bool {
    reply.get(key).map(String::as_str) == Some(SUCCESS)
}

fn non_empty(reply: &Params, key: &str) -> Option<String> {
    reply.get(key).filter(|value| !value.is_empty()).cloned()
}

fn fee(reply: &Params) -> Option<u32> {
    reply.get("total_fee").and_then(|value| value.parse().ok())
}

#[async_trait]
impl PaymentProvider for WeChatPayAdapter {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder, PaymentError> {
        let out_trade_no = order_number(request.service, &request.openid, Utc::now());

        let mut params = Params::new();
        params.insert("body".to_string(), request.description);
        params.insert("out_trade_no".to_string(), out_trade_no.clone());
        params.insert("total_fee".to_string(), self.config.price_fen.to_string());
        params.insert("spbill_create_ip".to_string(), self.config.client_ip.clone());
        params.insert("notify_url".to_string(), self.config.notify_url.clone());
        params.insert("trade_type".to_string(), "JSAPI".to_string());
        params.insert("openid".to_string(), request.openid);

        let reply = self.call(UNIFIED_ORDER_PATH, params).await?;

        if !(is_success(&reply, "return_code") && is_success(&reply, "result_code")) {
            let message = non_empty(&reply, "err_code_des")
                .or_else(|| non_empty(&reply, "return_msg"))
                .unwrap_or_else(|| "支付订单创建失败".to_string());
            tracing::warn!(out_trade_no = %out_trade_no, message = %message, "unified order rejected");
            return Err(PaymentError::Rejected(message));
        }

        let prepay_id = non_empty(&reply, "prepay_id")
            .ok_or_else(|| PaymentError::protocol("missing prepay_id"))?;
        let pay_params = self.mini_program_params(&prepay_id)?;

        tracing::info!(out_trade_no = %out_trade_no, service = %request.service, "payment order created");
        Ok(CreatedOrder {
            out_trade_no,
            prepay_id,
            pay_params,
        })
    }

    async fn query_order(&self, out_trade_no: &str) -> Result<OrderStatus, PaymentError> {
        let mut params = Params::new();
        params.insert("out_trade_no".to_string(), out_trade_no.to_string());

        let reply = self.call(ORDER_QUERY_PATH, params).await?;

        if !is_success(&reply, "return_code") {
            let message = non_empty(&reply, "return_msg").unwrap_or_else(|| "查询失败".to_string());
            return Err(PaymentError::Rejected(message));
        }

        Ok(OrderStatus {
            trade_state: non_empty(&reply, "trade_state"),
            transaction_id: non_empty(&reply, "transaction_id"),
            total_fee: fee(&reply),
        })
    }

    async fn verify_callback(
        &self,
        raw_payload: &str,
    ) -> Result<CallbackVerification, PaymentError> {
        let payload = from_xml(raw_payload)?;
        let verified = signature::verify(&payload, self.config.api_key(), self.config.sign_type)?;

        if !verified {
            tracing::warn!(
                out_trade_no = ?payload.get("out_trade_no"),
                "payment callback signature mismatch"
            );
            return Ok(CallbackVerification::default());
        }

        Ok(CallbackVerification {
            verified: true,
            out_trade_no: non_empty(&payload, "out_trade_no"),
            transaction_id: non_empty(&payload, "transaction_id"),
            total_fee: fee(&payload),
            trade_state: non_empty(&payload, "trade_state")
                .or_else(|| non_empty(&payload, "result_code")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaidService;
    use axum::routing::post;
    use axum::Router;
    use std::sync::{Arc, Mutex};

    const API_KEY: &str = "0123456789abcdef0123456789abcdef";

    /// Serves `reply` on both gateway paths and records request bodies.
    async fn serve(reply: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = bodies.clone();
        let handler = move |body: String| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(body);
                reply
            }
        };
        let app = Router::new()
            .route(UNIFIED_ORDER_PATH, post(handler.clone()))
            .route(ORDER_QUERY_PATH, post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), bodies)
    }

    fn adapter(base_url: &str) -> WeChatPayAdapter {
        let config = WeChatPayConfig::new("wx_app", "1900000109", API_KEY, "https://example.test/notify")
            .with_base_url(base_url);
        WeChatPayAdapter::new(config).unwrap()
    }

    fn order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            openid: "oUpF8uMuAJO_M2pxb1Q9zNjWeS6o".to_string(),
            service: PaidService::Report,
            description: PaidService::Report.description().to_string(),
        }
    }

    #[tokio::test]
    async fn create_order_returns_signed_pay_params() {
        let (base_url, bodies) = serve(
            "<xml><return_code><![CDATA[SUCCESS]]></return_code><result_code><![CDATA[SUCCESS]]></result_code><prepay_id><![CDATA[wx_prepay_1]]></prepay_id></xml>",
        )
        .await;

        let order = adapter(&base_url).create_order(order_request()).await.unwrap();

        assert!(order.out_trade_no.starts_with("report_"));
        assert!(order.out_trade_no.ends_with("_zNjWeS6o"));
        assert_eq!(order.prepay_id, "wx_prepay_1");
        assert_eq!(order.pay_params.package, "prepay_id=wx_prepay_1");
        assert_eq!(order.pay_params.sign_type, "MD5");
        assert_eq!(order.pay_params.nonce_str.len(), 32);

        let mut signed = Params::new();
        signed.insert("appId".to_string(), order.pay_params.app_id.clone());
        signed.insert("timeStamp".to_string(), order.pay_params.time_stamp.clone());
        signed.insert("nonceStr".to_string(), order.pay_params.nonce_str.clone());
        signed.insert("package".to_string(), order.pay_params.package.clone());
        signed.insert("signType".to_string(), order.pay_params.sign_type.clone());
        assert_eq!(
            signature::sign(&signed, API_KEY, SignType::Md5).unwrap(),
            order.pay_params.pay_sign
        );

        let sent = from_xml(&bodies.lock().unwrap()[0]).unwrap();
        assert_eq!(sent["total_fee"], "990");
        assert_eq!(sent["trade_type"], "JSAPI");
        assert_eq!(sent["body"], "医学报告智能解读服务");
        assert!(signature::verify(&sent, API_KEY, SignType::Md5).unwrap());
    }

    #[tokio::test]
    async fn rejected_order_reports_gateway_message() {
        let (base_url, _) = serve(
            "<xml><return_code>SUCCESS</return_code><result_code>FAIL</result_code><err_code_des>商户号不存在</err_code_des></xml>",
        )
        .await;

        let err = adapter(&base_url).create_order(order_request()).await.unwrap_err();

        assert_eq!(err, PaymentError::rejected("商户号不存在"));
    }

    #[tokio::test]
    async fn query_order_reads_trade_state() {
        let (base_url, bodies) = serve(
            "<xml><return_code>SUCCESS</return_code><trade_state>SUCCESS</trade_state><transaction_id>4200001</transaction_id><total_fee>990</total_fee></xml>",
        )
        .await;

        let status = adapter(&base_url).query_order("report_1_abc").await.unwrap();

        assert_eq!(status.trade_state.as_deref(), Some("SUCCESS"));
        assert_eq!(status.transaction_id.as_deref(), Some("4200001"));
        assert_eq!(status.total_fee, Some(990));
        let sent = from_xml(&bodies.lock().unwrap()[0]).unwrap();
        assert_eq!(sent["out_trade_no"], "report_1_abc");
    }

    #[tokio::test]
    async fn query_failure_uses_return_msg() {
        let (base_url, _) = serve("<xml><return_code>FAIL</return_code><return_msg>签名错误</return_msg></xml>").await;

        let err = adapter(&base_url).query_order("x").await.unwrap_err();

        assert_eq!(err.to_string(), "签名错误");
    }

    #[tokio::test]
    async fn unreachable_gateway_is_network_error() {
        let err = adapter("http://127.0.0.1:1").query_order("x").await.unwrap_err();
        assert!(matches!(err, PaymentError::Network(_)));
    }

    #[tokio::test]
    async fn callback_with_valid_signature_is_verified() {
        let mut payload = Params::new();
        payload.insert("out_trade_no".to_string(), "report_1_abc".to_string());
        payload.insert("transaction_id".to_string(), "4200001".to_string());
        payload.insert("total_fee".to_string(), "990".to_string());
        payload.insert("result_code".to_string(), "SUCCESS".to_string());
        let sign = signature::sign(&payload, API_KEY, SignType::Md5).unwrap();
        payload.insert(SIGN_FIELD.to_string(), sign);

        let result = adapter(DEFAULT_API_BASE_URL)
            .verify_callback(&to_xml(&payload))
            .await
            .unwrap();

        assert!(result.verified);
        assert_eq!(result.out_trade_no.as_deref(), Some("report_1_abc"));
        assert_eq!(result.total_fee, Some(990));
        assert_eq!(result.trade_state.as_deref(), Some("SUCCESS"));
    }

    #[tokio::test]
    async fn callback_with_bad_signature_is_not_verified() {
        let result = adapter(DEFAULT_API_BASE_URL)
            .verify_callback("<xml><out_trade_no>x</out_trade_no><sign>FORGED</sign></xml>")
            .await
            .unwrap();

        assert!(!result.verified);
        assert!(result.out_trade_no.is_none());
    }

    #[tokio::test]
    async fn unreadable_callback_is_protocol_error() {
        let err = adapter(DEFAULT_API_BASE_URL)
            .verify_callback("plain text")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Protocol(_)));
    }
}
