//! Payment provider port for external payment processing.
//!
//! Defines the contract for the payment gateway used by monetized agents
//! (WeChat Pay in production). The core never mutates orders: it creates
//! them, queries them by id, and verifies gateway callbacks.
//!
//! # Design
//!
//! - **Gateway agnostic**: callers see order ids and states, not XML
//! - **Single attempt**: failures are reported, never retried here

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::payment::PaidService;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a prepaid order and returns the client-side payment parameters.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder, PaymentError>;

    /// Queries the state of an order by merchant order number.
    async fn query_order(&self, out_trade_no: &str) -> Result<OrderStatus, PaymentError>;

    /// Verifies the signature of a raw callback payload and extracts its fields.
    ///
    /// An invalid signature is reported as `verified: false`, not as an error;
    /// errors are reserved for payloads that cannot be read at all.
    async fn verify_callback(&self, raw_payload: &str)
        -> Result<CallbackVerification, PaymentError>;
}

/// Request to create an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    /// Payer's mini-program openid.
    pub openid: String,
    /// Service being purchased.
    pub service: PaidService,
    /// Order description shown to the payer.
    pub description: String,
}

/// A created order with everything the client needs to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    /// Merchant order number.
    pub out_trade_no: String,
    /// Gateway prepay id.
    pub prepay_id: String,
    /// Parameters passed verbatim to the mini-program payment API.
    pub pay_params: PayParams,
}

/// Mini-program payment parameters (field names fixed by the gateway).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayParams {
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(rename = "nonceStr")]
    pub nonce_str: String,
    pub package: String,
    #[serde(rename = "signType")]
    pub sign_type: String,
    #[serde(rename = "paySign")]
    pub pay_sign: String,
}

/// Order state as reported by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    /// Gateway trade state (`SUCCESS`, `NOTPAY`, `CLOSED`, ...).
    pub trade_state: Option<String>,
    /// Gateway transaction id, once paid.
    pub transaction_id: Option<String>,
    /// Amount in fen.
    pub total_fee: Option<u32>,
}

/// Result of checking a gateway callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackVerification {
    /// Whether the signature matched.
    pub verified: bool,
    pub out_trade_no: Option<String>,
    pub transaction_id: Option<String>,
    pub total_fee: Option<u32>,
    pub trade_state: Option<String>,
}

/// Payment provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Transport failure talking to the gateway.
    #[error("请求异常: {0}")]
    Network(String),

    /// Gateway answered with a non-success HTTP status.
    #[error("请求失败: {0}")]
    Status(u16),

    /// Gateway processed the request and refused it.
    #[error("{0}")]
    Rejected(String),

    /// Gateway payload could not be read.
    #[error("响应解析失败: {0}")]
    Protocol(String),

    /// Request could not be signed (bad key material).
    #[error("签名失败: {0}")]
    Signing(String),
}

impl PaymentError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
