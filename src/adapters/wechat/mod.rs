//! WeChat Pay payment provider adapter.
//!
//! Implements the `PaymentProvider` port for the WeChat Pay v2 XML API:
//! - Unified order creation for mini-program (JSAPI) payments
//! - Order status queries
//! - Payment callback signature verification
//!
//! # Security
//!
//! - Requests are signed with MD5 or HMAC-SHA256 over the sorted parameters
//! - Callback signatures are compared in constant time
//! - The merchant api key is handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Environment variables (see `config::PaymentConfig`):
//! - `MEDAGENT__PAYMENT__APP_ID`, `MEDAGENT__PAYMENT__MCH_ID`
//! - `MEDAGENT__PAYMENT__API_KEY`, `MEDAGENT__PAYMENT__NOTIFY_URL`

mod mock_payment_provider;
mod signature;
mod wechat_pay_adapter;
mod xml;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use signature::{nonce_str, sign, signing_string, verify, Params, SignType, NONCE_LEN};
pub use wechat_pay_adapter::{WeChatPayAdapter, WeChatPayConfig, DEFAULT_API_BASE_URL};
pub use xml::{from_xml, to_xml};
