//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Deterministic order creation
//! - Pre-configured order states
//! - Error injection
//! - Call tracking
//! - Callback verification that accepts or rejects everything

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::xml::from_xml;
use crate::domain::payment::order_number;
use crate::ports::{
    CallbackVerification, CreateOrderRequest, CreatedOrder, OrderStatus, PayParams, PaymentError,
    PaymentProvider,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_order_status("report_1_abc", OrderStatus { trade_state: Some("SUCCESS".into()), ..Default::default() });
///
/// let status = mock.query_order("report_1_abc").await?;
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Known orders by merchant order number.
    orders: HashMap<String, OrderStatus>,
    /// Error to return on next call.
    next_error: Option<PaymentError>,
    /// Whether callbacks verify.
    reject_callbacks: bool,
    /// Method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: &'static str,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every callback verification.
    pub fn rejecting_callbacks() -> Self {
        let mock = Self::new();
        mock.state().reject_callbacks = true;
        mock
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers the state returned for `out_trade_no`.
    pub fn set_order_status(&self, out_trade_no: impl Into<String>, status: OrderStatus) {
        self.state().orders.insert(out_trade_no.into(), status);
    }

    /// Makes the next call fail with `error`.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().call_log.len()
    }

    fn record(&self, method: &'static str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall { method, args });
        match state.next_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder, PaymentError> {
        self.record(
            "create_order",
            vec![request.openid.clone(), request.service.to_string()],
        )?;

        let out_trade_no = order_number(request.service, &request.openid, Utc::now());
        let prepay_id = format!("mock_prepay_{}", out_trade_no);
        self.state().orders.insert(
            out_trade_no.clone(),
            OrderStatus {
                trade_state: Some("NOTPAY".to_string()),
                transaction_id: None,
                total_fee: None,
            },
        );

        Ok(CreatedOrder {
            pay_params: PayParams {
                app_id: "mock_app".to_string(),
                time_stamp: Utc::now().timestamp().to_string(),
                nonce_str: "mocknonce".to_string(),
                package: format!("prepay_id={}", prepay_id),
                sign_type: "MD5".to_string(),
                pay_sign: "MOCKSIGN".to_string(),
            },
            out_trade_no,
            prepay_id,
        })
    }

    async fn query_order(&self, out_trade_no: &str) -> Result<OrderStatus, PaymentError> {
        self.record("query_order", vec![out_trade_no.to_string()])?;
        self.state()
            .orders
            .get(out_trade_no)
            .cloned()
            .ok_or_else(|| PaymentError::rejected("订单不存在"))
    }

    async fn verify_callback(
        &self,
        raw_payload: &str,
    ) -> Result<CallbackVerification, PaymentError> {
        self.record("verify_callback", vec![raw_payload.to_string()])?;
        if self.state().reject_callbacks {
            return Ok(CallbackVerification::default());
        }

        let payload = from_xml(raw_payload)?;
        Ok(CallbackVerification {
            verified: true,
            out_trade_no: payload.get("out_trade_no").cloned(),
            transaction_id: payload.get("transaction_id").cloned(),
            total_fee: payload.get("total_fee").and_then(|fee| fee.parse().ok()),
            trade_state: payload.get("result_code").cloned(),
        })
    }
}
