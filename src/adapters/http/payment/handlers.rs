//! HTTP handlers for the payment endpoints.
//!
//! Payment handlers return typed results; this layer wraps them in an
//! [`Envelope`] with the endpoint's success message, or a failure envelope
//! carrying the error's message.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use serde::Serialize;

use crate::application::handlers::payment::{
    CreatePaymentOrderCommand, CreatePaymentOrderHandler, HandlePaymentNotifyCommand,
    HandlePaymentNotifyHandler, ListPaidServicesHandler, ListPaidServicesQuery,
    PaymentFlowError, QueryPaymentOrderHandler, QueryPaymentOrderQuery,
};
use crate::domain::agents::AgentCatalog;
use crate::domain::foundation::Envelope;
use crate::ports::PaymentProvider;

use super::dto::{CreatePaymentRequest, PaymentNotifyRequest, QueryPaymentParams};

/// Shared state for the payment endpoints.
#[derive(Clone)]
pub struct PaymentAppState {
    pub provider: Arc<dyn PaymentProvider>,
    pub catalog: Arc<AgentCatalog>,
}

impl PaymentAppState {
    pub fn new(provider: Arc<dyn PaymentProvider>, catalog: Arc<AgentCatalog>) -> Self {
        Self { provider, catalog }
    }

    pub fn create_order_handler(&self) -> CreatePaymentOrderHandler {
        CreatePaymentOrderHandler::new(self.provider.clone(), self.catalog.clone())
    }

    pub fn query_order_handler(&self) -> QueryPaymentOrderHandler {
        QueryPaymentOrderHandler::new(self.provider.clone())
    }

    pub fn notify_handler(&self) -> HandlePaymentNotifyHandler {
        HandlePaymentNotifyHandler::new(self.provider.clone())
    }

    pub fn list_services_handler(&self) -> ListPaidServicesHandler {
        ListPaidServicesHandler::new(self.catalog.clone())
    }
}

fn respond<T: Serialize>(result: Result<T, PaymentFlowError>, message: &str) -> Json<Envelope> {
    let envelope = match result {
        Ok(data) => match serde_json::to_value(data) {
            Ok(value) => Envelope::success_with_message(value, message),
            Err(err) => Envelope::failure(format!("响应序列化失败: {}", err)),
        },
        Err(err) => Envelope::failure(err.to_string()),
    };
    Json(envelope)
}

/// POST /api/payment/create - Create a prepaid order
pub async fn create_payment(
    State(state): State<PaymentAppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Json<Envelope> {
    let cmd = CreatePaymentOrderCommand {
        service_type: request.service_type,
        openid: request.openid,
    };
    respond(state.create_order_handler().handle(cmd).await, "支付订单创建成功")
}

/// POST /api/payment/query - Query an order's state
pub async fn query_payment(
    State(state): State<PaymentAppState>,
    Query(params): Query<QueryPaymentParams>,
) -> Json<Envelope> {
    let query = QueryPaymentOrderQuery {
        out_trade_no: params.out_trade_no,
    };
    respond(state.query_order_handler().handle(query).await, "查询成功")
}

/// POST /api/payment/notify - Gateway payment callback
pub async fn payment_notify(
    State(state): State<PaymentAppState>,
    Json(request): Json<PaymentNotifyRequest>,
) -> Json<Envelope> {
    let cmd = HandlePaymentNotifyCommand {
        xml_data: request.xml_data,
    };
    match state.notify_handler().handle(cmd).await {
        Ok(_) => Json(Envelope::success_empty("支付回调处理成功")),
        Err(err) => Json(Envelope::failure(err.to_string())),
    }
}

/// GET /api/payment/services - Paid service list
pub async fn list_payment_services(State(state): State<PaymentAppState>) -> Json<Envelope> {
    let services = state.list_services_handler().handle(ListPaidServicesQuery);
    respond(Ok::<_, PaymentFlowError>(services), "获取付费服务列表成功")
}
