//! HTTP DTOs for the payment endpoints.

use serde::Deserialize;

/// Body of `POST /api/payment/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    /// Paid service type (`report`, `medication`, `education`, `dermatology`).
    pub service_type: String,
    /// Payer's mini-program openid.
    pub openid: String,
}

/// Query string of `POST /api/payment/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPaymentParams {
    pub out_trade_no: String,
}

/// Body of `POST /api/payment/notify`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotifyRequest {
    /// Raw callback XML as received from the gateway.
    pub xml_data: String,
}
