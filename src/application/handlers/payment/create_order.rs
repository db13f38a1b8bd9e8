//! CreatePaymentOrderHandler - opens a prepaid order for a monetized service.

use std::sync::Arc;

use super::PaymentFlowError;
use crate::domain::agents::AgentCatalog;
use crate::domain::payment::PaidService;
use crate::ports::{CreateOrderRequest, CreatedOrder, PaymentProvider};

/// Command to create a payment order.
#[derive(Debug, Clone)]
pub struct CreatePaymentOrderCommand {
    /// Paid service name (`report`, `medication`, `education`, `dermatology`).
    pub service_type: String,
    /// Payer's mini-program openid.
    pub openid: String,
}

/// Handler for creating payment orders.
///
/// Only services whose agent is monetized in the catalog can be bought.
pub struct CreatePaymentOrderHandler {
    provider: Arc<dyn PaymentProvider>,
    catalog: Arc<AgentCatalog>,
}

impl CreatePaymentOrderHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, catalog: Arc<AgentCatalog>) -> Self {
        Self { provider, catalog }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentOrderCommand,
    ) -> Result<CreatedOrder, PaymentFlowError> {
        let service: PaidService = cmd.service_type.parse()?;
        if !self.catalog.requires_payment(service.agent_kind()) {
            return Err(PaymentFlowError::NotMonetized(service));
        }

        let order = self
            .provider
            .create_order(CreateOrderRequest {
                openid: cmd.openid,
                service,
                description: service.description().to_string(),
            })
            .await
            .map_err(|err| {
                tracing::warn!(%service, error = %err, "payment order creation failed");
                err
            })?;

        tracing::info!(%service, out_trade_no = %order.out_trade_no, "payment order created");
        Ok(order)
    }
}
