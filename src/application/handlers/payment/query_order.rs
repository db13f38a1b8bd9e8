//! QueryPaymentOrderHandler - reads the gateway state of an order.

use std::sync::Arc;

use super::PaymentFlowError;
use crate::ports::{OrderStatus, PaymentProvider};

/// Query for one order by merchant order number.
#[derive(Debug, Clone)]
pub struct QueryPaymentOrderQuery {
    pub out_trade_no: String,
}

/// Handler for order status queries.
pub struct QueryPaymentOrderHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl QueryPaymentOrderHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        query: QueryPaymentOrderQuery,
    ) -> Result<OrderStatus, PaymentFlowError> {
        let status = self.provider.query_order(&query.out_trade_no).await?;
        tracing::debug!(
            out_trade_no = %query.out_trade_no,
            trade_state = ?status.trade_state,
            "payment order queried"
        );
        Ok(status)
    }
}
