//! HandlePaymentNotifyHandler - accepts the gateway's payment callback.

use std::sync::Arc;

use super::PaymentFlowError;
use crate::ports::{CallbackVerification, PaymentProvider};

/// Command carrying the raw callback body.
#[derive(Debug, Clone)]
pub struct HandlePaymentNotifyCommand {
    pub xml_data: String,
}

/// Handler for payment callbacks.
///
/// A callback whose signature does not verify is rejected; a verified one is
/// acknowledged. Nothing is persisted.
pub struct HandlePaymentNotifyHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl HandlePaymentNotifyHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentNotifyCommand,
    ) -> Result<CallbackVerification, PaymentFlowError> {
        let verification = self.provider.verify_callback(&cmd.xml_data).await?;
        if !verification.verified {
            tracing::warn!("payment callback signature mismatch");
            return Err(PaymentFlowError::SignatureInvalid);
        }

        tracing::info!(
            out_trade_no = ?verification.out_trade_no,
            transaction_id = ?verification.transaction_id,
            trade_state = ?verification.trade_state,
            "payment callback accepted"
        );
        Ok(verification)
    }
}
