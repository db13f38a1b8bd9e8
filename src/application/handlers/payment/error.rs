//! Errors raised by the payment handlers.

use thiserror::Error;

use crate::domain::payment::{PaidService, UnknownServiceError};
use crate::ports::PaymentError;

/// Payment flow failures, displayed as the client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentFlowError {
    #[error("不支持的服务类型")]
    UnsupportedService(#[from] UnknownServiceError),

    #[error("该服务不需要支付")]
    NotMonetized(PaidService),

    #[error("签名验证失败")]
    SignatureInvalid,

    #[error(transparent)]
    Provider(#[from] PaymentError),
}
