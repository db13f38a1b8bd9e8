//! Uniform response envelope.
//!
//! Every externally observable result, success or failure, is wrapped in
//! exactly one [`Envelope`]. Callers branch on `success`, never on whether
//! `data` happens to be present.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default message attached to successful envelopes.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "成功";

/// Logical status code for a successful envelope.
pub const CODE_OK: u16 = 200;

/// Logical status code for a rejected or failed operation.
pub const CODE_BAD_REQUEST: u16 = 400;

/// Logical status code for a service that must be paid for first.
pub const CODE_PAYMENT_REQUIRED: u16 = 402;

/// Result wrapper returned by every public operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Logical status code (not the HTTP status).
    pub code: u16,
    /// Human-readable message.
    pub message: String,
    /// Payload; `null` on failure by convention.
    pub data: Option<Value>,
    /// Whether the operation succeeded.
    pub success: bool,
}

impl Envelope {
    /// Wraps a payload with the default success message.
    pub fn success(data: impl Into<Value>) -> Self {
        Self::success_with_message(data, DEFAULT_SUCCESS_MESSAGE)
    }

    /// Wraps a payload with a custom success message.
    pub fn success_with_message(data: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            code: CODE_OK,
            message: message.into(),
            data: Some(data.into()),
            success: true,
        }
    }

    /// A success with no payload (e.g. acknowledgements).
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: CODE_OK,
            message: message.into(),
            data: None,
            success: true,
        }
    }

    /// A failure with the default code.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::failure_with_code(message, CODE_BAD_REQUEST)
    }

    /// A failure with an explicit code.
    pub fn failure_with_code(message: impl Into<String>, code: u16) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            success: false,
        }
    }

    /// Returns true if this envelope reports success.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the payload, if any.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Consumes the envelope and returns the payload, if any.
    pub fn into_data(self) -> Option<Value> {
        self.data
    }
}
