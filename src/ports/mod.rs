//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Model Ports
//!
//! - `ModelGateway` - Text and vision completions against the remote model
//!
//! ## Upload Ports
//!
//! - `DocumentExtractor` - Plain text out of Word/PDF/text reports
//! - `ImageNormalizer` - Uploaded photos to base64 JPEG
//!
//! ## Payment Ports
//!
//! - `PaymentProvider` - Order creation, query and callback verification

mod document_extractor;
mod image_normalizer;
mod model_gateway;
mod payment_provider;

pub use document_extractor::{DocumentExtractor, ExtractionError};
pub use image_normalizer::{ImageError, ImageNormalizer};
pub use model_gateway::{
    GatewayError, GatewayInfo, Message, MessageRole, ModelGateway, TextCompletionRequest,
    VisionCompletionRequest,
};
pub use payment_provider::{
    CallbackVerification, CreateOrderRequest, CreatedOrder, OrderStatus, PayParams,
    PaymentError, PaymentProvider,
};
