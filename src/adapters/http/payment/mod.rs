//! HTTP adapter for the payment endpoints.
//!
//! - `POST /api/payment/create` - Create a prepaid order
//! - `POST /api/payment/query` - Query an order
//! - `POST /api/payment/notify` - Gateway callback
//! - `GET /api/payment/services` - Paid service list

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::PaymentAppState;
pub use routes::payment_router;
