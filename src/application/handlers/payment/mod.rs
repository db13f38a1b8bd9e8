//! Payment handlers.
//!
//! ## Commands
//! - Creating prepaid orders for monetized services
//! - Accepting gateway payment callbacks
//!
//! ## Queries
//! - Order status by merchant order number
//! - Paid service list

mod create_order;
mod error;
mod handle_notify;
mod list_services;
mod query_order;

pub use error::PaymentFlowError;

// Commands
pub use create_order::{CreatePaymentOrderCommand, CreatePaymentOrderHandler};
pub use handle_notify::{HandlePaymentNotifyCommand, HandlePaymentNotifyHandler};

// Queries
pub use list_services::{
    ListPaidServicesHandler, ListPaidServicesQuery, ListPaidServicesResult, PaidServiceView,
};
pub use query_order::{QueryPaymentOrderHandler, QueryPaymentOrderQuery};
