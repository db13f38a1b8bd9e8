//! HTTP adapters - REST API implementations.
//!
//! Each module has its own router and state; [`app_router`] merges them
//! behind the shared middleware stack.

pub mod app;
pub mod medical;
pub mod payment;
pub mod system;

// Re-export key types for convenience
pub use app::{app_router, AppStates, HttpSettings};
pub use medical::{medical_router, MedicalAppState};
pub use payment::{payment_router, PaymentAppState};
pub use system::{system_router, SystemAppState};
