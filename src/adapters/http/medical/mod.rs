//! HTTP adapter for the medical endpoints.
//!
//! - `POST /api/medical-chat` - Main chat entry point (intent routing)
//! - `POST /api/report-interpretation` - Report interpretation
//! - `POST /api/health-education` - Health education
//! - `POST /api/dermatology-consultation` - Dermatology consultation
//! - `POST /api/medication-consultation` - Medication consultation

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::MedicalAppState;
pub use routes::medical_router;
