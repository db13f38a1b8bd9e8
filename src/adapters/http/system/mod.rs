//! HTTP adapter for service-level endpoints.
//!
//! - `GET /` - Service banner
//! - `GET /api/health` - Health check
//! - `GET /api/config` - Agent names and models

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{SystemAppState, SERVICE_NAME};
pub use routes::system_router;
