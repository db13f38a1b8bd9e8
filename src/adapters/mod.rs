//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model gateways (OpenAI-compatible HTTP, mock)
//! - `document` - Report text extraction
//! - `http` - Axum routers and handlers
//! - `image` - Photo normalization for vision calls
//! - `wechat` - WeChat Pay provider (and its mock)

pub mod ai;
pub mod document;
pub mod http;
pub mod image;
pub mod wechat;
