//! Model Gateway Adapters.
//!
//! Implementations of the ModelGateway port.
//!
//! ## Available Adapters
//!
//! - `OpenAICompatibleGateway` - Any OpenAI-compatible chat-completions service (DashScope by default)
//! - `MockGateway` - Configurable mock for testing

mod mock_gateway;
mod openai_gateway;

pub use mock_gateway::{MockError, MockGateway, MockResponse, RecordedCall, DEFAULT_MOCK_REPLY};
pub use openai_gateway::{
    OpenAICompatibleConfig, OpenAICompatibleGateway, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
