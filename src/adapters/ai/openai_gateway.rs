//! OpenAI-compatible gateway - ModelGateway over a chat-completions endpoint.
//!
//! Targets DashScope's compatible mode by default, but any service that speaks
//! the OpenAI chat-completions protocol works.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAICompatibleConfig::new(api_key)
//!     .with_base_url("https://dashscope.aliyuncs.com/compatible-mode/v1")
//!     .with_text_model("qwen3-max")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let gateway = OpenAICompatibleGateway::new(config)?;
//! ```
//!
//! Vision requests become a single user turn with a text part and an
//! `image_url` part carrying a `data:image/jpeg;base64,` URL.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    GatewayError, GatewayInfo, Message, MessageRole, ModelGateway, TextCompletionRequest,
    VisionCompletionRequest,
};

/// DashScope OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Sampling temperature when the request leaves it unset.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Token budget when the request leaves it unset.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Configuration for the OpenAI-compatible gateway.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    /// Per-call timeout; there are no retries.
    pub timeout: Duration,
}

impl OpenAICompatibleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: "qwen3-max".to_string(),
            vision_model: "qwen3-vl-plus".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gateway for OpenAI-compatible chat-completions services.
pub struct OpenAICompatibleGateway {
    config: OpenAICompatibleConfig,
    client: Client,
}

impl OpenAICompatibleGateway {
    /// Creates the gateway; fails only if the HTTP client cannot be built.
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn text_body(&self, request: TextCompletionRequest) -> ChatRequest {
        ChatRequest {
            model: request
                .model
                .unwrap_or_else(|| self.config.text_model.clone()),
            messages: request.messages.into_iter().map(WireMessage::from).collect(),
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    fn vision_body(&self, request: VisionCompletionRequest) -> ChatRequest {
        let parts = vec![
            ContentPart::Text {
                text: request.prompt,
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/jpeg;base64,{}", request.image_base64),
                },
            },
        ];

        ChatRequest {
            model: request
                .model
                .unwrap_or_else(|| self.config.vision_model.clone()),
            messages: vec![WireMessage {
                role: MessageRole::User,
                content: WireContent::Parts(parts),
            }],
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    /// Sends one request; no retries.
    async fn send(&self, body: &ChatRequest) -> Result<String, GatewayError> {
        tracing::debug!(
            model = %body.model,
            messages = body.messages.len(),
            max_tokens = body.max_tokens,
            "sending chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = Self::check_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        parse_reply(&body)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if err.is_connect() {
            GatewayError::network(format!("Connection failed: {}", err))
        } else {
            GatewayError::network(err.to_string())
        }
    }

    async fn check_status(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "chat completion rejected");
        Err(GatewayError::status(status.as_u16(), body))
    }
}

#[async_trait]
impl ModelGateway for OpenAICompatibleGateway {
    async fn complete_text(&self, request: TextCompletionRequest) -> Result<String, GatewayError> {
        let body = self.text_body(request);
        self.send(&body).await
    }

    async fn complete_vision(
        &self,
        request: VisionCompletionRequest,
    ) -> Result<String, GatewayError> {
        let body = self.vision_body(request);
        self.send(&body).await
    }

    fn gateway_info(&self) -> GatewayInfo {
        GatewayInfo::new(
            "openai-compatible",
            &self.config.text_model,
            &self.config.vision_model,
        )
    }
}

/// Extracts `choices[0].message.content` from a response body.
fn parse_reply(body: &str) -> Result<String, GatewayError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::parse(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GatewayError::parse("No content in response"))
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: MessageRole,
    content: WireContent,
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            content: WireContent::Text(message.content),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use serde_json::json;

    fn gateway() -> OpenAICompatibleGateway {
        OpenAICompatibleGateway::new(OpenAICompatibleConfig::new("test-key")).unwrap()
    }

    /// Serves `status` and `body` for every chat-completions call.
    async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move || async move { (status, body) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAICompatibleConfig::new("secret")
            .with_base_url("https://example.test/v1")
            .with_text_model("qwen-plus")
            .with_vision_model("qwen-vl")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "https://example.test/v1");
        assert_eq!(config.text_model, "qwen-plus");
        assert_eq!(config.vision_model, "qwen-vl");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_key(), "secret");
    }

    #[test]
    fn text_body_applies_defaults() {
        let request = TextCompletionRequest::new()
            .with_message(Message::system("rules"))
            .with_message(Message::user("hi"));

        let body = serde_json::to_value(gateway().text_body(request)).unwrap();

        assert_eq!(body["model"], "qwen3-max");
        assert_eq!(body["max_tokens"], 2000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "rules"},
                {"role": "user", "content": "hi"}
            ])
        );
    }

    #[test]
    fn text_body_honours_overrides() {
        let request = TextCompletionRequest::new()
            .with_message(Message::user("hi"))
            .with_model("qwen-turbo")
            .with_max_tokens(256);

        let body = serde_json::to_value(gateway().text_body(request)).unwrap();

        assert_eq!(body["model"], "qwen-turbo");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn vision_body_has_text_and_image_parts() {
        let request = VisionCompletionRequest::new("看看这个", "aW1n");

        let body = serde_json::to_value(gateway().vision_body(request)).unwrap();

        assert_eq!(body["model"], "qwen3-vl-plus");
        assert_eq!(
            body["messages"],
            json!([{
                "role": "user",
                "content": [
                    {"type": "text", "text": "看看这个"},
                    {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,aW1n"}}
                ]
            }])
        );
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let gateway = OpenAICompatibleGateway::new(
            OpenAICompatibleConfig::new("k").with_base_url("http://host/v1/"),
        )
        .unwrap();
        assert_eq!(gateway.completions_url(), "http://host/v1/chat/completions");
    }

    #[test]
    fn parse_reply_takes_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"你好"}},{"message":{"content":"x"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "你好");
    }

    #[test]
    fn parse_reply_rejects_missing_choices() {
        assert!(matches!(parse_reply(r#"{"choices":[]}"#), Err(GatewayError::Parse(_))));
        assert!(matches!(parse_reply("not json"), Err(GatewayError::Parse(_))));
    }

    #[test]
    fn gateway_info_reports_models() {
        let info = gateway().gateway_info();
        assert_eq!(info.name, "openai-compatible");
        assert_eq!(info.text_model, "qwen3-max");
        assert_eq!(info.vision_model, "qwen3-vl-plus");
    }

    #[tokio::test]
    async fn successful_call_returns_content() {
        let base_url = serve(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"推荐科室：内科"}}]}"#,
        )
        .await;
        let gateway = OpenAICompatibleGateway::new(
            OpenAICompatibleConfig::new("k").with_base_url(base_url),
        )
        .unwrap();

        let reply = gateway
            .complete_text(TextCompletionRequest::new().with_message(Message::user("头痛")))
            .await
            .unwrap();

        assert_eq!(reply, "推荐科室：内科");
    }

    #[tokio::test]
    async fn non_success_status_carries_status_and_body() {
        let base_url = serve(StatusCode::TOO_MANY_REQUESTS, "slow down").await;
        let gateway = OpenAICompatibleGateway::new(
            OpenAICompatibleConfig::new("k").with_base_url(base_url),
        )
        .unwrap();

        let err = gateway
            .complete_vision(VisionCompletionRequest::new("p", "aW1n"))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::status(429, "slow down"));
        assert!(err.is_retryable());
    }
}
