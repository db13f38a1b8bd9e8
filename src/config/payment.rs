//! Payment configuration (WeChat Pay)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::agents::{AgentKind, DEFAULT_PRICE_FEN};

const SIGN_TYPES: &[&str] = &["md5", "hmac-sha256", "hmac_sha256"];

/// Payment configuration (WeChat Pay v2, mini-program JSAPI)
///
/// Monetization is off unless `paid_agents` names at least one agent; the
/// merchant credentials are only required once it is on.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Mini-program app id
    #[serde(default)]
    pub app_id: String,

    /// Merchant id
    #[serde(default)]
    pub mch_id: String,

    /// Merchant API key used for request signing
    pub api_key: Option<SecretString>,

    /// Callback URL registered with the gateway
    #[serde(default)]
    pub notify_url: String,

    /// Gateway base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Signature digest (`md5` or `hmac-sha256`)
    #[serde(default = "default_sign_type")]
    pub sign_type: String,

    /// Price of every paid agent, in fen
    #[serde(default = "default_price_fen")]
    pub price_fen: u32,

    /// Agents that require payment (comma-separated agent names)
    pub paid_agents: Option<String>,
}

impl PaymentConfig {
    /// Parse `paid_agents` into agent kinds
    pub fn paid_agents_list(&self) -> Result<Vec<AgentKind>, ValidationError> {
        let Some(raw) = self.paid_agents.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                name.parse::<AgentKind>()
                    .map_err(|_| ValidationError::UnknownAgent(name.to_string()))
            })
            .collect()
    }

    /// Check if any agent is monetized
    pub fn is_enabled(&self) -> bool {
        self.paid_agents_list().is_ok_and(|agents| !agents.is_empty())
    }

    /// Check if the merchant API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let paid = self.paid_agents_list()?;

        if !SIGN_TYPES.contains(&self.sign_type.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::InvalidSignType(self.sign_type.clone()));
        }
        if self.price_fen == 0 {
            return Err(ValidationError::InvalidPrice);
        }
        if paid.is_empty() {
            return Ok(());
        }

        if self.app_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__APP_ID"));
        }
        if self.mch_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__MCH_ID"));
        }
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("PAYMENT__API_KEY"));
        }
        if self.notify_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__NOTIFY_URL"));
        }
        if !self.notify_url.starts_with("https://") && !self.notify_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("PAYMENT__NOTIFY_URL"));
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            mch_id: String::new(),
            api_key: None,
            notify_url: String::new(),
            base_url: default_base_url(),
            sign_type: default_sign_type(),
            price_fen: default_price_fen(),
            paid_agents: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.mch.weixin.qq.com".to_string()
}

fn default_sign_type() -> String {
    "md5".to_string()
}

fn default_price_fen() -> u32 {
    DEFAULT_PRICE_FEN
}
