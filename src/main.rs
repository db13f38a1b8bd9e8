//! MedAgent server binary.
//!
//! Loads configuration, wires adapters into the HTTP routers, and serves
//! until interrupted.

use std::error::Error;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use medagent::adapters::ai::{OpenAICompatibleConfig, OpenAICompatibleGateway};
use medagent::adapters::document::ReportTextExtractor;
use medagent::adapters::http::{
    app_router, AppStates, HttpSettings, MedicalAppState, PaymentAppState, SystemAppState,
};
use medagent::adapters::image::JpegNormalizer;
use medagent::adapters::wechat::{SignType, WeChatPayAdapter, WeChatPayConfig};
use medagent::config::{AppConfig, ServerConfig};
use medagent::domain::agents::{AgentCatalog, AgentRegistry};

type BoxError = Box<dyn Error + Send + Sync>;

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_states(config: &AppConfig) -> Result<AppStates, BoxError> {
    let ai = &config.ai;
    let api_key = ai
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .unwrap_or_default();
    let gateway = OpenAICompatibleGateway::new(
        OpenAICompatibleConfig::new(api_key)
            .with_base_url(&ai.base_url)
            .with_text_model(&ai.text_model)
            .with_vision_model(&ai.vision_model)
            .with_timeout(ai.timeout()),
    )?;

    let payment = &config.payment;
    let paid_agents = payment.paid_agents_list()?;
    let catalog = Arc::new(AgentCatalog::with_monetization(&paid_agents, payment.price_fen));
    let registry = AgentRegistry::new(Arc::new(gateway), Arc::clone(&catalog));

    let merchant_key = payment
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .unwrap_or_default();
    let provider = WeChatPayAdapter::new(
        WeChatPayConfig::new(
            &payment.app_id,
            &payment.mch_id,
            merchant_key,
            &payment.notify_url,
        )
        .with_base_url(&payment.base_url)
        .with_sign_type(payment.sign_type.parse::<SignType>()?)
        .with_price_fen(payment.price_fen),
    )?;

    let upload = &config.upload;
    Ok(AppStates {
        medical: MedicalAppState::new(
            registry.clone(),
            Arc::new(ReportTextExtractor::new()),
            Arc::new(JpegNormalizer::new(
                upload.max_image_dimension,
                upload.jpeg_quality,
            )),
            upload.max_file_size_bytes,
        ),
        payment: PaymentAppState::new(Arc::new(provider), catalog),
        system: SystemAppState::new(registry),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let states = build_states(&config)?;
    let settings = HttpSettings {
        cors_origins: config.server.cors_origins_list(),
        request_timeout: config.server.request_timeout(),
        max_upload_bytes: config.upload.max_file_size_bytes,
    };
    let app = app_router(states, &settings);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        text_model = %config.ai.text_model,
        vision_model = %config.ai.vision_model,
        paid_agents = ?config.payment.paid_agents_list()?,
        "starting medagent"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
