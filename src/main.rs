//! Mind Haven server binary.
//!
//! Loads configuration, wires the hosted-model adapters into a session
//! factory and serves the chat page and API.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mind_haven::adapters::ai::{OpenAIConfig, OpenAIProvider};
use mind_haven::adapters::http::{chat_router, ChatAppState};
use mind_haven::adapters::sentiment::{HuggingFaceClassifier, HuggingFaceConfig};
use mind_haven::application::SessionFactory;
use mind_haven::config::{AppConfig, LogFormat, ValidationError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    config.validate()?;
    let addr = config.server.socket_addr()?;

    let classifier = build_classifier(&config)?;
    let generator = build_generator(&config)?;
    tracing::info!(
        classifier = %config.sentiment.model,
        generator = %config.ai.model,
        "Model adapters ready"
    );

    let factory = SessionFactory::new(
        Arc::new(classifier),
        Arc::new(generator),
        config.session_settings(),
    );

    let app = chat_router(ChatAppState::new(factory))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Mind Haven listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn build_classifier(config: &AppConfig) -> Result<HuggingFaceClassifier, Box<dyn std::error::Error>> {
    let sentiment = &config.sentiment;
    let mut hf = HuggingFaceConfig::default()
        .with_model(&sentiment.model)
        .with_base_url(&sentiment.base_url)
        .with_timeout(sentiment.timeout())
        .with_max_retries(sentiment.max_retries);
    if let Some(token) = sentiment.api_token() {
        hf = hf.with_api_token(token);
    }

    Ok(HuggingFaceClassifier::new(hf)?)
}

fn build_generator(config: &AppConfig) -> Result<OpenAIProvider, Box<dyn std::error::Error>> {
    let ai = &config.ai;
    let api_key = ai
        .api_key()
        .ok_or(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))?;

    let openai = OpenAIConfig::new(api_key)
        .with_model(&ai.model)
        .with_base_url(&ai.base_url)
        .with_timeout(ai.timeout())
        .with_max_retries(ai.max_retries)
        .with_temperature(ai.temperature);

    Ok(OpenAIProvider::new(openai)?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
