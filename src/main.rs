use scenari_connector_rs::{GatewayConfig, GatewayState, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scenari_connector_rs=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env().map_err(|err| {
        tracing::error!("Failed to load configuration: {}", err);
        std::io::Error::other(err)
    })?;

    tracing::info!(
        "Starting scenari-gateway on {}:{}",
        config.bind_addr,
        config.port
    );
    tracing::info!("Base URL: {}", config.base_url);
    tracing::info!("Repository: {}", config.repository);
    tracing::info!("Allowed origins: {:?}", config.allowed_origins);
    tracing::info!("Preflight methods: {}", config.allow_methods.header_value());
    if config.anonymous_principal.is_none() {
        tracing::info!("Anonymous uploads: disabled");
    }

    let (state, _repository) = GatewayState::in_memory(&config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.bind_addr, config.port)).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
