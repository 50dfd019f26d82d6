use std::net::SocketAddr;
use std::sync::Arc;

use alt_config::{AppConfig, ProxyStrategy};
use alt_fetch::{BatchFetcher, HostRateLimiter};
use clap::Parser;

use alt_api::handlers::chat::EmptyChatUpstream;
use alt_api::handlers::health::init_startup_time;
use alt_api::kratos_client::HttpKratosClient;
use alt_api::state::AppState;

#[derive(Parser)]
#[command(name = "alt-api")]
#[command(about = "Reading-platform backend mesh: RPC surface")]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    init_startup_time();

    let config = AppConfig::from_env()?;
    tracing::info!(
        bind_address = %args.bind,
        proxy_strategy = ?config.proxy_strategy,
        session_timeout = ?config.session_timeout,
        "starting alt-api"
    );

    if matches!(config.proxy_strategy, ProxyStrategy::Envoy) && config.envoy_proxy_base_url.is_none() {
        anyhow::bail!("PROXY_STRATEGY=ENVOY requires ENVOY_PROXY_BASE_URL");
    }

    let proxy_secret = std::env::var("PROXY_URL_SECRET")
        .map_err(|_| anyhow::anyhow!("PROXY_URL_SECRET must be set"))?
        .into_bytes();

    let rate_limiter = Arc::new(HostRateLimiter::new());
    let fetcher = Arc::new(BatchFetcher::new(reqwest::Client::new(), rate_limiter));
    let kratos = Arc::new(HttpKratosClient::new(config.kratos.public_url.clone()));
    let chat = Arc::new(EmptyChatUpstream);

    let state = AppState::new(config, fetcher, kratos, chat, proxy_secret);
    let (csrf_sweeper, session_sweeper) = state.spawn_sweepers();

    let app = alt_api::router(state);
    let addr: SocketAddr = args.bind.parse()?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    csrf_sweeper.abort();
    session_sweeper.abort();
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    tracing::info!("shutdown signal received");
}
