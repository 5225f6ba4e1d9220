use statement_gateway::config::AppConfig;
use statement_gateway::routes;
use statement_gateway::state::AppState;

#[tokio::main]
async fn main() {
    // A missing .env file is normal in deployed environments.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");
    if let Err(e) = config.validate() {
        if config.strict {
            tracing::error!(error = %e, "refusing to start (set STRICT_CONFIG=false to override)");
            std::process::exit(1);
        }
        tracing::warn!(error = %e, "starting with incomplete configuration; affected endpoints will return 500");
    }

    let port = config.port;
    let state = AppState::from_config(config).expect("upstream client init failed");
    tracing::info!(upstream = state.upstream.is_some(), secrets = state.secrets.len(), "state initialized");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "statement-gateway listening");
    axum::serve(listener, app).await.expect("server failed");
}
