//! # Ripple API Server
//!
//! Entry point: the actix-web HTTP server for pages and the post API, plus
//! the realtime channel listener.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use ripple_core::ports::TokenService;
use ripple_infra::SessionTokenService;

mod config;
mod handlers;
mod middleware;
mod state;
mod websocket;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();

    tracing::info!("Starting Ripple on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await?;
    let tokens: Arc<dyn TokenService> = Arc::new(SessionTokenService::from_env());

    websocket::spawn_realtime_server(&config, &state, tokens.clone()).await?;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug,ripple_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
