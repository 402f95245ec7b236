//! # Scribe API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Scribe API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    std::fs::create_dir_all(&config.upload_dir)?;
    let upload_dir = config.upload_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .service(Files::new("/upload", upload_dir.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
