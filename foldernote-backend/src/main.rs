use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod accounts;
mod config;
mod controllers;
mod db;
mod models;
mod tree;

use accounts::AccountStore;
use config::Config;
use db::Database;
use tree::DocumentTreeStore;

pub struct AppState {
    pub tree: Arc<DocumentTreeStore>,
    pub accounts: Arc<AccountStore>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            tree: Arc::new(DocumentTreeStore::new(Arc::clone(&db))),
            accounts: Arc::new(AccountStore::new(db)),
        }
    }
}

fn build_cors(config: &Config) -> Cors {
    let cors = match &config.cors_allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Foldernote v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let port = config.port;

    config::initialize_database_dir(&config.database_url)?;

    let db = match Database::new(
        &config.database_url,
        config.db_pool_size,
        config.db_busy_timeout_ms,
    ) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failed to open database {}: {}", config.database_url, e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let state = web::Data::new(AppState::new(db));

    log::info!("Starting server on port {}", port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(build_cors(&config))
            .configure(controllers::health::config_routes)
            .configure(controllers::auth::config)
            .configure(controllers::items::config)
    })
    .bind(("0.0.0.0", port))?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
