use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod error;
mod middleware;
mod notes;

use config::{Config, StorageBackend};
use db::Database;
use error::StoreError;
use middleware::RateLimitPolicy;
use notes::{MemoryNoteStore, NoteStore};

pub struct AppState {
    /// The one note store every handler shares, built before the server starts
    pub store: Arc<dyn NoteStore>,
}

/// Build the configured store. A database that cannot be opened is fatal.
fn open_store(config: &Config) -> Result<Arc<dyn NoteStore>, StoreError> {
    match config.storage {
        StorageBackend::Sqlite => {
            let db = Database::open(&config.database_url)?;
            log::info!(
                "SQLite note store ready at {} (journal_mode={})",
                db.path().display(),
                db.journal_mode()
            );
            Ok(Arc::new(db))
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory note store; notes are lost on restart");
            Ok(Arc::new(MemoryNoteStore::with_welcome_note()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Notes backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let store = open_store(&config).map_err(|e| {
        log::error!("Failed to initialize note storage: {}", e);
        std::io::Error::other(e)
    })?;

    let rate_limiter = RateLimitPolicy::new(config.rate_limit).map(web::Data::new);
    match &rate_limiter {
        Some(policy) => log::info!(
            "Rate limiting /notes to {} requests per {}s per client",
            policy.config().max_requests,
            policy.config().window.as_secs()
        ),
        None => log::warn!("Rate limiting disabled"),
    }

    let public_dir = if config.public_dir.is_dir() {
        log::info!("Serving static files from: {}", config.public_dir.display());
        Some(config.public_dir.clone())
    } else {
        None
    };

    let port = config.port;
    let state = web::Data::new(AppState { store });

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            // `/notes/` and `/notes/1/` route like their slashless forms
            .wrap(NormalizePath::trim())
            .configure(controllers::notes::config);

        if let Some(policy) = &rate_limiter {
            app = app.app_data(policy.clone());
        }

        // Static files last so they never shadow API routes
        if let Some(dir) = &public_dir {
            app = app.service(Files::new("/", dir.clone()).index_file("index.html"));
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run();

    log::info!("Notes app running at http://localhost:{}", port);

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
