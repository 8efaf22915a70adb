// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, store, media storage, and start HTTP server

mod config;
mod db;
mod errors;
mod forms;
mod handlers;
mod models;
mod services;
mod views;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;
use services::{LocalStorage, MediaStorage};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        anyhow::bail!("Configuration error: {}", e);
    }

    log::info!("Starting photo-map-journal...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize the store
    let store = config::init_store(&config)
        .await
        .context("Failed to initialize the store")?;

    // 5. Media storage for uploaded images
    let media: MediaStorage = Arc::new(LocalStorage::new(
        config.media_root.clone(),
        config.media_url.clone(),
    ));
    log::info!("Storing media under {} ({})", config.media_root, config.media_url);

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (store, media storage, and config)
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(media.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::routes)
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
