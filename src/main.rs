// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, shared state and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{
    start_cleanup_task, start_rate_limit_gc, start_session_purge_task, LoginRateLimiter,
    ProfileCache,
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting gigroute marketplace...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Shared state: public profile cache and login throttling
    let cache = Arc::new(ProfileCache::new(config.profile_cache_ttl_secs));
    start_cleanup_task(cache.clone(), 300);
    log::info!(
        "Initialized profile cache (TTL: {}s)",
        config.profile_cache_ttl_secs
    );

    let limiter = Arc::new(LoginRateLimiter::new(config.login_attempts_per_minute));
    start_rate_limit_gc(limiter.clone(), 600);
    log::info!(
        "Login rate limit: {} attempts per minute per email",
        config.login_attempts_per_minute
    );

    start_session_purge_task(pool.clone(), 3600);

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::profiles_config)
            .configure(handlers::tours_config)
            .configure(handlers::bookings_config)
            .configure(handlers::reviews_config)
            .configure(handlers::dashboard_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
