//! # turfbookd
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`turfbook.toml`, `TURFBOOK_*` env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;
use turfbook_adapter_http_axum::state::AppState;
use turfbook_adapter_storage_sqlite_sqlx::{
    SqliteBlockedSlotRepository, SqliteBookingRepository, SqliteOwnerDirectory,
    SqliteTurfRepository,
};
use turfbook_app::services::availability_service::AvailabilityService;
use turfbook_app::services::booking_service::BookingService;
use turfbook_app::services::turf_catalog_service::TurfCatalogService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = turfbook_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let owners = SqliteOwnerDirectory::new(pool.clone());
    let turfs = SqliteTurfRepository::new(pool.clone());
    let bookings = SqliteBookingRepository::new(pool.clone());
    let blocked = SqliteBlockedSlotRepository::new(pool);

    // Services
    let catalog = TurfCatalogService::new(owners, turfs.clone(), bookings.clone());
    let availability =
        AvailabilityService::new(turfs.clone(), bookings.clone(), blocked.clone());
    let booking = BookingService::new(AvailabilityService::new(turfs, bookings, blocked));

    // HTTP
    let state = AppState::new(catalog, availability, booking);
    let app = turfbook_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "turfbookd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("turfbookd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
