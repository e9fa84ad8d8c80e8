//! pos-inventory
//!
//! Single-tenant inventory tracking core for point-of-sale hardware.
//! Staff register devices and their attached components, move them
//! between locations, and review a full append-only change history; the
//! crate keeps the relational dataset consistent (serial uniqueness,
//! connection references, cascading location updates) and pairs every
//! mutation with exactly one audit row in the same transaction.
//!
//! The boundary is an in-process library: an external presentation layer
//! submits validated intents (the command structs) and renders the
//! snapshots, overview numbers, and report slices this crate returns.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod cache;
pub mod commands;
pub mod common;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod queries;
pub mod services;

use std::sync::Arc;
use tokio::sync::mpsc;

pub use cache::SnapshotCache;
pub use config::AppConfig;
pub use db::DbPool;
pub use errors::InventoryError;
pub use events::{Event, EventSender};
pub use services::InventoryService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub event_sender: Arc<EventSender>,
    pub inventory_service: InventoryService,
}

/// Stands up the full application state from configuration: connects the
/// pool, runs migrations when `auto_migrate` is set, and wires the
/// service with its cache and event channel. Returns the receiver half
/// of the event channel for the embedding application to drain.
pub async fn bootstrap(
    config: AppConfig,
) -> Result<(AppState, mpsc::Receiver<Event>), InventoryError> {
    let db = Arc::new(db::establish_connection_from_app_config(&config).await?);

    if config.auto_migrate {
        db::run_migrations(db.as_ref()).await?;
    }

    let (event_sender, event_receiver) = events::channel(64);
    let event_sender = Arc::new(event_sender);

    let cache = SnapshotCache::in_memory();
    let inventory_service =
        InventoryService::new(Arc::clone(&db), Arc::clone(&event_sender), cache);

    Ok((
        AppState {
            db,
            config,
            event_sender,
            inventory_service,
        },
        event_receiver,
    ))
}
