use std::sync::Arc;

use pos_inventory::{
    cache::SnapshotCache,
    commands::{
        catalog::{CreateComponentTypeCommand, CreateDeviceTypeCommand},
        components::CreateComponentCommand,
        devices::CreateDeviceCommand,
        locations::CreateLocationCommand,
    },
    db::{self, DbConfig, DbPool},
    events, InventoryService,
};

/// Helper harness standing up an inventory service backed by an
/// in-memory SQLite database with the embedded migrations applied.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub service: InventoryService,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // In-memory SQLite must stay on a single pooled connection: every
        // additional connection would see its own empty database.
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };

        let db = Arc::new(
            db::establish_connection_with_config(&db_config)
                .await
                .expect("failed to open in-memory database"),
        );
        db::run_migrations(db.as_ref())
            .await
            .expect("failed to run migrations");

        let (event_sender, mut event_receiver) = events::channel(64);
        let event_task = tokio::spawn(async move { while event_receiver.recv().await.is_some() {} });

        let service = InventoryService::new(
            Arc::clone(&db),
            Arc::new(event_sender),
            SnapshotCache::in_memory(),
        );

        Self {
            db,
            service,
            _event_task: event_task,
        }
    }

    /// Seeds a location plus the default catalogs most tests need.
    pub async fn with_catalog(locations: &[(&str, bool)]) -> Self {
        let app = Self::new().await;
        for (name, is_storage) in locations {
            app.seed_location(name, *is_storage).await;
        }
        app.seed_device_type("Terminal").await;
        app.seed_component_type("Card Reader").await;
        app
    }

    pub async fn seed_location(&self, name: &str, is_storage: bool) {
        self.service
            .create_location(CreateLocationCommand {
                name: name.to_string(),
                image: None,
                is_storage,
            })
            .await
            .expect("failed to seed location");
    }

    pub async fn seed_device_type(&self, name: &str) {
        self.service
            .create_device_type(CreateDeviceTypeCommand {
                name: name.to_string(),
                image: None,
            })
            .await
            .expect("failed to seed device type");
    }

    pub async fn seed_component_type(&self, name: &str) {
        self.service
            .create_component_type(CreateComponentTypeCommand {
                name: name.to_string(),
                image: None,
            })
            .await
            .expect("failed to seed component type");
    }
}

/// Command builder with sensible defaults for a device at `location`.
#[allow(dead_code)]
pub fn new_device(serial: &str, location: &str) -> CreateDeviceCommand {
    CreateDeviceCommand {
        serial: serial.to_string(),
        pos: "Toast".to_string(),
        location: location.to_string(),
        device_type: "Terminal".to_string(),
        friendly_name: None,
        notes: None,
        image: None,
    }
}

/// Command builder with sensible defaults for a component at `location`.
#[allow(dead_code)]
pub fn new_component(serial: &str, location: &str) -> CreateComponentCommand {
    CreateComponentCommand {
        serial: serial.to_string(),
        pos: "Toast".to_string(),
        location: location.to_string(),
        component_type: "Card Reader".to_string(),
        connected_device: None,
        notes: None,
        image: None,
    }
}
