use crate::{
    cache::SnapshotCache,
    commands::{
        catalog::{
            CreateComponentTypeCommand, CreateComponentTypeResult, CreateDeviceTypeCommand,
            CreateDeviceTypeResult,
        },
        components::{
            CreateComponentCommand, CreateComponentResult, UpdateComponentCommand,
            UpdateComponentResult,
        },
        devices::{
            CreateDeviceCommand, CreateDeviceResult, UpdateDeviceCommand, UpdateDeviceResult,
        },
        locations::{
            CreateLocationCommand, CreateLocationResult, UpdateLocationCommand,
            UpdateLocationResult,
        },
        Command,
    },
    db::DbPool,
    entities::{component, component_type, device, device_type, history_entry, location},
    errors::InventoryError,
    events::EventSender,
    queries::{
        component_queries::{
            ComponentSnapshotQuery, ConnectedComponentsQuery, GetComponentBySerialQuery,
        },
        device_queries::{DeviceSnapshotQuery, GetDeviceBySerialQuery},
        history_queries::HistorySnapshotQuery,
        overview::{build_overview, OverviewReport},
        reports::{ReportQuery, ReportScope, ReportSnapshot},
        Query,
    },
};
use chrono::Utc;
use sea_orm::{EntityTrait, QueryOrder};
use std::sync::Arc;
use tracing::instrument;

const TABLE_DEVICES: &str = "devices";
const TABLE_COMPONENTS: &str = "components";
const TABLE_LOCATIONS: &str = "locations";
const TABLE_DEVICE_TYPES: &str = "device_types";
const TABLE_COMPONENT_TYPES: &str = "component_types";
const TABLE_HISTORY: &str = "history";

/// The overview counts changes over the last day.
const DEFAULT_CHANGE_WINDOW_HOURS: i64 = 24;

/// Facade over the consistency engine and the read side.
///
/// Every mutation runs its command (one transaction: entity write plus
/// history append), then blanket-invalidates the snapshot cache.
/// Unfiltered snapshot reads go through the cache; filtered reads and
/// reports query storage directly. All dependencies are injected — no
/// global state.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    cache: SnapshotCache,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, cache: SnapshotCache) -> Self {
        Self {
            db,
            event_sender,
            cache,
        }
    }

    async fn run<C: Command>(&self, command: C) -> Result<C::Result, InventoryError> {
        let result = command
            .execute(Arc::clone(&self.db), Arc::clone(&self.event_sender))
            .await?;
        self.cache.invalidate_all().await?;
        Ok(result)
    }

    // Mutations

    #[instrument(skip(self, command))]
    pub async fn create_device(
        &self,
        command: CreateDeviceCommand,
    ) -> Result<CreateDeviceResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn update_device(
        &self,
        command: UpdateDeviceCommand,
    ) -> Result<UpdateDeviceResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn create_component(
        &self,
        command: CreateComponentCommand,
    ) -> Result<CreateComponentResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn update_component(
        &self,
        command: UpdateComponentCommand,
    ) -> Result<UpdateComponentResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn create_location(
        &self,
        command: CreateLocationCommand,
    ) -> Result<CreateLocationResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn update_location(
        &self,
        command: UpdateLocationCommand,
    ) -> Result<UpdateLocationResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn create_device_type(
        &self,
        command: CreateDeviceTypeCommand,
    ) -> Result<CreateDeviceTypeResult, InventoryError> {
        self.run(command).await
    }

    #[instrument(skip(self, command))]
    pub async fn create_component_type(
        &self,
        command: CreateComponentTypeCommand,
    ) -> Result<CreateComponentTypeResult, InventoryError> {
        self.run(command).await
    }

    // Cached snapshots

    pub async fn devices(&self) -> Result<Vec<device::Model>, InventoryError> {
        let db = Arc::clone(&self.db);
        self.cache
            .get_or_load(TABLE_DEVICES, || async move {
                DeviceSnapshotQuery::default().execute(db.as_ref()).await
            })
            .await
    }

    pub async fn components(&self) -> Result<Vec<component::Model>, InventoryError> {
        let db = Arc::clone(&self.db);
        self.cache
            .get_or_load(TABLE_COMPONENTS, || async move {
                ComponentSnapshotQuery::default().execute(db.as_ref()).await
            })
            .await
    }

    pub async fn locations(&self) -> Result<Vec<location::Model>, InventoryError> {
        let db = Arc::clone(&self.db);
        self.cache
            .get_or_load(TABLE_LOCATIONS, || async move {
                location::Entity::find()
                    .order_by_asc(location::Column::Name)
                    .all(db.as_ref())
                    .await
                    .map_err(InventoryError::db_error)
            })
            .await
    }

    pub async fn device_types(&self) -> Result<Vec<device_type::Model>, InventoryError> {
        let db = Arc::clone(&self.db);
        self.cache
            .get_or_load(TABLE_DEVICE_TYPES, || async move {
                device_type::Entity::find()
                    .order_by_asc(device_type::Column::Name)
                    .all(db.as_ref())
                    .await
                    .map_err(InventoryError::db_error)
            })
            .await
    }

    pub async fn component_types(&self) -> Result<Vec<component_type::Model>, InventoryError> {
        let db = Arc::clone(&self.db);
        self.cache
            .get_or_load(TABLE_COMPONENT_TYPES, || async move {
                component_type::Entity::find()
                    .order_by_asc(component_type::Column::Name)
                    .all(db.as_ref())
                    .await
                    .map_err(InventoryError::db_error)
            })
            .await
    }

    pub async fn history(&self) -> Result<Vec<history_entry::Model>, InventoryError> {
        let db = Arc::clone(&self.db);
        self.cache
            .get_or_load(TABLE_HISTORY, || async move {
                HistorySnapshotQuery::default().execute(db.as_ref()).await
            })
            .await
    }

    /// Drops every cached snapshot; the next reads reload from storage.
    /// This is the refresh button.
    pub async fn refresh(&self) -> Result<(), InventoryError> {
        self.cache.invalidate_all().await
    }

    // Direct reads (filtered views bypass the cache)

    pub async fn search_devices(
        &self,
        query: DeviceSnapshotQuery,
    ) -> Result<Vec<device::Model>, InventoryError> {
        query.execute(self.db.as_ref()).await
    }

    pub async fn search_components(
        &self,
        query: ComponentSnapshotQuery,
    ) -> Result<Vec<component::Model>, InventoryError> {
        query.execute(self.db.as_ref()).await
    }

    pub async fn search_history(
        &self,
        query: HistorySnapshotQuery,
    ) -> Result<Vec<history_entry::Model>, InventoryError> {
        query.execute(self.db.as_ref()).await
    }

    pub async fn find_device(&self, serial: &str) -> Result<device::Model, InventoryError> {
        GetDeviceBySerialQuery {
            serial: serial.to_string(),
        }
        .execute(self.db.as_ref())
        .await
    }

    pub async fn find_component(&self, serial: &str) -> Result<component::Model, InventoryError> {
        GetComponentBySerialQuery {
            serial: serial.to_string(),
        }
        .execute(self.db.as_ref())
        .await
    }

    pub async fn connected_components(
        &self,
        device_serial: &str,
    ) -> Result<Vec<component::Model>, InventoryError> {
        ConnectedComponentsQuery {
            device_serial: device_serial.to_string(),
        }
        .execute(self.db.as_ref())
        .await
    }

    // Derived views

    /// Overview numbers for the default one-day change window.
    pub async fn overview(&self) -> Result<OverviewReport, InventoryError> {
        self.overview_with_window(DEFAULT_CHANGE_WINDOW_HOURS).await
    }

    pub async fn overview_with_window(
        &self,
        window_hours: i64,
    ) -> Result<OverviewReport, InventoryError> {
        let devices = self.devices().await?;
        let components = self.components().await?;
        let locations = self.locations().await?;
        let history = self.history().await?;

        Ok(build_overview(
            &devices,
            &components,
            &locations,
            &history,
            Utc::now(),
            window_hours,
        ))
    }

    #[instrument(skip(self))]
    pub async fn report(&self, scope: ReportScope) -> Result<ReportSnapshot, InventoryError> {
        ReportQuery { scope }.execute(self.db.as_ref()).await
    }
}
