use crate::{
    entities::device::{self, Entity as Devices},
    errors::InventoryError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

/// Full or filtered device table snapshot, newest edits first.
///
/// `locations` and `device_types` are multi-select filters (empty/None
/// means "All"); `search` matches case-insensitively across the text
/// columns, mirroring the table search box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSnapshotQuery {
    pub locations: Option<Vec<String>>,
    pub device_types: Option<Vec<String>>,
    pub search: Option<String>,
}

#[async_trait]
impl Query for DeviceSnapshotQuery {
    type Result = Vec<device::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        let mut select = Devices::find().order_by_desc(device::Column::LastEdit);

        if let Some(locations) = &self.locations {
            if !locations.is_empty() {
                select = select.filter(device::Column::Location.is_in(locations.clone()));
            }
        }
        if let Some(types) = &self.device_types {
            if !types.is_empty() {
                select = select.filter(device::Column::DeviceType.is_in(types.clone()));
            }
        }
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(device::Column::Serial.contains(term))
                    .add(device::Column::Pos.contains(term))
                    .add(device::Column::Location.contains(term))
                    .add(device::Column::DeviceType.contains(term))
                    .add(device::Column::FriendlyName.contains(term))
                    .add(device::Column::Notes.contains(term)),
            );
        }

        select.all(db).await.map_err(InventoryError::db_error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDeviceBySerialQuery {
    pub serial: String,
}

#[async_trait]
impl Query for GetDeviceBySerialQuery {
    type Result = device::Model;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        Devices::find_by_id(self.serial.clone())
            .one(db)
            .await
            .map_err(InventoryError::db_error)?
            .ok_or_else(|| InventoryError::NotFound(format!("Device {} not found", self.serial)))
    }
}

/// Friendly-name lookup used to resolve dropdown selections. Returns
/// `None` rather than failing: the caller decides whether a miss is an
/// error (see the component commands).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSerialForFriendlyNameQuery {
    pub friendly_name: String,
}

#[async_trait]
impl Query for GetSerialForFriendlyNameQuery {
    type Result = Option<String>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        let device = Devices::find()
            .filter(device::Column::FriendlyName.eq(self.friendly_name.clone()))
            .one(db)
            .await
            .map_err(InventoryError::db_error)?;

        Ok(device.map(|d| d.serial))
    }
}
