use crate::{
    entities::component::{self, Entity as Components},
    errors::InventoryError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

/// Full or filtered component table snapshot, newest edits first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSnapshotQuery {
    pub locations: Option<Vec<String>>,
    pub component_types: Option<Vec<String>>,
    pub search: Option<String>,
}

#[async_trait]
impl Query for ComponentSnapshotQuery {
    type Result = Vec<component::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        let mut select = Components::find().order_by_desc(component::Column::LastEdit);

        if let Some(locations) = &self.locations {
            if !locations.is_empty() {
                select = select.filter(component::Column::Location.is_in(locations.clone()));
            }
        }
        if let Some(types) = &self.component_types {
            if !types.is_empty() {
                select = select.filter(component::Column::ComponentType.is_in(types.clone()));
            }
        }
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(component::Column::Serial.contains(term))
                    .add(component::Column::Pos.contains(term))
                    .add(component::Column::Location.contains(term))
                    .add(component::Column::ComponentType.contains(term))
                    .add(component::Column::Connected.contains(term))
                    .add(component::Column::Notes.contains(term)),
            );
        }

        select.all(db).await.map_err(InventoryError::db_error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetComponentBySerialQuery {
    pub serial: String,
}

#[async_trait]
impl Query for GetComponentBySerialQuery {
    type Result = component::Model;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        Components::find_by_id(self.serial.clone())
            .one(db)
            .await
            .map_err(InventoryError::db_error)?
            .ok_or_else(|| {
                InventoryError::NotFound(format!("Component {} not found", self.serial))
            })
    }
}

/// All components currently attached to one device. The edit view lists
/// these next to the device, and the cascade moves exactly this set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedComponentsQuery {
    pub device_serial: String,
}

#[async_trait]
impl Query for ConnectedComponentsQuery {
    type Result = Vec<component::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        Components::find()
            .filter(component::Column::Connected.eq(self.device_serial.clone()))
            .all(db)
            .await
            .map_err(InventoryError::db_error)
    }
}
