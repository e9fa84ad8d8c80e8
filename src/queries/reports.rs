use crate::{
    common::EWASTE_LOCATION,
    entities::{
        component::{self, Entity as Components},
        device::{self, Entity as Devices},
        history_entry::{self, Entity as History},
    },
    errors::InventoryError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which slice of the dataset a report covers. The export subsystem
/// materializes the snapshot; the core only selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ReportScope {
    /// Everything.
    Full,
    /// Assets retired to E-WASTED, and history rows touching E-WASTED on
    /// either side.
    EWaste,
    /// The complement: assets anywhere but E-WASTED, history rows
    /// touching it on neither side.
    Active,
}

/// Read-only input for the external spreadsheet/zip exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub devices: Vec<device::Model>,
    pub components: Vec<component::Model>,
    pub history: Vec<history_entry::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportQuery {
    pub scope: ReportScope,
}

#[async_trait]
impl Query for ReportQuery {
    type Result = ReportSnapshot;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        let mut devices = Devices::find().order_by_desc(device::Column::LastEdit);
        let mut components = Components::find().order_by_desc(component::Column::LastEdit);
        let mut history = History::find().order_by_desc(history_entry::Column::ChangeTime);

        match self.scope {
            ReportScope::Full => {}
            ReportScope::EWaste => {
                devices = devices.filter(device::Column::Location.eq(EWASTE_LOCATION));
                components = components.filter(component::Column::Location.eq(EWASTE_LOCATION));
                history = history.filter(
                    Condition::any()
                        .add(history_entry::Column::PreviousLocation.eq(EWASTE_LOCATION))
                        .add(history_entry::Column::NewLocation.eq(EWASTE_LOCATION)),
                );
            }
            ReportScope::Active => {
                devices = devices.filter(device::Column::Location.ne(EWASTE_LOCATION));
                components = components.filter(component::Column::Location.ne(EWASTE_LOCATION));
                history = history.filter(
                    Condition::all()
                        .add(history_entry::Column::PreviousLocation.ne(EWASTE_LOCATION))
                        .add(history_entry::Column::NewLocation.ne(EWASTE_LOCATION)),
                );
            }
        }

        Ok(ReportSnapshot {
            devices: devices.all(db).await.map_err(InventoryError::db_error)?,
            components: components.all(db).await.map_err(InventoryError::db_error)?,
            history: history.all(db).await.map_err(InventoryError::db_error)?,
        })
    }
}
