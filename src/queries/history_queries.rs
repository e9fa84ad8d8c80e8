use crate::{
    entities::history_entry::{self, Entity as History},
    errors::InventoryError,
    queries::Query,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

/// Audit-trail snapshot, newest changes first, with the history tab's
/// cross-column search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySnapshotQuery {
    pub search: Option<String>,
}

#[async_trait]
impl Query for HistorySnapshotQuery {
    type Result = Vec<history_entry::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        let mut select = History::find().order_by_desc(history_entry::Column::ChangeTime);

        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(history_entry::Column::Serial.contains(term))
                    .add(history_entry::Column::ChangeLog.contains(term))
                    .add(history_entry::Column::PreviousLocation.contains(term))
                    .add(history_entry::Column::NewLocation.contains(term))
                    .add(history_entry::Column::PreviousFriendlyName.contains(term))
                    .add(history_entry::Column::NewFriendlyName.contains(term))
                    .add(history_entry::Column::PreviousConnection.contains(term))
                    .add(history_entry::Column::NewConnection.contains(term))
                    .add(history_entry::Column::PreviousNotes.contains(term))
                    .add(history_entry::Column::NewNotes.contains(term)),
            );
        }

        select.all(db).await.map_err(InventoryError::db_error)
    }
}

/// Audit rows for one asset, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetHistoryQuery {
    pub serial: String,
}

#[async_trait]
impl Query for AssetHistoryQuery {
    type Result = Vec<history_entry::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError> {
        History::find()
            .filter(history_entry::Column::Serial.eq(self.serial.clone()))
            .order_by_desc(history_entry::Column::ChangeTime)
            .all(db)
            .await
            .map_err(InventoryError::db_error)
    }
}
