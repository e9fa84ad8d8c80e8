use crate::errors::InventoryError;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

pub mod component_queries;
pub mod device_queries;
pub mod history_queries;
pub mod overview;
pub mod reports;

/// Read-side counterpart of the Command trait: a query object that
/// executes against the current state and never mutates it.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, InventoryError>;
}
