use crate::{
    common::normalize_display_name,
    db::DbPool,
    entities::{component_type, device, device_type, location},
    errors::InventoryError,
    events::EventSender,
};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::sync::Arc;

pub mod catalog;
pub mod components;
pub mod devices;
pub mod locations;

/// Command trait for implementing the Command Pattern
///
/// Encapsulates all the logic needed to execute one user operation into a
/// single object that can be validated, executed, and produce events. The
/// entity write and its paired history append always share one database
/// transaction.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command with the given dependencies
    ///
    /// # Arguments
    /// * `db_pool` - Database connection pool for persistence operations
    /// * `event_sender` - Channel to publish domain events
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, InventoryError>;
}

/// Referenced locations must already exist in the catalog; the form layer
/// offers only existing names, so a miss means stale input.
pub(crate) async fn ensure_location_exists<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<(), InventoryError> {
    location::Entity::find_by_id(name.to_string())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| InventoryError::NotFound(format!("Location {} not found", name)))
}

pub(crate) async fn ensure_device_type_exists<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<(), InventoryError> {
    device_type::Entity::find_by_id(name.to_string())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| InventoryError::NotFound(format!("Device type {} not found", name)))
}

pub(crate) async fn ensure_component_type_exists<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<(), InventoryError> {
    component_type::Entity::find_by_id(name.to_string())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| InventoryError::NotFound(format!("Component type {} not found", name)))
}

/// Resolves a device friendly-name selection to the device's serial.
///
/// The friendly name is display-only; the persisted reference is always
/// the serial. An empty selection means standalone. A named selection
/// that no longer resolves is an error — never a silent NULL.
pub(crate) async fn resolve_connected_serial<C: ConnectionTrait>(
    conn: &C,
    selection: Option<&str>,
) -> Result<Option<String>, InventoryError> {
    let name = match normalize_display_name(selection) {
        Some(name) => name,
        None => return Ok(None),
    };

    let connected = device::Entity::find()
        .filter(device::Column::FriendlyName.eq(name.clone()))
        .one(conn)
        .await?
        .ok_or_else(|| {
            InventoryError::ResolutionError(format!(
                "No device resolves from friendly name {}",
                name
            ))
        })?;

    Ok(Some(connected.serial))
}
