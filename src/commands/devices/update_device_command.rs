use crate::{
    commands::{ensure_location_exists, Command},
    common::{normalize_display_name, normalize_notes},
    db::DbPool,
    entities::{
        component, device,
        history_entry::{self, ChangeLog},
    },
    errors::{CascadeFailure, InventoryError},
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDeviceCommand {
    #[validate(length(min = 1))]
    pub serial: String,
    #[validate(length(min = 1))]
    pub pos: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub friendly_name: Option<String>,
    pub notes: Option<String>,
    /// `None` keeps the stored photo; `Some` replaces it.
    pub image: Option<String>,
    /// Move every component connected to this device along with it.
    pub cascade_to_connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDeviceResult {
    pub operation_id: Uuid,
    pub serial: String,
    pub previous_location: String,
    pub new_location: String,
    /// Serials of components moved by the cascade, in write order.
    pub cascaded_components: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
impl Command for UpdateDeviceCommand {
    type Result = UpdateDeviceResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, InventoryError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            InventoryError::ValidationError(msg)
        })?;

        let db = db_pool.as_ref();
        let updated = self.update_device_in_db(db).await?;
        self.log_and_trigger_events(&event_sender, &updated).await?;
        Ok(updated)
    }
}

impl UpdateDeviceCommand {
    async fn update_device_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<UpdateDeviceResult, InventoryError> {
        let serial = self.serial.clone();
        let pos = self.pos.clone();
        let location = self.location.clone();
        let friendly_name = normalize_display_name(self.friendly_name.as_deref());
        let notes = normalize_notes(self.notes.as_deref());
        let image = self.image.clone();
        let cascade = self.cascade_to_connected;

        db.transaction::<_, UpdateDeviceResult, InventoryError>(|txn| {
            Box::pin(async move {
                let old = device::Entity::find_by_id(serial.clone())
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        InventoryError::NotFound(format!("Device {} not found", serial))
                    })?;

                ensure_location_exists(txn, &location).await?;

                let now = Utc::now();
                let location_changed = location != old.location;

                // The cascade runs first, against pre-update state, so each
                // component history records the component's own prior values.
                let cascaded_components = if cascade && location_changed {
                    cascade_component_locations(txn, &serial, &location, now).await?
                } else {
                    Vec::new()
                };

                // None on the image means "no new upload": the stored photo
                // reference is kept, not cleared.
                let image = image.or_else(|| old.image.clone());

                let mut active: device::ActiveModel = old.clone().into();
                active.pos = Set(pos);
                active.location = Set(location.clone());
                active.friendly_name = Set(friendly_name.clone());
                active.notes = Set(notes.clone());
                active.image = Set(image.clone());
                active.last_edit = Set(now);
                active.update(txn).await?;

                history_entry::ActiveModel {
                    change_time: Set(now),
                    serial: Set(Some(serial.clone())),
                    previous_location: Set(Some(old.location.clone())),
                    previous_friendly_name: Set(old.friendly_name.clone()),
                    previous_notes: Set(old.notes.clone()),
                    previous_photo: Set(old.image.clone()),
                    new_location: Set(Some(location.clone())),
                    new_friendly_name: Set(friendly_name.clone()),
                    new_notes: Set(notes),
                    new_photo: Set(image),
                    change_log: Set(ChangeLog::DeviceUpdate.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let display_name = friendly_name.unwrap_or_else(|| serial.clone());
                Ok(UpdateDeviceResult {
                    operation_id: Uuid::new_v4(),
                    serial: serial.clone(),
                    previous_location: old.location,
                    new_location: location,
                    cascaded_components,
                    updated_at: now,
                    message: format!("Device {} ({}) updated successfully!", display_name, serial),
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => InventoryError::DatabaseError(db_err),
            TransactionError::Transaction(inventory_err) => inventory_err,
        })
    }

    async fn log_and_trigger_events(
        &self,
        event_sender: &EventSender,
        result: &UpdateDeviceResult,
    ) -> Result<(), InventoryError> {
        let location_changed = result.previous_location != result.new_location;
        info!(
            serial = %result.serial,
            previous_location = %result.previous_location,
            new_location = %result.new_location,
            cascaded = result.cascaded_components.len(),
            "Device updated successfully"
        );

        for component_serial in &result.cascaded_components {
            event_sender
                .send(Event::ComponentCascaded {
                    serial: component_serial.clone(),
                    device_serial: result.serial.clone(),
                })
                .await
                .map_err(InventoryError::EventError)?;
        }

        event_sender
            .send(Event::DeviceUpdated {
                serial: result.serial.clone(),
                location_changed,
            })
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for device update: {}", e);
                error!("{}", msg);
                InventoryError::EventError(msg)
            })
    }
}

/// Moves every component connected to `parent_serial` to `new_location`,
/// appending one history row per component that records that component's
/// own pre-cascade state. A failure on any component aborts the enclosing
/// transaction and names the component, instead of reporting a blanket
/// success.
async fn cascade_component_locations(
    txn: &DatabaseTransaction,
    parent_serial: &str,
    new_location: &str,
    now: DateTime<Utc>,
) -> Result<Vec<String>, InventoryError> {
    let connected = component::Entity::find()
        .filter(component::Column::Connected.eq(parent_serial))
        .all(txn)
        .await?;

    let mut cascaded = Vec::with_capacity(connected.len());
    for previous in connected {
        let component_serial = previous.serial.clone();

        let mut active: component::ActiveModel = previous.clone().into();
        active.location = Set(new_location.to_string());
        active.last_edit = Set(now);
        let write = active.update(txn).await.map(|_| ());

        let write = match write {
            Ok(()) => history_entry::ActiveModel {
                change_time: Set(now),
                serial: Set(Some(component_serial.clone())),
                previous_location: Set(Some(previous.location.clone())),
                previous_connection: Set(previous.connected.clone()),
                previous_notes: Set(previous.notes.clone()),
                previous_photo: Set(previous.image.clone()),
                new_location: Set(Some(new_location.to_string())),
                new_connection: Set(previous.connected.clone()),
                new_notes: Set(previous.notes.clone()),
                new_photo: Set(previous.image.clone()),
                change_log: Set(ChangeLog::ComponentUpdateFromConnectedDevice.to_string()),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = write {
            error!(
                component = %component_serial,
                device = %parent_serial,
                error = %e,
                "Cascaded location update failed; rolling back"
            );
            return Err(InventoryError::PartialCascadeFailure {
                device_serial: parent_serial.to_string(),
                failures: vec![CascadeFailure {
                    serial: component_serial,
                    reason: e.to_string(),
                }],
            });
        }

        cascaded.push(component_serial);
    }

    Ok(cascaded)
}
