use crate::{
    commands::{ensure_device_type_exists, ensure_location_exists, Command},
    common::{normalize_display_name, normalize_notes},
    db::DbPool,
    entities::{
        device,
        history_entry::{self, ChangeLog},
    },
    errors::InventoryError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDeviceCommand {
    #[validate(length(min = 1))]
    pub serial: String,
    #[validate(length(min = 1))]
    pub pos: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub device_type: String,
    pub friendly_name: Option<String>,
    pub notes: Option<String>,
    /// Opaque image reference produced by the image subsystem.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeviceResult {
    pub operation_id: Uuid,
    pub serial: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
impl Command for CreateDeviceCommand {
    type Result = CreateDeviceResult;

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
        let created = self.insert_device_in_db(db).await?;
        self.log_and_trigger_event(&event_sender, &created).await?;
        Ok(created)
    }
}

impl CreateDeviceCommand {
    async fn insert_device_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<CreateDeviceResult, InventoryError> {
        let serial = self.serial.clone();
        let pos = self.pos.clone();
        let location = self.location.clone();
        let device_type = self.device_type.clone();
        let friendly_name = normalize_display_name(self.friendly_name.as_deref());
        let notes = normalize_notes(self.notes.as_deref());
        let image = self.image.clone();

        db.transaction::<_, CreateDeviceResult, InventoryError>(|txn| {
            Box::pin(async move {
                if device::Entity::find_by_id(serial.clone())
                    .one(txn)
                    .await?
                    .is_some()
                {
                    return Err(InventoryError::DuplicateSerial(serial));
                }

                ensure_location_exists(txn, &location).await?;
                ensure_device_type_exists(txn, &device_type).await?;

                let now = Utc::now();

                device::ActiveModel {
                    serial: Set(serial.clone()),
                    pos: Set(pos),
                    location: Set(location.clone()),
                    device_type: Set(device_type.clone()),
                    friendly_name: Set(friendly_name.clone()),
                    notes: Set(notes.clone()),
                    image: Set(image.clone()),
                    last_edit: Set(now),
                }
                .insert(txn)
                .await?;

                // New assets have no previous state: only new-side fields.
                history_entry::ActiveModel {
                    change_time: Set(now),
                    serial: Set(Some(serial.clone())),
                    new_location: Set(Some(location.clone())),
                    new_friendly_name: Set(friendly_name.clone()),
                    new_notes: Set(notes),
                    new_photo: Set(image),
                    change_log: Set(ChangeLog::NewDevice.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let display_name = friendly_name.unwrap_or_else(|| serial.clone());
                Ok(CreateDeviceResult {
                    operation_id: Uuid::new_v4(),
                    serial,
                    created_at: now,
                    message: format!(
                        "A new {} ({}) was added successfully to {}!",
                        device_type, display_name, location
                    ),
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => InventoryError::DatabaseError(db_err),
            TransactionError::Transaction(inventory_err) => inventory_err,
        })
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        result: &CreateDeviceResult,
    ) -> Result<(), InventoryError> {
        info!(
            serial = %result.serial,
            location = %self.location,
            device_type = %self.device_type,
            "Device created successfully"
        );
        event_sender
            .send(Event::DeviceCreated {
                serial: result.serial.clone(),
            })
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for device creation: {}", e);
                error!("{}", msg);
                InventoryError::EventError(msg)
            })
    }
}
