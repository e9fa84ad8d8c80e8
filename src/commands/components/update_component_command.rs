use crate::{
    commands::{ensure_location_exists, resolve_connected_serial, Command},
    common::normalize_notes,
    db::DbPool,
    entities::{
        component,
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
pub struct UpdateComponentCommand {
    #[validate(length(min = 1))]
    pub serial: String,
    #[validate(length(min = 1))]
    pub pos: String,
    #[validate(length(min = 1))]
    pub location: String,
    /// Friendly-name selection of the device to connect to. Ignored when
    /// `break_connection` is set.
    pub connected_device: Option<String>,
    /// Forces the persisted connection to NULL regardless of the
    /// selection field.
    pub break_connection: bool,
    pub notes: Option<String>,
    /// `None` keeps the stored photo; `Some` replaces it.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateComponentResult {
    pub operation_id: Uuid,
    pub serial: String,
    pub previous_location: String,
    pub new_location: String,
    pub connected: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
impl Command for UpdateComponentCommand {
    type Result = UpdateComponentResult;

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
        let updated = self.update_component_in_db(db).await?;
        self.log_and_trigger_event(&event_sender, &updated).await?;
        Ok(updated)
    }
}

impl UpdateComponentCommand {
    async fn update_component_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<UpdateComponentResult, InventoryError> {
        let serial = self.serial.clone();
        let pos = self.pos.clone();
        let location = self.location.clone();
        let connected_device = self.connected_device.clone();
        let break_connection = self.break_connection;
        let notes = normalize_notes(self.notes.as_deref());
        let image = self.image.clone();

        db.transaction::<_, UpdateComponentResult, InventoryError>(|txn| {
            Box::pin(async move {
                let old = component::Entity::find_by_id(serial.clone())
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        InventoryError::NotFound(format!("Component {} not found", serial))
                    })?;

                ensure_location_exists(txn, &location).await?;

                // Breaking the connection wins over whatever the selection
                // field holds.
                let connected = if break_connection {
                    None
                } else {
                    resolve_connected_serial(txn, connected_device.as_deref()).await?
                };

                let now = Utc::now();
                let image = image.or_else(|| old.image.clone());

                let mut active: component::ActiveModel = old.clone().into();
                active.pos = Set(pos);
                active.location = Set(location.clone());
                active.connected = Set(connected.clone());
                active.notes = Set(notes.clone());
                active.image = Set(image.clone());
                active.last_edit = Set(now);
                active.update(txn).await?;

                history_entry::ActiveModel {
                    change_time: Set(now),
                    serial: Set(Some(serial.clone())),
                    previous_location: Set(Some(old.location.clone())),
                    previous_connection: Set(old.connected.clone()),
                    previous_notes: Set(old.notes.clone()),
                    previous_photo: Set(old.image.clone()),
                    new_location: Set(Some(location.clone())),
                    new_connection: Set(connected.clone()),
                    new_notes: Set(notes),
                    new_photo: Set(image),
                    change_log: Set(ChangeLog::ComponentUpdate.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(UpdateComponentResult {
                    operation_id: Uuid::new_v4(),
                    serial: serial.clone(),
                    previous_location: old.location,
                    new_location: location,
                    connected,
                    updated_at: now,
                    message: format!("Component ({}) saved successfully!", serial),
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
        result: &UpdateComponentResult,
    ) -> Result<(), InventoryError> {
        info!(
            serial = %result.serial,
            previous_location = %result.previous_location,
            new_location = %result.new_location,
            connected = result.connected.as_deref().unwrap_or("-"),
            "Component updated successfully"
        );
        event_sender
            .send(Event::ComponentUpdated {
                serial: result.serial.clone(),
            })
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for component update: {}", e);
                error!("{}", msg);
                InventoryError::EventError(msg)
            })
    }
}
