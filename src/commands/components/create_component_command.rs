use crate::{
    commands::{
        ensure_component_type_exists, ensure_location_exists, resolve_connected_serial, Command,
    },
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
pub struct CreateComponentCommand {
    #[validate(length(min = 1))]
    pub serial: String,
    #[validate(length(min = 1))]
    pub pos: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub component_type: String,
    /// Friendly-name selection of the device this component is attached
    /// to; empty means standalone. Resolved to a serial before persisting.
    pub connected_device: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponentResult {
    pub operation_id: Uuid,
    pub serial: String,
    /// Serial of the connected device, when one was selected.
    pub connected: Option<String>,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
impl Command for CreateComponentCommand {
    type Result = CreateComponentResult;

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
        let created = self.insert_component_in_db(db).await?;
        self.log_and_trigger_event(&event_sender, &created).await?;
        Ok(created)
    }
}

impl CreateComponentCommand {
    async fn insert_component_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<CreateComponentResult, InventoryError> {
        let serial = self.serial.clone();
        let pos = self.pos.clone();
        let location = self.location.clone();
        let component_type = self.component_type.clone();
        let connected_device = self.connected_device.clone();
        let notes = normalize_notes(self.notes.as_deref());
        let image = self.image.clone();

        db.transaction::<_, CreateComponentResult, InventoryError>(|txn| {
            Box::pin(async move {
                if component::Entity::find_by_id(serial.clone())
                    .one(txn)
                    .await?
                    .is_some()
                {
                    return Err(InventoryError::DuplicateSerial(serial));
                }

                ensure_location_exists(txn, &location).await?;
                ensure_component_type_exists(txn, &component_type).await?;

                let connected =
                    resolve_connected_serial(txn, connected_device.as_deref()).await?;
                let now = Utc::now();

                component::ActiveModel {
                    serial: Set(serial.clone()),
                    pos: Set(pos),
                    location: Set(location.clone()),
                    component_type: Set(component_type.clone()),
                    connected: Set(connected.clone()),
                    notes: Set(notes.clone()),
                    image: Set(image.clone()),
                    last_edit: Set(now),
                }
                .insert(txn)
                .await?;

                history_entry::ActiveModel {
                    change_time: Set(now),
                    serial: Set(Some(serial.clone())),
                    new_location: Set(Some(location.clone())),
                    new_connection: Set(connected.clone()),
                    new_notes: Set(notes),
                    new_photo: Set(image),
                    change_log: Set(ChangeLog::NewComponent.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(CreateComponentResult {
                    operation_id: Uuid::new_v4(),
                    serial: serial.clone(),
                    connected,
                    created_at: now,
                    message: format!(
                        "A new {} ({}) was added successfully to {}!",
                        component_type, serial, location
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
        result: &CreateComponentResult,
    ) -> Result<(), InventoryError> {
        info!(
            serial = %result.serial,
            location = %self.location,
            component_type = %self.component_type,
            connected = result.connected.as_deref().unwrap_or("-"),
            "Component created successfully"
        );
        event_sender
            .send(Event::ComponentCreated {
                serial: result.serial.clone(),
            })
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for component creation: {}", e);
                error!("{}", msg);
                InventoryError::EventError(msg)
            })
    }
}
