use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        device_type,
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
pub struct CreateDeviceTypeCommand {
    #[validate(length(min = 1))]
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeviceTypeResult {
    pub operation_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
impl Command for CreateDeviceTypeCommand {
    type Result = CreateDeviceTypeResult;

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
        let created = self.insert_device_type_in_db(db).await?;

        info!(name = %created.name, "Device type created successfully");
        event_sender
            .send(Event::DeviceTypeCreated {
                name: created.name.clone(),
            })
            .await
            .map_err(InventoryError::EventError)?;

        Ok(created)
    }
}

impl CreateDeviceTypeCommand {
    async fn insert_device_type_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<CreateDeviceTypeResult, InventoryError> {
        let name = self.name.clone();
        let image = self.image.clone();

        db.transaction::<_, CreateDeviceTypeResult, InventoryError>(|txn| {
            Box::pin(async move {
                if device_type::Entity::find_by_id(name.clone())
                    .one(txn)
                    .await?
                    .is_some()
                {
                    return Err(InventoryError::DuplicateName(name));
                }

                let now = Utc::now();

                device_type::ActiveModel {
                    name: Set(name.clone()),
                    image: Set(image.clone()),
                }
                .insert(txn)
                .await?;

                // Unlike other labels, the catalog label embeds the name.
                history_entry::ActiveModel {
                    change_time: Set(now),
                    new_photo: Set(image),
                    change_log: Set(ChangeLog::NewDeviceType { name: name.clone() }.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(CreateDeviceTypeResult {
                    operation_id: Uuid::new_v4(),
                    name: name.clone(),
                    created_at: now,
                    message: format!("{} has been created as a new device type!", name),
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => InventoryError::DatabaseError(db_err),
            TransactionError::Transaction(inventory_err) => inventory_err,
        })
    }
}
