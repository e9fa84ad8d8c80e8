use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        history_entry::{self, ChangeLog},
        location,
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
pub struct CreateLocationCommand {
    #[validate(length(min = 1))]
    pub name: String,
    pub image: Option<String>,
    pub is_storage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocationResult {
    pub operation_id: Uuid,
    pub name: String,
    pub is_storage: bool,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
impl Command for CreateLocationCommand {
    type Result = CreateLocationResult;

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
        let created = self.insert_location_in_db(db).await?;

        info!(
            name = %created.name,
            is_storage = created.is_storage,
            "Location created successfully"
        );
        event_sender
            .send(Event::LocationCreated {
                name: created.name.clone(),
                is_storage: created.is_storage,
            })
            .await
            .map_err(InventoryError::EventError)?;

        Ok(created)
    }
}

impl CreateLocationCommand {
    async fn insert_location_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<CreateLocationResult, InventoryError> {
        let name = self.name.clone();
        let image = self.image.clone();
        let is_storage = self.is_storage;

        db.transaction::<_, CreateLocationResult, InventoryError>(|txn| {
            Box::pin(async move {
                if location::Entity::find_by_id(name.clone())
                    .one(txn)
                    .await?
                    .is_some()
                {
                    return Err(InventoryError::DuplicateName(name));
                }

                let now = Utc::now();

                location::ActiveModel {
                    name: Set(name.clone()),
                    image: Set(image.clone()),
                    is_storage: Set(is_storage),
                }
                .insert(txn)
                .await?;

                let change_log = if is_storage {
                    ChangeLog::NewStorageLocation
                } else {
                    ChangeLog::NewLocation
                };

                history_entry::ActiveModel {
                    change_time: Set(now),
                    new_location: Set(Some(name.clone())),
                    new_photo: Set(image),
                    change_log: Set(change_log.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(CreateLocationResult {
                    operation_id: Uuid::new_v4(),
                    name: name.clone(),
                    is_storage,
                    created_at: now,
                    message: format!("{} has been created as a new location!", name),
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
