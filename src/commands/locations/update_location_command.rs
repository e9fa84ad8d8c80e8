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
pub struct UpdateLocationCommand {
    #[validate(length(min = 1))]
    pub name: String,
    /// `None` keeps the stored image; `Some` replaces it.
    pub new_image: Option<String>,
    pub is_storage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLocationResult {
    pub operation_id: Uuid,
    pub name: String,
    pub is_storage: bool,
    pub updated_at: DateTime<Utc>,
    /// The composed change note, also recorded in history.
    pub message: String,
}

#[async_trait::async_trait]
impl Command for UpdateLocationCommand {
    type Result = UpdateLocationResult;

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
        let updated = self.update_location_in_db(db).await?;

        info!(
            name = %updated.name,
            is_storage = updated.is_storage,
            note = %updated.message,
            "Location updated successfully"
        );
        event_sender
            .send(Event::LocationUpdated {
                name: updated.name.clone(),
            })
            .await
            .map_err(InventoryError::EventError)?;

        Ok(updated)
    }
}

impl UpdateLocationCommand {
    async fn update_location_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<UpdateLocationResult, InventoryError> {
        let name = self.name.clone();
        let new_image = self.new_image.clone();
        let is_storage = self.is_storage;

        db.transaction::<_, UpdateLocationResult, InventoryError>(|txn| {
            Box::pin(async move {
                let old = location::Entity::find_by_id(name.clone())
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        InventoryError::NotFound(format!("Location {} not found", name))
                    })?;

                let note = compose_change_note(
                    &name,
                    new_image.is_some(),
                    old.image.is_some(),
                    old.is_storage,
                    is_storage,
                );

                let image = new_image.or_else(|| old.image.clone());
                let now = Utc::now();

                let mut active: location::ActiveModel = old.into();
                active.image = Set(image.clone());
                active.is_storage = Set(is_storage);
                active.update(txn).await?;

                history_entry::ActiveModel {
                    change_time: Set(now),
                    new_notes: Set(Some(note.clone())),
                    new_photo: Set(image),
                    change_log: Set(ChangeLog::LocationUpdate.to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(UpdateLocationResult {
                    operation_id: Uuid::new_v4(),
                    name,
                    is_storage,
                    updated_at: now,
                    message: note,
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

/// Composes the human-readable change note from the cross of
/// (image added / image updated / unchanged) and (storage flag changed /
/// unchanged). Exhaustive: when nothing observable changed the note is a
/// generic "location updated".
fn compose_change_note(
    name: &str,
    image_uploaded: bool,
    had_image: bool,
    was_storage: bool,
    is_storage: bool,
) -> String {
    let image_verb = if had_image { "updated" } else { "added" };
    let storage_changed = was_storage != is_storage;

    match (image_uploaded, storage_changed) {
        (true, false) => format!("{} image {}!", name, image_verb),
        (true, true) => {
            if is_storage {
                format!(
                    "{} is now a storage location and its image has been {}!",
                    name, image_verb
                )
            } else {
                format!(
                    "{} is no longer a storage location and its image has been {}!",
                    name, image_verb
                )
            }
        }
        (false, true) => {
            if is_storage {
                format!("{} is now a storage location", name)
            } else {
                format!("{} is no longer a storage location", name)
            }
        }
        (false, false) => format!("{} location updated", name),
    }
}

#[cfg(test)]
mod tests {
    use super::compose_change_note;
    use test_case::test_case;

    #[test_case(true,  false, false, false, "BAR image added!")]
    #[test_case(true,  true,  false, false, "BAR image updated!")]
    #[test_case(true,  false, false, true,  "BAR is now a storage location and its image has been added!")]
    #[test_case(true,  true,  true,  false, "BAR is no longer a storage location and its image has been updated!")]
    #[test_case(false, false, false, true,  "BAR is now a storage location")]
    #[test_case(false, true,  true,  false, "BAR is no longer a storage location")]
    #[test_case(false, true,  true,  true,  "BAR location updated")]
    #[test_case(false, false, false, false, "BAR location updated")]
    fn change_note_matrix(
        image_uploaded: bool,
        had_image: bool,
        was_storage: bool,
        is_storage: bool,
        expected: &str,
    ) {
        assert_eq!(
            compose_change_note("BAR", image_uploaded, had_image, was_storage, is_storage),
            expected
        );
    }
}
