use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Append-only audit row. Every mutation writes exactly one entry in the
/// same transaction as the entity write; nothing in the crate updates or
/// deletes rows here.
///
/// The column set is the superset of the device and component update
/// shapes — previous/new fields are nullable per row depending on which
/// kind of entity changed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub change_time: DateTimeUtc,
    /// Serial of the affected asset; NULL for location/catalog changes.
    pub serial: Option<String>,
    pub previous_location: Option<String>,
    pub previous_friendly_name: Option<String>,
    pub previous_connection: Option<String>,
    pub previous_notes: Option<String>,
    pub previous_photo: Option<String>,
    pub new_location: Option<String>,
    pub new_friendly_name: Option<String>,
    pub new_connection: Option<String>,
    pub new_notes: Option<String>,
    pub new_photo: Option<String>,
    pub change_log: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The fixed change-log vocabulary. Rendered labels are stored verbatim
/// in `history.change_log`; the catalog labels embed the created name.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ChangeLog {
    #[strum(to_string = "NEW DEVICE")]
    NewDevice,
    #[strum(to_string = "NEW COMPONENT")]
    NewComponent,
    #[strum(to_string = "NEW LOCATION")]
    NewLocation,
    #[strum(to_string = "NEW STORAGE LOCATION")]
    NewStorageLocation,
    #[strum(to_string = "DEVICE UPDATE")]
    DeviceUpdate,
    #[strum(to_string = "COMPONENT UPDATE")]
    ComponentUpdate,
    #[strum(to_string = "COMPONENT UPDATE FROM CONNECTED DEVICE")]
    ComponentUpdateFromConnectedDevice,
    #[strum(to_string = "LOCATION UPDATE")]
    LocationUpdate,
    #[strum(to_string = "NEW DEVICE TYPE: {name}")]
    NewDeviceType { name: String },
    #[strum(to_string = "NEW COMPONENT TYPE: {name}")]
    NewComponentType { name: String },
}

#[cfg(test)]
mod tests {
    use super::ChangeLog;

    #[test]
    fn labels_match_the_stored_vocabulary() {
        assert_eq!(ChangeLog::NewDevice.to_string(), "NEW DEVICE");
        assert_eq!(
            ChangeLog::ComponentUpdateFromConnectedDevice.to_string(),
            "COMPONENT UPDATE FROM CONNECTED DEVICE"
        );
        assert_eq!(
            ChangeLog::NewStorageLocation.to_string(),
            "NEW STORAGE LOCATION"
        );
    }

    #[test]
    fn catalog_labels_embed_the_name() {
        let label = ChangeLog::NewDeviceType {
            name: "Terminal".to_string(),
        };
        assert_eq!(label.to_string(), "NEW DEVICE TYPE: Terminal");

        let label = ChangeLog::NewComponentType {
            name: "Card Reader".to_string(),
        };
        assert_eq!(label.to_string(), "NEW COMPONENT TYPE: Card Reader");
    }
}
