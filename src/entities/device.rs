use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A point-of-sale device, keyed by serial number. Never hard-deleted:
/// retirement is a move to the E-WASTED location.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub serial: String,
    pub pos: String,
    pub location: String,
    pub device_type: String,
    /// Display attribute only — cross-references always use the serial.
    pub friendly_name: Option<String>,
    pub notes: Option<String>,
    /// Opaque image reference; byte handling lives outside the core.
    pub image: Option<String>,
    pub last_edit: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::Location",
        to = "super::location::Column::Name"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::device_type::Entity",
        from = "Column::DeviceType",
        to = "super::device_type::Column::Name"
    )]
    DeviceType,
    #[sea_orm(has_many = "super::component::Entity")]
    Components,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::device_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceType.def()
    }
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
