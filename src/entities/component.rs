use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A hardware component, keyed by serial number. `connected` holds the
/// serial of the device it is physically attached to; NULL means
/// standalone.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "components")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub serial: String,
    pub pos: String,
    pub location: String,
    pub component_type: String,
    pub connected: Option<String>,
    pub notes: Option<String>,
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
        belongs_to = "super::component_type::Entity",
        from = "Column::ComponentType",
        to = "super::component_type::Column::Name"
    )]
    ComponentType,
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::Connected",
        to = "super::device::Column::Serial"
    )]
    ConnectedDevice,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::component_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComponentType.def()
    }
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConnectedDevice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
