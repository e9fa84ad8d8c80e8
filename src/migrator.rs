use sea_orm_migration::prelude::*;

use crate::common::{EWASTE_LOCATION, UNKNOWN_LOCATION};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_locations_table::Migration),
            Box::new(m20240301_000002_create_device_types_table::Migration),
            Box::new(m20240301_000003_create_component_types_table::Migration),
            Box::new(m20240301_000004_create_devices_table::Migration),
            Box::new(m20240301_000005_create_components_table::Migration),
            Box::new(m20240301_000006_create_history_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_locations_table {
    use super::{EWASTE_LOCATION, UNKNOWN_LOCATION};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::Image).string().null())
                        .col(
                            ColumnDef::new(Locations::IsStorage)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            // Sentinel rows: retired assets and untracked assets both live
            // at named locations, so they must exist before the first write.
            for sentinel in [EWASTE_LOCATION, UNKNOWN_LOCATION] {
                let insert = Query::insert()
                    .into_table(Locations::Table)
                    .columns([Locations::Name, Locations::IsStorage])
                    .values_panic([sentinel.into(), false.into()])
                    .to_owned();
                manager.exec_stmt(insert).await?;
            }

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Name,
        Image,
        IsStorage,
    }
}

mod m20240301_000002_create_device_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_device_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeviceTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeviceTypes::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeviceTypes::Image).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeviceTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum DeviceTypes {
        Table,
        Name,
        Image,
    }
}

mod m20240301_000003_create_component_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_component_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ComponentTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ComponentTypes::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ComponentTypes::Image).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ComponentTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ComponentTypes {
        Table,
        Name,
        Image,
    }
}

mod m20240301_000004_create_devices_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_devices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Devices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Devices::Serial)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Devices::Pos).string().not_null())
                        .col(ColumnDef::new(Devices::Location).string().not_null())
                        .col(ColumnDef::new(Devices::DeviceType).string().not_null())
                        .col(ColumnDef::new(Devices::FriendlyName).string().null())
                        .col(ColumnDef::new(Devices::Notes).string().null())
                        .col(ColumnDef::new(Devices::Image).string().null())
                        .col(
                            ColumnDef::new(Devices::LastEdit)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_devices_location")
                                .from(Devices::Table, Devices::Location)
                                .to(Locations::Table, Locations::Name)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_devices_device_type")
                                .from(Devices::Table, Devices::DeviceType)
                                .to(DeviceTypes::Table, DeviceTypes::Name)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_devices_location")
                        .table(Devices::Table)
                        .col(Devices::Location)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Devices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Devices {
        Table,
        Serial,
        Pos,
        Location,
        DeviceType,
        FriendlyName,
        Notes,
        Image,
        LastEdit,
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum DeviceTypes {
        Table,
        Name,
    }
}

mod m20240301_000005_create_components_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_components_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Components::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Components::Serial)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Components::Pos).string().not_null())
                        .col(ColumnDef::new(Components::Location).string().not_null())
                        .col(
                            ColumnDef::new(Components::ComponentType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Components::Connected).string().null())
                        .col(ColumnDef::new(Components::Notes).string().null())
                        .col(ColumnDef::new(Components::Image).string().null())
                        .col(
                            ColumnDef::new(Components::LastEdit)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_components_location")
                                .from(Components::Table, Components::Location)
                                .to(Locations::Table, Locations::Name)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_components_component_type")
                                .from(Components::Table, Components::ComponentType)
                                .to(ComponentTypes::Table, ComponentTypes::Name)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_components_connected")
                                .from(Components::Table, Components::Connected)
                                .to(Devices::Table, Devices::Serial)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_components_location")
                        .table(Components::Table)
                        .col(Components::Location)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_components_connected")
                        .table(Components::Table)
                        .col(Components::Connected)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Components::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Components {
        Table,
        Serial,
        Pos,
        Location,
        ComponentType,
        Connected,
        Notes,
        Image,
        LastEdit,
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum ComponentTypes {
        Table,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Devices {
        Table,
        Serial,
    }
}

mod m20240301_000006_create_history_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000006_create_history_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Superset of the device and component update shapes; columns
            // are nullable per row depending on which kind of entity changed.
            manager
                .create_table(
                    Table::create()
                        .table(History::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(History::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(History::ChangeTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(History::Serial).string().null())
                        .col(ColumnDef::new(History::PreviousLocation).string().null())
                        .col(
                            ColumnDef::new(History::PreviousFriendlyName)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(History::PreviousConnection).string().null())
                        .col(ColumnDef::new(History::PreviousNotes).string().null())
                        .col(ColumnDef::new(History::PreviousPhoto).string().null())
                        .col(ColumnDef::new(History::NewLocation).string().null())
                        .col(ColumnDef::new(History::NewFriendlyName).string().null())
                        .col(ColumnDef::new(History::NewConnection).string().null())
                        .col(ColumnDef::new(History::NewNotes).string().null())
                        .col(ColumnDef::new(History::NewPhoto).string().null())
                        .col(ColumnDef::new(History::ChangeLog).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_history_change_time")
                        .table(History::Table)
                        .col(History::ChangeTime)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(History::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum History {
        Table,
        Id,
        ChangeTime,
        Serial,
        PreviousLocation,
        PreviousFriendlyName,
        PreviousConnection,
        PreviousNotes,
        PreviousPhoto,
        NewLocation,
        NewFriendlyName,
        NewConnection,
        NewNotes,
        NewPhoto,
        ChangeLog,
    }
}
