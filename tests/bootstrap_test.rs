//! End-to-end bootstrap against a file-backed database: connection,
//! auto-migration, sentinel seeding, and a first mutation.

use pos_inventory::{
    bootstrap,
    commands::{devices::CreateDeviceCommand, locations::CreateLocationCommand},
    AppConfig,
};
use tempfile::TempDir;

#[tokio::test]
async fn bootstrap_migrates_and_seeds_a_file_backed_database() {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("poshardware.db");

    let config = AppConfig::new(format!("sqlite://{}?mode=rwc", db_path.display()));
    let (state, mut events) = bootstrap(config).await.expect("bootstrap");
    tokio::spawn(async move { while events.recv().await.is_some() {} });

    // Sentinel locations come from the migrator, before any user write.
    let locations = state
        .inventory_service
        .locations()
        .await
        .expect("locations");
    let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
    assert!(names.contains(&"E-WASTED"));
    assert!(names.contains(&"UNKNOWN"));

    // The freshly migrated store accepts a full create flow.
    state
        .inventory_service
        .create_location(CreateLocationCommand {
            name: "BAR".to_string(),
            image: None,
            is_storage: false,
        })
        .await
        .expect("location");
    state
        .inventory_service
        .create_device_type(pos_inventory::commands::catalog::CreateDeviceTypeCommand {
            name: "Terminal".to_string(),
            image: None,
        })
        .await
        .expect("device type");

    let result = state
        .inventory_service
        .create_device(CreateDeviceCommand {
            serial: "SN-1".to_string(),
            pos: "Toast".to_string(),
            location: "BAR".to_string(),
            device_type: "Terminal".to_string(),
            friendly_name: None,
            notes: None,
            image: None,
        })
        .await
        .expect("device");
    assert!(result.message.contains("BAR"));

    let overview = state.inventory_service.overview().await.expect("overview");
    assert_eq!(overview.total_devices, 1);
    assert_eq!(overview.active_devices, 1);
}
