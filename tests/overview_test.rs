//! Overview accounting, report scopes, and snapshot-cache behavior
//! against a live database.

mod common;

use chrono::Utc;
use common::{new_component, new_device, TestApp};
use pos_inventory::{
    commands::devices::UpdateDeviceCommand,
    entities::device,
    queries::reports::ReportScope,
};
use sea_orm::{ActiveModelTrait, Set};

fn move_to(serial: &str, location: &str) -> UpdateDeviceCommand {
    UpdateDeviceCommand {
        serial: serial.to_string(),
        pos: "Toast".to_string(),
        location: location.to_string(),
        friendly_name: None,
        notes: None,
        image: None,
        cascade_to_connected: false,
    }
}

#[tokio::test]
async fn storage_accounting_joins_against_the_storage_flag() {
    let app = TestApp::with_catalog(&[("WAREHOUSE", true), ("FLOOR", false)]).await;

    app.service
        .create_device(new_device("SN-1", "WAREHOUSE"))
        .await
        .expect("device");
    app.service
        .create_device(new_device("SN-2", "WAREHOUSE"))
        .await
        .expect("device");
    app.service
        .create_device(new_device("SN-3", "FLOOR"))
        .await
        .expect("device");
    app.service
        .create_component(new_component("CMP-1", "WAREHOUSE"))
        .await
        .expect("component");

    let overview = app.service.overview().await.expect("overview");
    // Exactly the rows at WAREHOUSE, independent of the FLOOR count.
    assert_eq!(overview.stored_assets, 3);
    assert_eq!(overview.total_devices, 3);
    assert_eq!(overview.total_components, 1);
}

#[tokio::test]
async fn sentinel_locations_drive_active_unknown_and_wasted_counts() {
    let app = TestApp::with_catalog(&[("FLOOR", false)]).await;

    for serial in ["SN-1", "SN-2", "SN-3"] {
        app.service
            .create_device(new_device(serial, "FLOOR"))
            .await
            .expect("device");
    }

    // The sentinels are seeded by the migrator; retiring is just a move.
    app.service
        .update_device(move_to("SN-1", "E-WASTED"))
        .await
        .expect("retire");
    app.service
        .update_device(move_to("SN-2", "UNKNOWN"))
        .await
        .expect("lose track");

    let overview = app.service.overview().await.expect("overview");
    assert_eq!(overview.total_devices, 3);
    assert_eq!(overview.active_devices, 2);
    assert_eq!(overview.wasted_assets, 1);
    assert_eq!(overview.unknown_assets, 1);
}

#[tokio::test]
async fn change_window_counts_every_fresh_history_row() {
    let app = TestApp::with_catalog(&[("FLOOR", false)]).await;

    app.service
        .create_device(new_device("SN-1", "FLOOR"))
        .await
        .expect("device");
    app.service
        .update_device(move_to("SN-1", "FLOOR"))
        .await
        .expect("update");

    let history_len = app.service.history().await.expect("history").len();
    let overview = app.service.overview().await.expect("overview");
    // Everything just happened, so the whole trail is inside the window.
    assert_eq!(overview.changes_in_window, history_len);
    assert_eq!(overview.window_hours, 24);
}

#[tokio::test]
async fn missing_photo_counts_track_null_image_references() {
    let app = TestApp::with_catalog(&[("FLOOR", false)]).await;

    let mut with_photo = new_device("SN-1", "FLOOR");
    with_photo.image = Some("SN-1.jpg".to_string());
    app.service.create_device(with_photo).await.expect("device");
    app.service
        .create_device(new_device("SN-2", "FLOOR"))
        .await
        .expect("device");
    app.service
        .create_component(new_component("CMP-1", "FLOOR"))
        .await
        .expect("component");

    let overview = app.service.overview().await.expect("overview");
    assert_eq!(overview.devices_without_photo, 1);
    assert_eq!(overview.components_without_photo, 1);
}

#[tokio::test]
async fn report_scopes_slice_by_the_ewaste_sentinel() {
    let app = TestApp::with_catalog(&[("FLOOR", false), ("KITCHEN", false)]).await;

    app.service
        .create_device(new_device("SN-KEEP", "FLOOR"))
        .await
        .expect("device");
    app.service
        .create_device(new_device("SN-TOSS", "FLOOR"))
        .await
        .expect("device");
    app.service
        .update_device(move_to("SN-KEEP", "KITCHEN"))
        .await
        .expect("move");
    app.service
        .update_device(move_to("SN-TOSS", "E-WASTED"))
        .await
        .expect("retire");

    let full = app.service.report(ReportScope::Full).await.expect("full");
    assert_eq!(full.devices.len(), 2);

    let ewaste = app.service.report(ReportScope::EWaste).await.expect("ewaste");
    assert_eq!(ewaste.devices.len(), 1);
    assert_eq!(ewaste.devices[0].serial, "SN-TOSS");
    assert!(ewaste
        .history
        .iter()
        .all(|h| h.previous_location.as_deref() == Some("E-WASTED")
            || h.new_location.as_deref() == Some("E-WASTED")));
    assert!(!ewaste.history.is_empty());

    let active = app.service.report(ReportScope::Active).await.expect("active");
    assert_eq!(active.devices.len(), 1);
    assert_eq!(active.devices[0].serial, "SN-KEEP");
    // SQL `!=` drops rows with a NULL side (creation entries) as well as
    // anything touching E-WASTED.
    assert!(active.history.iter().all(|h| {
        h.previous_location.as_deref().is_some_and(|l| l != "E-WASTED")
            && h.new_location.as_deref().is_some_and(|l| l != "E-WASTED")
    }));
}

#[tokio::test]
async fn snapshots_are_memoized_until_invalidated() {
    let app = TestApp::with_catalog(&[("FLOOR", false)]).await;

    app.service
        .create_device(new_device("SN-1", "FLOOR"))
        .await
        .expect("device");

    // Warm the cache.
    assert_eq!(app.service.devices().await.expect("devices").len(), 1);

    // Write behind the service's back: the snapshot must stay stale.
    device::ActiveModel {
        serial: Set("SN-BACKDOOR".to_string()),
        pos: Set("Toast".to_string()),
        location: Set("FLOOR".to_string()),
        device_type: Set("Terminal".to_string()),
        friendly_name: Set(None),
        notes: Set(None),
        image: Set(None),
        last_edit: Set(Utc::now()),
    }
    .insert(app.db.as_ref())
    .await
    .expect("backdoor insert");

    assert_eq!(app.service.devices().await.expect("devices").len(), 1);

    // The refresh button invalidates everything.
    app.service.refresh().await.expect("refresh");
    assert_eq!(app.service.devices().await.expect("devices").len(), 2);
}

#[tokio::test]
async fn mutations_through_the_service_invalidate_the_cache() {
    let app = TestApp::with_catalog(&[("FLOOR", false)]).await;

    assert_eq!(app.service.devices().await.expect("devices").len(), 0);

    app.service
        .create_device(new_device("SN-1", "FLOOR"))
        .await
        .expect("device");

    // No manual refresh needed after a service mutation.
    assert_eq!(app.service.devices().await.expect("devices").len(), 1);
}
