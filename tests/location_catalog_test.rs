//! Location and type-catalog behavior:
//! - duplicate names rejected with exactly one surviving row
//! - storage flag picks the NEW STORAGE LOCATION label
//! - location updates compose a human-readable note and keep the image
//!   when none is supplied
//! - catalog labels embed the created name

mod common;

use assert_matches::assert_matches;
use common::TestApp;
use pos_inventory::{
    commands::{
        catalog::{CreateComponentTypeCommand, CreateDeviceTypeCommand},
        locations::{CreateLocationCommand, UpdateLocationCommand},
    },
    InventoryError,
};

#[tokio::test]
async fn duplicate_location_name_is_rejected_leaving_one_row() {
    let app = TestApp::new().await;
    app.seed_location("BAR", false).await;

    let err = app
        .service
        .create_location(CreateLocationCommand {
            name: "BAR".to_string(),
            image: None,
            is_storage: true,
        })
        .await
        .unwrap_err();
    assert_matches!(err, InventoryError::DuplicateName(name) if name == "BAR");

    let locations = app.service.locations().await.expect("locations");
    let bars: Vec<_> = locations.iter().filter(|l| l.name == "BAR").collect();
    assert_eq!(bars.len(), 1);
    // The rejected create must not have flipped the flag.
    assert!(!bars[0].is_storage);
}

#[tokio::test]
async fn storage_flag_selects_the_storage_creation_label() {
    let app = TestApp::new().await;
    app.seed_location("WAREHOUSE", true).await;
    app.seed_location("FLOOR", false).await;

    let history = app.service.history().await.expect("history");
    let labels: Vec<&str> = history.iter().map(|h| h.change_log.as_str()).collect();
    assert!(labels.contains(&"NEW STORAGE LOCATION"));
    assert!(labels.contains(&"NEW LOCATION"));

    let warehouse_entry = history
        .iter()
        .find(|h| h.new_location.as_deref() == Some("WAREHOUSE"))
        .expect("warehouse history");
    assert_eq!(warehouse_entry.change_log, "NEW STORAGE LOCATION");
}

#[tokio::test]
async fn location_update_composes_note_and_keeps_unreplaced_image() {
    let app = TestApp::new().await;
    app.seed_location("BAR", false).await;

    // First update: add an image to a location that has none.
    let result = app
        .service
        .update_location(UpdateLocationCommand {
            name: "BAR".to_string(),
            new_image: Some("BAR_2024-06-01.jpg".to_string()),
            is_storage: false,
        })
        .await
        .expect("update");
    assert_eq!(result.message, "BAR image added!");

    // Second update: only the storage flag changes; the image is kept.
    let result = app
        .service
        .update_location(UpdateLocationCommand {
            name: "BAR".to_string(),
            new_image: None,
            is_storage: true,
        })
        .await
        .expect("update");
    assert_eq!(result.message, "BAR is now a storage location");

    let location = app
        .service
        .locations()
        .await
        .expect("locations")
        .into_iter()
        .find(|l| l.name == "BAR")
        .expect("BAR");
    assert!(location.is_storage);
    assert_eq!(location.image.as_deref(), Some("BAR_2024-06-01.jpg"));

    // Third update: nothing observable changed — the exhaustive default.
    let result = app
        .service
        .update_location(UpdateLocationCommand {
            name: "BAR".to_string(),
            new_image: None,
            is_storage: true,
        })
        .await
        .expect("update");
    assert_eq!(result.message, "BAR location updated");

    // Every update appended one LOCATION UPDATE row carrying its note.
    let notes: Vec<_> = app
        .service
        .history()
        .await
        .expect("history")
        .into_iter()
        .filter(|h| h.change_log == "LOCATION UPDATE")
        .filter_map(|h| h.new_notes)
        .collect();
    assert_eq!(notes.len(), 3);
    assert!(notes.contains(&"BAR image added!".to_string()));
    assert!(notes.contains(&"BAR is now a storage location".to_string()));
    assert!(notes.contains(&"BAR location updated".to_string()));
}

#[tokio::test]
async fn updating_a_missing_location_fails_with_not_found() {
    let app = TestApp::new().await;

    let err = app
        .service
        .update_location(UpdateLocationCommand {
            name: "ROOFTOP".to_string(),
            new_image: None,
            is_storage: false,
        })
        .await
        .unwrap_err();
    assert_matches!(err, InventoryError::NotFound(msg) if msg.contains("ROOFTOP"));
}

#[tokio::test]
async fn catalog_creation_labels_embed_the_name() {
    let app = TestApp::new().await;
    app.seed_device_type("Terminal").await;
    app.seed_component_type("Card Reader").await;

    let labels: Vec<String> = app
        .service
        .history()
        .await
        .expect("history")
        .into_iter()
        .map(|h| h.change_log)
        .collect();
    assert!(labels.contains(&"NEW DEVICE TYPE: Terminal".to_string()));
    assert!(labels.contains(&"NEW COMPONENT TYPE: Card Reader".to_string()));
}

#[tokio::test]
async fn duplicate_catalog_names_are_rejected() {
    let app = TestApp::new().await;
    app.seed_device_type("Terminal").await;
    app.seed_component_type("Card Reader").await;

    let err = app
        .service
        .create_device_type(CreateDeviceTypeCommand {
            name: "Terminal".to_string(),
            image: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, InventoryError::DuplicateName(name) if name == "Terminal");

    let err = app
        .service
        .create_component_type(CreateComponentTypeCommand {
            name: "Card Reader".to_string(),
            image: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, InventoryError::DuplicateName(name) if name == "Card Reader");

    assert_eq!(app.service.device_types().await.expect("types").len(), 1);
    assert_eq!(app.service.component_types().await.expect("types").len(), 1);
}
