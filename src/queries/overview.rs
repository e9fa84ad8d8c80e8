//! Derived overview metrics: pure functions over current table
//! snapshots, computed on demand and never stored.
//!
//! Boundary semantics are deliberate and exact: the change window is
//! inclusive (`>=` against `now - window`) and sentinel location matches
//! are case- and value-exact.

use crate::{
    common::{EWASTE_LOCATION, UNKNOWN_LOCATION},
    entities::{component, device, history_entry, location},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Common view over the two trackable asset kinds.
pub trait LocatedAsset {
    fn location(&self) -> &str;
    fn image(&self) -> Option<&str>;
}

impl LocatedAsset for device::Model {
    fn location(&self) -> &str {
        &self.location
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl LocatedAsset for component::Model {
    fn location(&self) -> &str {
        &self.location
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Count of history entries with `change_time >= now - window`.
pub fn changes_in_window(
    history: &[history_entry::Model],
    now: DateTime<Utc>,
    window_hours: i64,
) -> usize {
    let threshold = now - Duration::hours(window_hours);
    history
        .iter()
        .filter(|entry| entry.change_time >= threshold)
        .count()
}

/// Assets not retired to the E-WASTED sentinel.
pub fn active_count<T: LocatedAsset>(assets: &[T]) -> usize {
    assets.len() - wasted_count(assets)
}

/// Assets at the E-WASTED sentinel.
pub fn wasted_count<T: LocatedAsset>(assets: &[T]) -> usize {
    assets
        .iter()
        .filter(|a| a.location() == EWASTE_LOCATION)
        .count()
}

/// Assets at the UNKNOWN sentinel.
pub fn unknown_count<T: LocatedAsset>(assets: &[T]) -> usize {
    assets
        .iter()
        .filter(|a| a.location() == UNKNOWN_LOCATION)
        .count()
}

/// Assets without a photo reference.
pub fn missing_photo_count<T: LocatedAsset>(assets: &[T]) -> usize {
    assets.iter().filter(|a| a.image().is_none()).count()
}

/// Assets whose location is flagged `is_storage`. Storage membership is
/// derived from the locations table, never from a hardcoded list.
pub fn stored_count<T: LocatedAsset>(assets: &[T], locations: &[location::Model]) -> usize {
    let storage: HashSet<&str> = locations
        .iter()
        .filter(|l| l.is_storage)
        .map(|l| l.name.as_str())
        .collect();

    assets
        .iter()
        .filter(|a| storage.contains(a.location()))
        .count()
}

/// The overview tab's numbers, computed from one consistent set of
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewReport {
    pub changes_in_window: usize,
    pub window_hours: i64,
    pub total_devices: usize,
    pub total_components: usize,
    pub active_devices: usize,
    pub active_components: usize,
    pub wasted_assets: usize,
    pub stored_assets: usize,
    pub unknown_assets: usize,
    pub devices_without_photo: usize,
    pub components_without_photo: usize,
}

pub fn build_overview(
    devices: &[device::Model],
    components: &[component::Model],
    locations: &[location::Model],
    history: &[history_entry::Model],
    now: DateTime<Utc>,
    window_hours: i64,
) -> OverviewReport {
    OverviewReport {
        changes_in_window: changes_in_window(history, now, window_hours),
        window_hours,
        total_devices: devices.len(),
        total_components: components.len(),
        active_devices: active_count(devices),
        active_components: active_count(components),
        wasted_assets: wasted_count(devices) + wasted_count(components),
        stored_assets: stored_count(devices, locations) + stored_count(components, locations),
        unknown_assets: unknown_count(devices) + unknown_count(components),
        devices_without_photo: missing_photo_count(devices),
        components_without_photo: missing_photo_count(components),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn device_at(serial: &str, location: &str, image: Option<&str>) -> device::Model {
        device::Model {
            serial: serial.to_string(),
            pos: "Toast".to_string(),
            location: location.to_string(),
            device_type: "Terminal".to_string(),
            friendly_name: None,
            notes: None,
            image: image.map(str::to_string),
            last_edit: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn history_at(time: DateTime<Utc>) -> history_entry::Model {
        history_entry::Model {
            id: 0,
            change_time: time,
            serial: None,
            previous_location: None,
            previous_friendly_name: None,
            previous_connection: None,
            previous_notes: None,
            previous_photo: None,
            new_location: None,
            new_friendly_name: None,
            new_connection: None,
            new_notes: None,
            new_photo: None,
            change_log: "DEVICE UPDATE".to_string(),
        }
    }

    fn named_location(name: &str, is_storage: bool) -> location::Model {
        location::Model {
            name: name.to_string(),
            image: None,
            is_storage,
        }
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let exactly_on_edge = history_at(now - Duration::hours(24));
        let just_outside = history_at(now - Duration::hours(24) - Duration::seconds(1));
        let inside = history_at(now - Duration::hours(1));

        let history = vec![exactly_on_edge, just_outside, inside];
        assert_eq!(changes_in_window(&history, now, 24), 2);
    }

    #[test]
    fn sentinel_matches_are_value_exact() {
        let devices = vec![
            device_at("A", "E-WASTED", None),
            device_at("B", "e-wasted", None),
            device_at("C", "UNKNOWN", None),
            device_at("D", "FLOOR", None),
        ];
        // Case differs: not the sentinel.
        assert_eq!(wasted_count(&devices), 1);
        assert_eq!(unknown_count(&devices), 1);
        assert_eq!(active_count(&devices), 3);
    }

    #[test]
    fn storage_count_joins_against_the_flag() {
        let locations = vec![
            named_location("WAREHOUSE", true),
            named_location("FLOOR", false),
        ];
        let devices = vec![
            device_at("A", "WAREHOUSE", None),
            device_at("B", "WAREHOUSE", None),
            device_at("C", "FLOOR", None),
        ];
        assert_eq!(stored_count(&devices, &locations), 2);
    }

    #[test]
    fn missing_photo_counts_null_references_only() {
        let devices = vec![
            device_at("A", "FLOOR", Some("a.jpg")),
            device_at("B", "FLOOR", None),
        ];
        assert_eq!(missing_photo_count(&devices), 1);
    }
}
