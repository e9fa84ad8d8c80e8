//! Shared domain vocabulary: sentinel location names and the text
//! normalization applied at every write boundary.

/// Sentinel location for retired assets. Rows are never hard-deleted;
/// "removal" is a move to this location.
pub const EWASTE_LOCATION: &str = "E-WASTED";

/// Sentinel location for assets whose whereabouts are not tracked.
pub const UNKNOWN_LOCATION: &str = "UNKNOWN";

/// Normalizes a free-text notes field on write.
///
/// The presentation layer submits the literal placeholder `"None"` (its
/// default form value) or an empty string when the user left notes blank;
/// both persist as NULL so blank notes render as an empty field rather
/// than literal text. Applied uniformly — a round-trip of an already-NULL
/// notes field stays NULL.
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    match notes {
        None => None,
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "None" {
                None
            } else {
                Some(s.to_string())
            }
        }
    }
}

/// Same normalization for optional display names (friendly name).
pub fn normalize_display_name(name: Option<&str>) -> Option<String> {
    normalize_notes(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("None")]
    fn blank_and_placeholder_notes_become_null(#[case] raw: &str) {
        assert_eq!(normalize_notes(Some(raw)), None);
    }

    #[test]
    fn absent_notes_stay_absent() {
        assert_eq!(normalize_notes(None), None);
    }

    #[test]
    fn real_notes_pass_through_unchanged() {
        assert_eq!(
            normalize_notes(Some("screen cracked")),
            Some("screen cracked".to_string())
        );
        // "None" only matches as the whole value
        assert_eq!(
            normalize_notes(Some("None of the keys work")),
            Some("None of the keys work".to_string())
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_notes(Some("None"));
        let twice = normalize_notes(once.as_deref());
        assert_eq!(once, twice);
    }
}
