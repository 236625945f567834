// ============================================================================
// PARCEL LOCATION - Structured room/block record + legacy description shim
// ============================================================================
// The backend parcel record has no dedicated room/block columns; historically
// both were packed into the free-text description as
// "Room No: X | Block: Y [| notes]". The structured record is the data-model
// boundary; the string format survives only as a compatibility shim for the
// unchanged backend.
// ============================================================================

use serde::{Deserialize, Serialize};

pub const UNKNOWN_FIELD: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParcelLocation {
    pub room: String,
    pub block: String,
    pub notes: Option<String>,
}

impl ParcelLocation {
    pub fn new(room: &str, block: &str, notes: Option<&str>) -> Self {
        Self {
            room: room.trim().to_string(),
            block: block.trim().to_string(),
            notes: notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    /// Parse the legacy description format. Fields whose marker is missing
    /// default to "N/A"; a description with neither marker yields both
    /// defaults and no notes.
    pub fn from_description(description: &str) -> Self {
        let room = extract_marker(description, "Room No:");
        let block = extract_marker(description, "Block:");

        // Anything after the two known markers is free-text notes.
        let notes = description
            .split('|')
            .map(str::trim)
            .filter(|seg| {
                !seg.is_empty() && !seg.starts_with("Room No:") && !seg.starts_with("Block:")
            })
            .collect::<Vec<_>>()
            .join(" | ");

        Self {
            room: room.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            block: block.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            notes: if notes.is_empty() { None } else { Some(notes) },
        }
    }

    /// Compose the legacy description string the backend expects.
    pub fn to_description(&self) -> String {
        let mut out = format!("Room No: {} | Block: {}", self.room, self.block);
        if let Some(notes) = &self.notes {
            out.push_str(" | ");
            out.push_str(notes);
        }
        out
    }

    pub fn is_known(&self) -> bool {
        self.room != UNKNOWN_FIELD || self.block != UNKNOWN_FIELD
    }
}

impl Default for ParcelLocation {
    fn default() -> Self {
        Self {
            room: UNKNOWN_FIELD.to_string(),
            block: UNKNOWN_FIELD.to_string(),
            notes: None,
        }
    }
}

/// Extract the value following `marker` up to the next '|' separator.
fn extract_marker(description: &str, marker: &str) -> Option<String> {
    let start = description.find(marker)? + marker.len();
    let rest = &description[start..];
    let end = rest.find('|').unwrap_or(rest.len());
    let value = rest[..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_room_and_block() {
        let loc = ParcelLocation::from_description("Room No: 204-B | Block: A Block");
        assert_eq!(loc.room, "204-B");
        assert_eq!(loc.block, "A Block");
        assert_eq!(loc.notes, None);
    }

    #[test]
    fn parses_trailing_notes() {
        let loc = ParcelLocation::from_description("Room No: 12 | Block: C Block | Fragile");
        assert_eq!(loc.room, "12");
        assert_eq!(loc.block, "C Block");
        assert_eq!(loc.notes.as_deref(), Some("Fragile"));
    }

    #[test]
    fn missing_markers_default_to_na() {
        let loc = ParcelLocation::from_description("handed over at gate");
        assert_eq!(loc.room, UNKNOWN_FIELD);
        assert_eq!(loc.block, UNKNOWN_FIELD);
        assert!(!loc.is_known());

        let loc = ParcelLocation::from_description("Room No: 301-A");
        assert_eq!(loc.room, "301-A");
        assert_eq!(loc.block, UNKNOWN_FIELD);
        assert!(loc.is_known());
    }

    #[test]
    fn values_are_trimmed() {
        let loc = ParcelLocation::from_description("Room No:   7  | Block:  B Block ");
        assert_eq!(loc.room, "7");
        assert_eq!(loc.block, "B Block");
    }

    #[test]
    fn compose_then_parse_round_trips() {
        let loc = ParcelLocation::new("204-B", "A Block", Some("Large box"));
        let parsed = ParcelLocation::from_description(&loc.to_description());
        assert_eq!(parsed, loc);
    }

    #[test]
    fn empty_description_yields_defaults() {
        assert_eq!(ParcelLocation::from_description(""), ParcelLocation::default());
    }
}
