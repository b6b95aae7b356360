//! JSON export and validated import.
//!
//! The wire format is an envelope `{ "mapName": ..., "seatMap": ... }` with
//! camelCase field names. Import is all-or-nothing: the payload is checked
//! structurally, the first violation aborts with a descriptive
//! [`ImportError::Validation`], and only a fully valid payload yields a map.
//! Payloads from older exports without `objects` are accepted.

use crate::error::ImportError;
use crate::types::SeatMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of [`import_map`]: the imported map or the first problem found
pub type ImportResult = Result<SeatMap, ImportError>;

/// Export envelope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    /// Name of the exported map
    pub map_name: String,
    /// The map itself, stamped with the export time
    pub seat_map: SeatMap,
}

/// Wraps `map` in an export envelope, stamping `updated_at` with `now`.
///
/// The input map is not modified.
#[must_use]
pub fn export_map(map: &SeatMap, now: DateTime<Utc>) -> ExportEnvelope {
    ExportEnvelope {
        map_name: map.name.clone(),
        seat_map: SeatMap {
            updated_at: now,
            ..map.clone()
        },
    }
}

/// Pretty-printed JSON for an export envelope
///
/// Non-finite coordinates are written as `null` and will not import again;
/// positions set through the editor are always finite.
///
/// # Errors
///
/// Returns error if the envelope cannot be encoded.
pub fn to_json(envelope: &ExportEnvelope) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(envelope)
}

/// Parses and validates an exported payload
///
/// # Errors
///
/// - [`ImportError::Format`] when `payload` is not JSON
/// - [`ImportError::Validation`] when a required field is missing or empty
pub fn import_map(payload: &str) -> ImportResult {
    let envelope: Value =
        serde_json::from_str(payload).map_err(|e| ImportError::Format(e.to_string()))?;

    let mut seat_map = envelope
        .get("seatMap")
        .filter(|seat_map| seat_map.get("rows").is_some_and(Value::is_array))
        .cloned()
        .ok_or_else(|| {
            ImportError::Validation("Invalid seat map format. Missing required fields.".to_string())
        })?;

    validate_rows(&seat_map)?;

    if let Some(fields) = seat_map.as_object_mut() {
        let objects = fields.entry("objects").or_insert(Value::Null);
        if objects.is_null() {
            *objects = Value::Array(Vec::new());
        }
    }

    serde_json::from_value(seat_map)
        .map_err(|e| ImportError::Validation(format!("Invalid seat map format: {e}")))
}

fn non_empty_str(value: &Value, field: &str) -> bool {
    value
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty())
}

fn validate_rows(seat_map: &Value) -> Result<(), ImportError> {
    let rows = seat_map
        .get("rows")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);

    for (row_index, row) in rows.iter().enumerate() {
        let seats = row.get("seats").and_then(Value::as_array);
        let Some(seats) = seats.filter(|_| non_empty_str(row, "id") && non_empty_str(row, "label"))
        else {
            return Err(ImportError::Validation(format!(
                "Invalid row format at row {row_index}. Each row must have id, label, and seats array."
            )));
        };

        for (seat_index, seat) in seats.iter().enumerate() {
            if !(non_empty_str(seat, "id")
                && non_empty_str(seat, "label")
                && non_empty_str(seat, "rowId"))
            {
                return Err(ImportError::Validation(format!(
                    "Invalid seat format at row {row_index}, seat {seat_index}. \
                     Each seat must have id, label, and rowId."
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "mapName": "Old",
        "seatMap": {
            "id": "m1",
            "name": "Old",
            "rows": [{
                "id": "r1",
                "label": "Row 1",
                "position": {"x": 150, "y": 200},
                "isSelected": false,
                "seats": [{
                    "id": "s1",
                    "label": "11",
                    "rowId": "r1",
                    "position": {"x": 0, "y": 0},
                    "isAvailable": true,
                    "category": "standard"
                }]
            }],
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        }
    }"#;

    #[test]
    fn legacy_payload_without_objects_imports() {
        let map = import_map(MINIMAL).unwrap();
        assert!(map.objects.is_empty());
        assert_eq!(map.rows[0].seats[0].is_available, Some(true));
        assert_eq!(map.rows[0].position.x, 150.0);
    }

    #[test]
    fn not_json_is_a_format_error() {
        assert!(import_map("not json").unwrap_err().is_format());
    }

    #[test]
    fn rows_must_be_an_array() {
        let error = import_map(r#"{"seatMap":{"rows":"not-an-array"}}"#).unwrap_err();
        assert!(error.is_validation());

        let error = import_map(r#"{"mapName":"x"}"#).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn first_invalid_row_aborts() {
        let payload = r#"{"seatMap":{"rows":[
            {"id":"r1","label":"ok","seats":[]},
            {"id":"","label":"bad","seats":[]},
            {"id":"r3","seats":[]}
        ]}}"#;

        let error = import_map(payload).unwrap_err();
        assert_eq!(
            error,
            ImportError::Validation(
                "Invalid row format at row 1. Each row must have id, label, and seats array."
                    .to_string()
            )
        );
    }

    #[test]
    fn seat_without_row_id_is_rejected() {
        let payload = r#"{"seatMap":{"rows":[
            {"id":"r1","label":"Row","seats":[{"id":"s1","label":"A1"}]}
        ]}}"#;

        let error = import_map(payload).unwrap_err();
        assert!(error.to_string().contains("rowId"));
    }

    #[test]
    fn export_stamps_copy_only() {
        let map = import_map(MINIMAL).unwrap();
        let later = map.updated_at + chrono::Duration::hours(1);

        let envelope = export_map(&map, later);

        assert_eq!(envelope.map_name, "Old");
        assert_eq!(envelope.seat_map.updated_at, later);
        assert_ne!(map.updated_at, later);
        assert!(to_json(&envelope).unwrap().contains("\"objects\": []"));
    }
}
