//! Pure map operations.
//!
//! Every function takes its inputs by reference and returns a new value; the
//! input is never modified. Operations on ids that do not exist return the
//! input unchanged (including `updated_at`). Operations that do change
//! structural or positional data stamp `updated_at` with the supplied `now`.
//!
//! Positions passed to the `move_*` functions are clamped to the non-negative
//! quadrant. Seat positions are row-relative; row and object positions are
//! absolute canvas coordinates.

use crate::environment::IdGenerator;
use crate::types::{
    Delta, MapId, ObjectId, Point, Row, RowId, Seat, SeatId, SeatMap, Size, VenueObject,
    VenueObjectKind,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Default footprint of a newly placed venue object
pub const DEFAULT_OBJECT_SIZE: Size = Size::new(80.0, 60.0);

// ============================================================================
// Entity construction
// ============================================================================

/// Creates a map with no rows and no objects
#[must_use]
pub fn create_empty_map(ids: &dyn IdGenerator, name: &str, now: DateTime<Utc>) -> SeatMap {
    SeatMap {
        id: MapId::new(ids.next_id()),
        name: name.to_string(),
        rows: Vec::new(),
        objects: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Creates an empty row anchored at `position`
#[must_use]
pub fn create_row(ids: &dyn IdGenerator, label: &str, position: Point) -> Row {
    Row {
        id: RowId::new(ids.next_id()),
        label: label.to_string(),
        seats: Vec::new(),
        position,
    }
}

/// Creates a seat for `row_id` at the row-relative `position`
#[must_use]
pub fn create_seat(ids: &dyn IdGenerator, row_id: &RowId, label: &str, position: Point) -> Seat {
    Seat {
        id: SeatId::new(ids.next_id()),
        label: label.to_string(),
        row_id: row_id.clone(),
        position,
        is_available: None,
        category: None,
    }
}

/// Creates a venue object labeled `"{Kind} 1"` with the default footprint
#[must_use]
pub fn create_object(ids: &dyn IdGenerator, kind: VenueObjectKind, position: Point) -> VenueObject {
    VenueObject {
        id: ObjectId::new(ids.next_id()),
        kind,
        label: format!("{} 1", kind.display_name()),
        position: position.clamped(),
        size: DEFAULT_OBJECT_SIZE,
        color: None,
    }
}

// ============================================================================
// Row-level operations
// ============================================================================

/// Appends `seat` to the row.
///
/// The seat's `row_id` is rewritten to the row's id so containment holds.
#[must_use]
pub fn add_seat_to_row(row: &Row, seat: Seat) -> Row {
    let mut next = row.clone();
    next.seats.push(Seat {
        row_id: row.id.clone(),
        ..seat
    });
    next
}

/// Removes the seat with `seat_id`; unknown ids leave the row as is
#[must_use]
pub fn remove_seat_from_row(row: &Row, seat_id: &SeatId) -> Row {
    Row {
        seats: row
            .seats
            .iter()
            .filter(|seat| &seat.id != seat_id)
            .cloned()
            .collect(),
        ..row.clone()
    }
}

/// Replaces the label of the seat with `seat_id`
#[must_use]
pub fn update_seat_label(row: &Row, seat_id: &SeatId, label: &str) -> Row {
    Row {
        seats: row
            .seats
            .iter()
            .map(|seat| {
                if &seat.id == seat_id {
                    Seat {
                        label: label.to_string(),
                        ..seat.clone()
                    }
                } else {
                    seat.clone()
                }
            })
            .collect(),
        ..row.clone()
    }
}

/// Replaces the row's label
#[must_use]
pub fn update_row_label(row: &Row, label: &str) -> Row {
    Row {
        label: label.to_string(),
        ..row.clone()
    }
}

// ============================================================================
// Map-level helpers
// ============================================================================

/// Applies `update` to the row with `row_id`.
///
/// Returns the unchanged map when the row does not exist, or when `update`
/// reports that it did not touch anything.
fn with_row<F>(map: &SeatMap, row_id: &RowId, now: DateTime<Utc>, update: F) -> SeatMap
where
    F: FnOnce(&Row) -> Option<Row>,
{
    let Some(index) = map.rows.iter().position(|row| &row.id == row_id) else {
        tracing::trace!(row_id = %row_id, "row not found, ignoring");
        return map.clone();
    };

    let Some(updated) = update(&map.rows[index]) else {
        return map.clone();
    };

    let mut next = map.clone();
    next.rows[index] = updated;
    next.updated_at = now;
    next
}

/// Applies `update` to the object with `object_id`
fn with_object<F>(map: &SeatMap, object_id: &ObjectId, now: DateTime<Utc>, update: F) -> SeatMap
where
    F: FnOnce(&mut VenueObject),
{
    let Some(index) = map.objects.iter().position(|object| &object.id == object_id) else {
        tracing::trace!(object_id = %object_id, "object not found, ignoring");
        return map.clone();
    };

    let mut next = map.clone();
    update(&mut next.objects[index]);
    next.updated_at = now;
    next
}

// ============================================================================
// Map-level operations: add
// ============================================================================

/// Appends a row to the map
#[must_use]
pub fn add_row(map: &SeatMap, row: Row, now: DateTime<Utc>) -> SeatMap {
    let mut next = map.clone();
    next.rows.push(row);
    next.updated_at = now;
    next
}

/// Appends a seat to the row with `row_id`
#[must_use]
pub fn add_seat(map: &SeatMap, row_id: &RowId, seat: Seat, now: DateTime<Utc>) -> SeatMap {
    with_row(map, row_id, now, |row| Some(add_seat_to_row(row, seat)))
}

/// Appends a venue object to the map
#[must_use]
pub fn add_object(map: &SeatMap, object: VenueObject, now: DateTime<Utc>) -> SeatMap {
    let mut next = map.clone();
    next.objects.push(object);
    next.updated_at = now;
    next
}

/// Label and anchor for the next row added from the toolbar.
///
/// Rows are numbered from `rows.len() + 1` and stacked 50 units apart.
#[must_use]
pub fn next_row_slot(map: &SeatMap) -> (String, Point) {
    let number = map.rows.len() + 1;
    #[allow(clippy::cast_precision_loss)] // row counts are far below 2^52
    let step = 50.0 * number as f64;
    let y = if number < 20 { step } else { step - 20.0 };
    (format!("Row {number}"), Point::new(50.0, y))
}

/// Label and row-relative position for the next seat appended to `row`.
///
/// Seats are labeled `A1, A2, ...` and spaced 40 units apart.
#[must_use]
pub fn next_seat_slot(row: &Row) -> (String, Point) {
    let number = row.seats.len() + 1;
    #[allow(clippy::cast_precision_loss)] // seat counts are far below 2^52
    let x = 10.0 + (number - 1) as f64 * 40.0;
    (format!("A{number}"), Point::new(x, 30.0))
}

// ============================================================================
// Map-level operations: delete
// ============================================================================

/// Removes a row and, by containment, all its seats
#[must_use]
pub fn delete_row(map: &SeatMap, row_id: &RowId, now: DateTime<Utc>) -> SeatMap {
    delete_multiple_rows(map, std::slice::from_ref(row_id), now)
}

/// Removes every row whose id is in `row_ids`
#[must_use]
pub fn delete_multiple_rows(map: &SeatMap, row_ids: &[RowId], now: DateTime<Utc>) -> SeatMap {
    let doomed: HashSet<&RowId> = row_ids.iter().collect();
    if !map.rows.iter().any(|row| doomed.contains(&row.id)) {
        return map.clone();
    }

    let mut next = map.clone();
    next.rows.retain(|row| !doomed.contains(&row.id));
    next.updated_at = now;
    next
}

/// Removes one seat from the row with `row_id`
#[must_use]
pub fn delete_seat(map: &SeatMap, row_id: &RowId, seat_id: &SeatId, now: DateTime<Utc>) -> SeatMap {
    with_row(map, row_id, now, |row| {
        row.seat(seat_id).map(|_| remove_seat_from_row(row, seat_id))
    })
}

/// Removes every seat whose id is in `seat_ids`, from any row
#[must_use]
pub fn delete_multiple_seats(map: &SeatMap, seat_ids: &[SeatId], now: DateTime<Utc>) -> SeatMap {
    let doomed: HashSet<&SeatId> = seat_ids.iter().collect();
    let hit = map
        .rows
        .iter()
        .flat_map(|row| &row.seats)
        .any(|seat| doomed.contains(&seat.id));
    if !hit {
        return map.clone();
    }

    let mut next = map.clone();
    for row in &mut next.rows {
        row.seats.retain(|seat| !doomed.contains(&seat.id));
    }
    next.updated_at = now;
    next
}

/// Removes one venue object
#[must_use]
pub fn delete_object(map: &SeatMap, object_id: &ObjectId, now: DateTime<Utc>) -> SeatMap {
    delete_selected_objects(map, std::slice::from_ref(object_id), now)
}

/// Removes every venue object whose id is in `object_ids`
#[must_use]
pub fn delete_selected_objects(
    map: &SeatMap,
    object_ids: &[ObjectId],
    now: DateTime<Utc>,
) -> SeatMap {
    let doomed: HashSet<&ObjectId> = object_ids.iter().collect();
    if !map.objects.iter().any(|object| doomed.contains(&object.id)) {
        return map.clone();
    }

    let mut next = map.clone();
    next.objects.retain(|object| !doomed.contains(&object.id));
    next.updated_at = now;
    next
}

// ============================================================================
// Map-level operations: relabel
// ============================================================================

/// Replaces the label of a row
#[must_use]
pub fn relabel_row(map: &SeatMap, row_id: &RowId, label: &str, now: DateTime<Utc>) -> SeatMap {
    with_row(map, row_id, now, |row| Some(update_row_label(row, label)))
}

/// Replaces the label of a seat in the row with `row_id`
#[must_use]
pub fn relabel_seat(
    map: &SeatMap,
    row_id: &RowId,
    seat_id: &SeatId,
    label: &str,
    now: DateTime<Utc>,
) -> SeatMap {
    with_row(map, row_id, now, |row| {
        row.seat(seat_id)
            .map(|_| update_seat_label(row, seat_id, label))
    })
}

/// Replaces the label of a venue object
#[must_use]
pub fn relabel_object(
    map: &SeatMap,
    object_id: &ObjectId,
    label: &str,
    now: DateTime<Utc>,
) -> SeatMap {
    with_object(map, object_id, now, |object| {
        object.label = label.to_string();
    })
}

// ============================================================================
// Map-level operations: availability
// ============================================================================

/// Toggles a seat's availability.
///
/// Unknown availability becomes unavailable; known values flip.
#[must_use]
pub fn toggle_seat_availability(
    map: &SeatMap,
    row_id: &RowId,
    seat_id: &SeatId,
    now: DateTime<Utc>,
) -> SeatMap {
    with_row(map, row_id, now, |row| {
        row.seat(seat_id)?;
        let mut next = row.clone();
        for seat in &mut next.seats {
            if &seat.id == seat_id {
                seat.is_available = Some(!seat.is_available.unwrap_or(true));
            }
        }
        Some(next)
    })
}

// ============================================================================
// Map-level operations: move
// ============================================================================

/// Sets a seat's row-relative position (clamped to `>= 0`)
#[must_use]
pub fn move_seat(
    map: &SeatMap,
    row_id: &RowId,
    seat_id: &SeatId,
    position: Point,
    now: DateTime<Utc>,
) -> SeatMap {
    with_row(map, row_id, now, |row| {
        row.seat(seat_id)?;
        let mut next = row.clone();
        for seat in &mut next.seats {
            if &seat.id == seat_id {
                seat.position = position.clamped();
            }
        }
        Some(next)
    })
}

/// Sets a row's absolute anchor (clamped to `>= 0`)
#[must_use]
pub fn move_row(map: &SeatMap, row_id: &RowId, position: Point, now: DateTime<Utc>) -> SeatMap {
    with_row(map, row_id, now, |row| {
        Some(Row {
            position: position.clamped(),
            ..row.clone()
        })
    })
}

/// Sets an object's absolute position (clamped to `>= 0`)
#[must_use]
pub fn move_object(
    map: &SeatMap,
    object_id: &ObjectId,
    position: Point,
    now: DateTime<Utc>,
) -> SeatMap {
    with_object(map, object_id, now, |object| {
        object.position = position.clamped();
    })
}

/// Moves every row in `row_ids` to its drag-start position plus `delta`.
///
/// Rows without an entry in `origins` are left where they are.
#[must_use]
pub fn move_rows_from(
    map: &SeatMap,
    origins: &HashMap<RowId, Point>,
    row_ids: &[RowId],
    delta: Delta,
    now: DateTime<Utc>,
) -> SeatMap {
    let moving: HashSet<&RowId> = row_ids.iter().collect();
    let mut next = map.clone();
    let mut moved = false;

    for row in &mut next.rows {
        if !moving.contains(&row.id) {
            continue;
        }
        if let Some(origin) = origins.get(&row.id) {
            row.position = origin.offset(delta).clamped();
            moved = true;
        }
    }

    if !moved {
        return map.clone();
    }
    next.updated_at = now;
    next
}

/// Moves every object in `object_ids` to its drag-start position plus `delta`
#[must_use]
pub fn move_objects_from(
    map: &SeatMap,
    origins: &HashMap<ObjectId, Point>,
    object_ids: &[ObjectId],
    delta: Delta,
    now: DateTime<Utc>,
) -> SeatMap {
    let moving: HashSet<&ObjectId> = object_ids.iter().collect();
    let mut next = map.clone();
    let mut moved = false;

    for object in &mut next.objects {
        if !moving.contains(&object.id) {
            continue;
        }
        if let Some(origin) = origins.get(&object.id) {
            object.position = origin.offset(delta).clamped();
            moved = true;
        }
    }

    if !moved {
        return map.clone();
    }
    next.updated_at = now;
    next
}

// ============================================================================
// Read-only queries
// ============================================================================

/// Statistics shown by the validation panel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapSummary {
    /// Number of rows
    pub rows: usize,
    /// Number of seats across all rows
    pub seats: usize,
    /// Number of venue objects
    pub objects: usize,
    /// Seats explicitly marked unavailable
    pub unavailable_seats: usize,
    /// Every row and seat has a non-empty label
    pub all_labeled: bool,
    /// Two rows share a label, or two seats in one row share a label
    pub has_duplicate_labels: bool,
}

/// Computes a [`MapSummary`]
#[must_use]
pub fn map_summary(map: &SeatMap) -> MapSummary {
    let seats = map.rows.iter().flat_map(|row| &row.seats);

    let all_labeled = map
        .rows
        .iter()
        .all(|row| !row.label.is_empty() && row.seats.iter().all(|seat| !seat.label.is_empty()));

    let mut row_labels = HashSet::new();
    let duplicate_rows = !map.rows.iter().all(|row| row_labels.insert(row.label.as_str()));
    let duplicate_seats = map.rows.iter().any(|row| {
        let mut labels = HashSet::new();
        !row.seats.iter().all(|seat| labels.insert(seat.label.as_str()))
    });

    MapSummary {
        rows: map.rows.len(),
        seats: map.seat_count(),
        objects: map.objects.len(),
        unavailable_seats: seats.filter(|seat| seat.is_available == Some(false)).count(),
        all_labeled,
        has_duplicate_labels: duplicate_rows || duplicate_seats,
    }
}
