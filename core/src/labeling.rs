//! Batch labeling of selected rows.
//!
//! The i-th input row becomes `"{row_prefix} {start_number + i}"` and the j-th
//! seat of each row becomes `"{seat_prefix}{j + 1}"`. Rows and seats keep
//! their order; only label strings change.
//!
//! `end_number` is a preview hint and does not bound the loop: passing more
//! rows than `end_number - start_number + 1` labels all of them.

use crate::types::{BatchLabelingOptions, Row, RowId, Seat, SeatMap};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Relabels `rows` in the order given
#[must_use]
pub fn apply_batch_labeling(rows: &[Row], options: &BatchLabelingOptions) -> Vec<Row> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| Row {
            label: format!(
                "{} {}",
                options.row_prefix,
                row_number(options.start_number, index)
            ),
            seats: row
                .seats
                .iter()
                .enumerate()
                .map(|(index, seat)| Seat {
                    label: format!("{}{}", options.seat_prefix, index + 1),
                    ..seat.clone()
                })
                .collect(),
            ..row.clone()
        })
        .collect()
}

/// `start + index`, saturating at `i64::MAX`
fn row_number(start: i64, index: usize) -> i64 {
    i64::try_from(index).map_or(i64::MAX, |offset| start.saturating_add(offset))
}

/// Replaces rows of `map` by id with their relabeled versions.
///
/// Rows not present in `relabeled` are left untouched. Returns the map
/// unchanged when `relabeled` is empty.
#[must_use]
pub fn merge_rows(map: &SeatMap, relabeled: Vec<Row>, now: DateTime<Utc>) -> SeatMap {
    if relabeled.is_empty() {
        return map.clone();
    }

    let mut by_id: HashMap<RowId, Row> = relabeled
        .into_iter()
        .map(|row| (row.id.clone(), row))
        .collect();

    let mut next = map.clone();
    for row in &mut next.rows {
        if let Some(updated) = by_id.remove(&row.id) {
            *row = updated;
        }
    }
    next.updated_at = now;
    next
}

/// Preview of the labels a batch would produce, for the dialog
#[must_use]
pub fn preview(options: &BatchLabelingOptions) -> String {
    format!(
        "{prefix} {start} ... {prefix} {end}, seats {seat}1, {seat}2, ...",
        prefix = options.row_prefix,
        start = options.start_number,
        end = options.end_number,
        seat = options.seat_prefix,
    )
}
