//! Drag-start snapshots for multi-entity moves.

use crate::selection::Selection;
use crate::types::{ObjectId, Point, RowId, SeatMap};
use std::collections::HashMap;

/// Positions of dragged rows and objects at the moment the drag started.
///
/// Moves during a drag are deltas from these origins, not from the previous
/// move. The session lives from [`DragSession::begin`] until the editor drops
/// it (mouse release, area selection, map replacement).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragSession {
    rows: HashMap<RowId, Point>,
    objects: HashMap<ObjectId, Point>,
}

impl DragSession {
    /// Snapshots every selected row and object of `map`
    #[must_use]
    pub fn begin(map: &SeatMap, selection: &Selection) -> Self {
        let mut session = Self::default();
        session.ensure_rows(map, selection.rows());
        session.ensure_objects(map, selection.objects());
        session
    }

    /// Drag-start row anchors
    #[must_use]
    pub const fn row_origins(&self) -> &HashMap<RowId, Point> {
        &self.rows
    }

    /// Drag-start object positions
    #[must_use]
    pub const fn object_origins(&self) -> &HashMap<ObjectId, Point> {
        &self.objects
    }

    /// True when nothing has been snapshotted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.objects.is_empty()
    }

    /// Snapshots rows that do not have an origin yet.
    ///
    /// Existing origins are never overwritten mid-drag.
    pub fn ensure_rows<'a, I>(&mut self, map: &SeatMap, row_ids: I)
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        for row_id in row_ids {
            if self.rows.contains_key(row_id) {
                continue;
            }
            if let Some(row) = map.row(row_id) {
                self.rows.insert(row_id.clone(), row.position);
            }
        }
    }

    /// Snapshots objects that do not have an origin yet
    pub fn ensure_objects<'a, I>(&mut self, map: &SeatMap, object_ids: I)
    where
        I: IntoIterator<Item = &'a ObjectId>,
    {
        for object_id in object_ids {
            if self.objects.contains_key(object_id) {
                continue;
            }
            if let Some(object) = map.object(object_id) {
                self.objects.insert(object_id.clone(), object.position);
            }
        }
    }
}
