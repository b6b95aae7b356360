//! Selection state and rectangle hit-testing.
//!
//! # Selection rules
//!
//! - Selecting without multi-select focuses exactly one entity and clears
//!   every other kind.
//! - Multi-select toggles membership within one kind. Rows and seats stay
//!   mutually exclusive even then; objects are independent of both.
//! - [`Selection::clear`] empties rows and seats but keeps objects; only
//!   [`Selection::clear_all`] empties everything.
//!
//! Each kind is an insertion-ordered set, so "selection order" is preserved
//! for batch labeling while membership checks stay O(1).

use crate::types::{ObjectId, Point, Row, RowId, SeatId, SeatMap, VenueObject};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::hash::Hash;

/// Selected ids of each entity kind
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    rows: IndexSet<RowId>,
    seats: IndexSet<SeatId>,
    objects: IndexSet<ObjectId>,
}

fn toggle<T: Hash + Eq>(set: &mut IndexSet<T>, id: T) {
    if !set.shift_remove(&id) {
        set.insert(id);
    }
}

impl Selection {
    /// Creates an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected rows, in selection order
    #[must_use]
    pub const fn rows(&self) -> &IndexSet<RowId> {
        &self.rows
    }

    /// Selected seats, in selection order
    #[must_use]
    pub const fn seats(&self) -> &IndexSet<SeatId> {
        &self.seats
    }

    /// Selected objects, in selection order
    #[must_use]
    pub const fn objects(&self) -> &IndexSet<ObjectId> {
        &self.objects
    }

    /// True when nothing of any kind is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.seats.is_empty() && self.objects.is_empty()
    }

    /// Selects a row.
    ///
    /// Without `multi_select` the row becomes the only selected entity. With
    /// it, the row's membership is toggled, seats are cleared and objects are
    /// kept.
    pub fn select_row(&mut self, id: RowId, multi_select: bool) {
        if multi_select {
            toggle(&mut self.rows, id);
            self.seats.clear();
        } else {
            self.focus();
            self.rows.insert(id);
        }
    }

    /// Selects a seat; the mirror image of [`Selection::select_row`]
    pub fn select_seat(&mut self, id: SeatId, multi_select: bool) {
        if multi_select {
            toggle(&mut self.seats, id);
            self.rows.clear();
        } else {
            self.focus();
            self.seats.insert(id);
        }
    }

    /// Selects an object.
    ///
    /// With `multi_select` only the object set changes.
    pub fn select_object(&mut self, id: ObjectId, multi_select: bool) {
        if multi_select {
            toggle(&mut self.objects, id);
        } else {
            self.focus();
            self.objects.insert(id);
        }
    }

    /// Replaces the row set wholesale and clears the other kinds
    pub fn set_rows<I: IntoIterator<Item = RowId>>(&mut self, ids: I) {
        self.focus();
        self.rows.extend(ids);
    }

    /// Replaces the seat set wholesale and clears the other kinds
    pub fn set_seats<I: IntoIterator<Item = SeatId>>(&mut self, ids: I) {
        self.focus();
        self.seats.extend(ids);
    }

    /// Replaces the object set wholesale and clears the other kinds
    pub fn set_objects<I: IntoIterator<Item = ObjectId>>(&mut self, ids: I) {
        self.focus();
        self.objects.extend(ids);
    }

    /// Empties rows and seats; objects survive
    pub fn clear(&mut self) {
        self.rows.clear();
        self.seats.clear();
    }

    /// Empties every kind
    pub fn clear_all(&mut self) {
        self.focus();
    }

    fn focus(&mut self) {
        self.rows.clear();
        self.seats.clear();
        self.objects.clear();
    }

    /// Drops ids that no longer exist in `map`, keeping order
    pub fn prune(&mut self, map: &SeatMap) {
        let rows: HashSet<&RowId> = map.rows.iter().map(|row| &row.id).collect();
        let seats: HashSet<&SeatId> = map
            .rows
            .iter()
            .flat_map(|row| &row.seats)
            .map(|seat| &seat.id)
            .collect();
        let objects: HashSet<&ObjectId> = map.objects.iter().map(|object| &object.id).collect();

        self.rows.retain(|id| rows.contains(id));
        self.seats.retain(|id| seats.contains(id));
        self.objects.retain(|id| objects.contains(id));
    }
}

/// Axis-aligned rectangle in canvas coordinates, bounds inclusive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl Rect {
    /// Normalises two drag corners (in any order) into a rectangle
    #[must_use]
    pub fn from_corners(start: Point, end: Point) -> Self {
        Self {
            min_x: start.x.min(end.x),
            min_y: start.y.min(end.y),
            max_x: start.x.max(end.x),
            max_y: start.y.max(end.y),
        }
    }

    /// True when `point` lies inside or on the border
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

/// Ids whose anchors fall inside a query rectangle, in map order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AreaHits {
    /// Rows whose anchor is inside the rectangle
    pub rows: Vec<RowId>,
    /// Objects whose position is inside the rectangle
    pub objects: Vec<ObjectId>,
}

impl AreaHits {
    /// True when nothing was hit
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.objects.is_empty()
    }
}

/// Returns rows and objects whose anchor point lies in `rect`.
///
/// Seats are not tested individually.
#[must_use]
pub fn area_query(rect: &Rect, rows: &[Row], objects: &[VenueObject]) -> AreaHits {
    AreaHits {
        rows: rows
            .iter()
            .filter(|row| rect.contains(row.position))
            .map(|row| row.id.clone())
            .collect(),
        objects: objects
            .iter()
            .filter(|object| rect.contains(object.position))
            .map(|object| object.id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Size, VenueObjectKind};

    fn row_at(id: &str, x: f64, y: f64) -> Row {
        Row {
            id: RowId::from(id),
            label: id.to_string(),
            seats: Vec::new(),
            position: Point::new(x, y),
        }
    }

    fn object_at(id: &str, x: f64, y: f64) -> VenueObject {
        VenueObject {
            id: ObjectId::from(id),
            kind: VenueObjectKind::Stage,
            label: id.to_string(),
            position: Point::new(x, y),
            size: Size::new(10.0, 10.0),
            color: None,
        }
    }

    #[test]
    fn single_select_clears_other_kinds() {
        let mut selection = Selection::new();
        selection.set_rows([RowId::from("r1"), RowId::from("r2")]);
        selection.select_object(ObjectId::from("o1"), true);

        selection.select_seat(SeatId::from("s1"), false);

        assert!(selection.rows().is_empty());
        assert!(selection.objects().is_empty());
        assert_eq!(selection.seats().len(), 1);
    }

    #[test]
    fn multi_select_toggles_and_keeps_rows_and_seats_exclusive() {
        let mut selection = Selection::new();
        selection.select_seat(SeatId::from("s1"), false);
        selection.select_object(ObjectId::from("o1"), true);

        selection.select_row(RowId::from("r1"), true);
        selection.select_row(RowId::from("r2"), true);
        assert!(selection.seats().is_empty());
        assert_eq!(selection.objects().len(), 1);

        selection.select_row(RowId::from("r1"), true);
        let rows: Vec<_> = selection.rows().iter().map(RowId::as_str).collect();
        assert_eq!(rows, ["r2"]);
    }

    #[test]
    fn object_multi_select_leaves_rows_alone() {
        let mut selection = Selection::new();
        selection.select_row(RowId::from("r1"), false);

        selection.select_object(ObjectId::from("o1"), true);

        assert_eq!(selection.rows().len(), 1);
        assert_eq!(selection.objects().len(), 1);
    }

    #[test]
    fn clear_preserves_objects() {
        let mut selection = Selection::new();
        selection.select_object(ObjectId::from("o1"), false);
        selection.select_row(RowId::from("r1"), true);

        selection.clear();
        assert!(selection.rows().is_empty());
        assert_eq!(selection.objects().len(), 1);

        selection.clear_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn area_query_is_inclusive_and_ordered() {
        let rows = vec![row_at("a", 10.0, 10.0), row_at("b", 500.0, 500.0), row_at("c", 100.0, 0.0)];
        let objects = vec![object_at("o1", 100.0, 100.0), object_at("o2", 101.0, 50.0)];

        let rect = Rect::from_corners(Point::new(100.0, 100.0), Point::new(0.0, 0.0));
        let hits = area_query(&rect, &rows, &objects);

        assert_eq!(hits.rows, vec![RowId::from("a"), RowId::from("c")]);
        assert_eq!(hits.objects, vec![ObjectId::from("o1")]);
    }
}
