//! Catalog of pre-built layouts.
//!
//! Each template is a list of row sections plus fixed venue objects. Building
//! one mints fresh ids for every entity, so loading the same template twice
//! never produces colliding ids. Sections with partial availability draw from
//! the supplied RNG; seed it for reproducible layouts.

use crate::environment::IdGenerator;
use crate::types::{
    MapId, ObjectId, Point, Row, RowId, Seat, SeatId, SeatMap, Size, VenueObject, VenueObjectKind,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// A band of similar rows
#[derive(Debug)]
struct Section {
    /// Row label stem, numbered from 1 (`"Left Row"` gives `"Left Row 3"`)
    row_label: &'static str,
    /// Seat label prefix, followed by row and seat numbers (`"L"` gives `"L34"`)
    seat_prefix: &'static str,
    rows: usize,
    seats_per_row: usize,
    /// Adds one seat every second row
    widening: bool,
    seat_spacing: f64,
    origin: Point,
    row_spacing: f64,
    /// Probability that a seat starts available
    availability: f64,
    category: &'static str,
}

#[derive(Debug)]
struct FixedObject {
    kind: VenueObjectKind,
    label: &'static str,
    position: Point,
    size: Size,
    color: &'static str,
}

/// A named, pre-built layout
#[derive(Debug)]
pub struct Template {
    /// Stable identifier (`"small-theatre"`)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    map_name: &'static str,
    sections: &'static [Section],
    objects: &'static [FixedObject],
}

static TEMPLATES: [Template; 4] = [
    Template {
        id: "large-theatre",
        name: "Large Theatre",
        description: "Professional theater with multiple sections",
        map_name: "Theater",
        sections: &[
            Section {
                row_label: "Central Row",
                seat_prefix: "C",
                rows: 5,
                seats_per_row: 5,
                widening: false,
                seat_spacing: 100.0,
                origin: Point::new(400.0, 200.0),
                row_spacing: 40.0,
                availability: 1.0,
                category: "premium",
            },
            Section {
                row_label: "Left Row",
                seat_prefix: "L",
                rows: 5,
                seats_per_row: 5,
                widening: true,
                seat_spacing: 35.0,
                origin: Point::new(140.0, 200.0),
                row_spacing: 40.0,
                availability: 0.8,
                category: "premium",
            },
            Section {
                row_label: "Right Row",
                seat_prefix: "R",
                rows: 5,
                seats_per_row: 6,
                widening: true,
                seat_spacing: 35.0,
                origin: Point::new(650.0, 200.0),
                row_spacing: 40.0,
                availability: 0.8,
                category: "premium",
            },
            Section {
                row_label: "Side Row",
                seat_prefix: "S",
                rows: 5,
                seats_per_row: 2,
                widening: false,
                seat_spacing: 35.0,
                origin: Point::new(20.0, 200.0),
                row_spacing: 40.0,
                availability: 0.9,
                category: "standard",
            },
        ],
        objects: &[FixedObject {
            kind: VenueObjectKind::Stage,
            label: "General Admission",
            position: Point::new(200.0, 100.0),
            size: Size::new(100.0, 60.0),
            color: "#ff6b6b",
        }],
    },
    Template {
        id: "small-theatre",
        name: "Small Theatre",
        description: "Basic theatre layout",
        map_name: "Theatre",
        sections: &[Section {
            row_label: "Row",
            seat_prefix: "",
            rows: 6,
            seats_per_row: 12,
            widening: false,
            seat_spacing: 35.0,
            origin: Point::new(150.0, 200.0),
            row_spacing: 60.0,
            availability: 1.0,
            category: "standard",
        }],
        objects: &[],
    },
    Template {
        id: "gala-dinner",
        name: "Gala Dinner",
        description: "Elegant dining layout",
        map_name: "Conference Room",
        sections: &[Section {
            row_label: "Row",
            seat_prefix: "",
            rows: 4,
            seats_per_row: 8,
            widening: false,
            seat_spacing: 40.0,
            origin: Point::new(200.0, 300.0),
            row_spacing: 50.0,
            availability: 1.0,
            category: "standard",
        }],
        objects: &[],
    },
    Template {
        id: "trade-show",
        name: "Trade Show",
        description: "Exhibition booth layout",
        map_name: "Restaurant",
        sections: &[Section {
            row_label: "Table",
            seat_prefix: "",
            rows: 3,
            seats_per_row: 4,
            widening: false,
            seat_spacing: 60.0,
            origin: Point::new(200.0, 200.0),
            row_spacing: 100.0,
            availability: 1.0,
            category: "dining",
        }],
        objects: &[],
    },
];

/// All templates, in catalog order
#[must_use]
pub fn templates() -> &'static [Template] {
    &TEMPLATES
}

/// Looks up a template by its stable id
#[must_use]
pub fn template_by_id(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}

impl Template {
    /// Builds a fresh map from this template
    pub fn build<R>(&self, ids: &dyn IdGenerator, now: DateTime<Utc>, rng: &mut R) -> SeatMap
    where
        R: Rng,
    {
        let rows = self
            .sections
            .iter()
            .flat_map(|section| (0..section.rows).map(move |index| (section, index)))
            .map(|(section, index)| section.build_row(index, ids, &mut *rng))
            .collect();

        let objects = self
            .objects
            .iter()
            .map(|fixed| VenueObject {
                id: ObjectId::new(ids.next_id()),
                kind: fixed.kind,
                label: fixed.label.to_string(),
                position: fixed.position,
                size: fixed.size,
                color: Some(fixed.color.to_string()),
            })
            .collect();

        SeatMap {
            id: MapId::new(ids.next_id()),
            name: self.map_name.to_string(),
            rows,
            objects,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Section {
    #[allow(clippy::cast_precision_loss)] // template indices are tiny
    fn build_row<R>(&self, index: usize, ids: &dyn IdGenerator, rng: &mut R) -> Row
    where
        R: Rng,
    {
        let row_id = RowId::new(ids.next_id());
        let count = if self.widening {
            self.seats_per_row + index / 2
        } else {
            self.seats_per_row
        };

        let seats = (0..count)
            .map(|seat| Seat {
                id: SeatId::new(ids.next_id()),
                label: format!("{}{}{}", self.seat_prefix, index + 1, seat + 1),
                row_id: row_id.clone(),
                position: Point::new(seat as f64 * self.seat_spacing, 0.0),
                is_available: Some(self.availability >= 1.0 || rng.gen_bool(self.availability)),
                category: Some(self.category.to_string()),
            })
            .collect();

        Row {
            id: row_id,
            label: format!("{} {}", self.row_label, index + 1),
            seats,
            position: Point::new(
                self.origin.x,
                self.origin.y + index as f64 * self.row_spacing,
            ),
        }
    }
}
