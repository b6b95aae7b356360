//! Entity model for seat maps.
//!
//! A [`SeatMap`] is the single root aggregate. It owns an ordered list of
//! [`Row`]s (each owning its [`Seat`]s) and an ordered list of free-standing
//! [`VenueObject`]s. These are plain data definitions; every mutation lives in
//! [`crate::ops`] and returns a new value.
//!
//! # Coordinates
//!
//! - Row and object positions are absolute canvas coordinates.
//! - Seat positions are relative to the owning row's anchor.
//! - The canvas has no negative coordinate space, see [`Point::clamped`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an already generated identifier
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier text
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true when the identifier text is empty
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`SeatMap`]
    MapId
);
entity_id!(
    /// Identifier of a [`Row`]
    RowId
);
entity_id!(
    /// Identifier of a [`Seat`]
    SeatId
);
entity_id!(
    /// Identifier of a [`VenueObject`]
    ObjectId
);

/// A point on the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point with both coordinates clamped to `>= 0`.
    ///
    /// Non-finite coordinates (`NaN`, `±inf`) collapse to `0`, since JSON
    /// cannot carry them.
    #[must_use]
    pub fn clamped(self) -> Self {
        fn canvas(value: f64) -> f64 {
            if value.is_finite() {
                value.max(0.0)
            } else {
                0.0
            }
        }

        Self {
            x: canvas(self.x),
            y: canvas(self.y),
        }
    }

    /// Returns this point shifted by `delta`
    #[must_use]
    pub fn offset(self, delta: Delta) -> Self {
        Self {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
        }
    }
}

/// A displacement relative to a drag start
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Horizontal displacement
    pub dx: f64,
    /// Vertical displacement
    pub dy: f64,
}

impl Delta {
    /// Creates a displacement
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Width and height of a venue object
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in canvas units
    pub width: f64,
    /// Height in canvas units
    pub height: f64,
}

impl Size {
    /// Creates a size
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A single seat, owned by exactly one [`Row`].
///
/// `row_id` is a lookup back-reference; the seat lives inside
/// `row.seats` of the row whose id equals `row_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    /// Globally unique, immutable identifier
    pub id: SeatId,
    /// Display label
    pub label: String,
    /// Owning row
    pub row_id: RowId,
    /// Position relative to the owning row's anchor
    #[serde(default)]
    pub position: Point,
    /// Availability: `None` when never set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    /// Pricing/presentation category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An ordered group of seats sharing one anchor position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Globally unique, immutable identifier
    pub id: RowId,
    /// Display label
    pub label: String,
    /// Seats in left-to-right order
    pub seats: Vec<Seat>,
    /// Anchor in canvas coordinates
    #[serde(default)]
    pub position: Point,
}

impl Row {
    /// Finds a seat of this row by id
    #[must_use]
    pub fn seat(&self, seat_id: &SeatId) -> Option<&Seat> {
        self.seats.iter().find(|seat| &seat.id == seat_id)
    }
}

/// Kind of a venue object.
///
/// Unrecognised kinds from imported payloads decode to [`VenueObjectKind::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueObjectKind {
    /// Projection screen
    Screen,
    /// Table
    Table,
    /// Bar counter
    Bar,
    /// Stage
    Stage,
    /// Entrance door
    Entrance,
    /// Exit door
    Exit,
    /// Restroom
    Restroom,
    /// Elevator
    Elevator,
    /// Anything this version does not know how to render
    #[serde(other)]
    Unknown,
}

impl VenueObjectKind {
    /// All kinds that can be placed from the toolbar
    pub const PLACEABLE: [Self; 8] = [
        Self::Screen,
        Self::Table,
        Self::Bar,
        Self::Stage,
        Self::Entrance,
        Self::Exit,
        Self::Restroom,
        Self::Elevator,
    ];

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Table => "table",
            Self::Bar => "bar",
            Self::Stage => "stage",
            Self::Entrance => "entrance",
            Self::Exit => "exit",
            Self::Restroom => "restroom",
            Self::Elevator => "elevator",
            Self::Unknown => "unknown",
        }
    }

    /// Capitalised name used for default labels (`"Stage"`)
    #[must_use]
    pub fn display_name(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl std::str::FromStr for VenueObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PLACEABLE
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown venue object type: {s}"))
    }
}

impl std::fmt::Display for VenueObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-standing canvas item (stage, door, table, ...)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueObject {
    /// Globally unique, immutable identifier
    pub id: ObjectId,
    /// Object kind
    #[serde(rename = "type")]
    pub kind: VenueObjectKind,
    /// Display label
    pub label: String,
    /// Anchor in canvas coordinates
    pub position: Point,
    /// Footprint
    pub size: Size,
    /// Optional fill color (CSS notation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The root aggregate: one venue layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    /// Map identifier
    pub id: MapId,
    /// Human readable name
    pub name: String,
    /// Rows in map order
    pub rows: Vec<Row>,
    /// Venue objects in map order
    #[serde(default)]
    pub objects: Vec<VenueObject>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last structural or positional change
    pub updated_at: DateTime<Utc>,
}

impl SeatMap {
    /// Finds a row by id
    #[must_use]
    pub fn row(&self, row_id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|row| &row.id == row_id)
    }

    /// Finds a venue object by id
    #[must_use]
    pub fn object(&self, object_id: &ObjectId) -> Option<&VenueObject> {
        self.objects.iter().find(|object| &object.id == object_id)
    }

    /// Finds a seat anywhere in the map
    #[must_use]
    pub fn seat(&self, seat_id: &SeatId) -> Option<&Seat> {
        self.rows.iter().find_map(|row| row.seat(seat_id))
    }

    /// Total number of seats across all rows
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(|row| row.seats.len()).sum()
    }
}

/// Options for [`crate::labeling::apply_batch_labeling`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLabelingOptions {
    /// Prefix for row labels (`"{prefix} {n}"`)
    pub row_prefix: String,
    /// Prefix for seat labels (`"{prefix}{k}"`)
    pub seat_prefix: String,
    /// Number given to the first row
    pub start_number: i64,
    /// Informational upper bound shown in previews; never enforced
    pub end_number: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_clamps_negative_and_nan() {
        assert_eq!(Point::new(-5.0, 3.0).clamped(), Point::new(0.0, 3.0));
        assert_eq!(Point::new(f64::NAN, -1.0).clamped(), Point::new(0.0, 0.0));
    }

    #[test]
    fn point_clamps_infinities_to_origin() {
        assert_eq!(
            Point::new(f64::INFINITY, 12.5).clamped(),
            Point::new(0.0, 12.5)
        );
        assert_eq!(
            Point::new(4.0, f64::NEG_INFINITY).clamped(),
            Point::new(4.0, 0.0)
        );
    }

    #[test]
    fn unknown_object_kind_decodes_to_fallback() {
        let kind: VenueObjectKind = serde_json::from_str("\"dancefloor\"").unwrap();
        assert_eq!(kind, VenueObjectKind::Unknown);

        let kind: VenueObjectKind = serde_json::from_str("\"stage\"").unwrap();
        assert_eq!(kind, VenueObjectKind::Stage);
    }

    #[test]
    fn object_kind_display_name() {
        assert_eq!(VenueObjectKind::Restroom.display_name(), "Restroom");
        assert_eq!("ELEVATOR".parse::<VenueObjectKind>(), Ok(VenueObjectKind::Elevator));
        assert!("unknown".parse::<VenueObjectKind>().is_err());
    }

    #[test]
    fn seat_serializes_camel_case_and_omits_unknown_availability() {
        let seat = Seat {
            id: SeatId::from("s1"),
            label: "A1".to_string(),
            row_id: RowId::from("r1"),
            position: Point::new(10.0, 30.0),
            is_available: None,
            category: None,
        };

        let json = serde_json::to_value(&seat).unwrap();
        assert_eq!(json["rowId"], "r1");
        assert!(json.get("isAvailable").is_none());
        assert!(json.get("category").is_none());
    }
}
