//! Editor commands.

use crate::selection::Rect;
use crate::types::{
    BatchLabelingOptions, Delta, ObjectId, Point, RowId, SeatId, SeatMap, VenueObjectKind,
};
use seatmap_macros::Action;

/// Every command the editor accepts
///
/// Variants are classified for logging and metrics:
/// - `#[mutation]`: may change the map and, if it does, persists it
/// - `#[selection]`: changes only the selection
/// - `#[session]`: changes only the drag session
#[derive(Action, Clone, Debug, PartialEq)]
pub enum EditorAction {
    // ========== Map lifecycle ==========
    /// Replace the current map with a new empty one, clearing saved state first
    #[mutation]
    CreateMap {
        /// Map name
        name: String,
    },

    /// Replace the current map with a freshly built template
    #[mutation]
    LoadTemplate {
        /// Catalog id (`"small-theatre"`)
        template_id: String,
    },

    /// Replace the current map with an imported payload
    #[mutation]
    ImportMap {
        /// Exported JSON text
        payload: String,
    },

    /// Adopt a previously saved map at startup (not persisted again)
    RestoreMap {
        /// The loaded map
        map: Box<SeatMap>,
    },

    // ========== Add ==========
    /// Append a row at an absolute position
    #[mutation]
    AddRow {
        /// Row label
        label: String,
        /// Anchor position
        position: Point,
    },

    /// Append an auto-labelled, auto-positioned row
    #[mutation]
    AddNextRow,

    /// Append a seat to a row
    #[mutation]
    AddSeat {
        /// Owning row
        row_id: RowId,
        /// Seat label
        label: String,
        /// Row-relative position
        position: Point,
    },

    /// Append an auto-labelled, auto-positioned seat to a row
    #[mutation]
    AddNextSeat {
        /// Owning row
        row_id: RowId,
    },

    /// Place a venue object
    #[mutation]
    AddObject {
        /// Object kind
        kind: VenueObjectKind,
        /// Absolute position
        position: Point,
    },

    // ========== Delete ==========
    /// Remove a row and its seats
    #[mutation]
    DeleteRow {
        /// Row to remove
        row_id: RowId,
    },

    /// Remove several rows
    #[mutation]
    DeleteMultipleRows {
        /// Rows to remove
        row_ids: Vec<RowId>,
    },

    /// Remove one seat
    #[mutation]
    DeleteSeat {
        /// Owning row
        row_id: RowId,
        /// Seat to remove
        seat_id: SeatId,
    },

    /// Remove several seats from any rows
    #[mutation]
    DeleteMultipleSeats {
        /// Seats to remove
        seat_ids: Vec<SeatId>,
    },

    /// Remove one venue object
    #[mutation]
    DeleteObject {
        /// Object to remove
        object_id: ObjectId,
    },

    /// Remove several venue objects
    #[mutation]
    DeleteSelectedObjects {
        /// Objects to remove
        object_ids: Vec<ObjectId>,
    },

    // ========== Update ==========
    /// Relabel a seat
    #[mutation]
    UpdateSeatLabel {
        /// Owning row
        row_id: RowId,
        /// Seat to relabel
        seat_id: SeatId,
        /// New label
        label: String,
    },

    /// Relabel a row
    #[mutation]
    UpdateRowLabel {
        /// Row to relabel
        row_id: RowId,
        /// New label
        label: String,
    },

    /// Relabel a venue object
    #[mutation]
    UpdateObjectLabel {
        /// Object to relabel
        object_id: ObjectId,
        /// New label
        label: String,
    },

    /// Flip a seat's availability
    #[mutation]
    ToggleSeatAvailability {
        /// Owning row
        row_id: RowId,
        /// Seat to toggle
        seat_id: SeatId,
    },

    /// Relabel the selected rows, in selection order
    #[mutation]
    ApplyBatchLabels {
        /// Labeling options
        options: BatchLabelingOptions,
    },

    // ========== Move ==========
    /// Set a seat's row-relative position
    #[mutation]
    MoveSeat {
        /// Owning row
        row_id: RowId,
        /// Seat to move
        seat_id: SeatId,
        /// Target position
        position: Point,
    },

    /// Set a row's anchor
    #[mutation]
    MoveRow {
        /// Row to move
        row_id: RowId,
        /// Target position
        position: Point,
    },

    /// Set an object's position
    #[mutation]
    MoveObject {
        /// Object to move
        object_id: ObjectId,
        /// Target position
        position: Point,
    },

    /// Move rows by `delta` from where the current drag started
    #[mutation]
    MoveMultipleRows {
        /// Rows being dragged
        row_ids: Vec<RowId>,
        /// Displacement since drag start
        delta: Delta,
    },

    /// Move objects by `delta` from where the current drag started
    #[mutation]
    MoveMultipleObjects {
        /// Objects being dragged
        object_ids: Vec<ObjectId>,
        /// Displacement since drag start
        delta: Delta,
    },

    // ========== Selection ==========
    /// Select a row
    #[selection]
    SelectRow {
        /// Row to select
        row_id: RowId,
        /// Toggle instead of replacing
        multi_select: bool,
    },

    /// Select a seat
    #[selection]
    SelectSeat {
        /// Seat to select
        seat_id: SeatId,
        /// Toggle instead of replacing
        multi_select: bool,
    },

    /// Select a venue object
    #[selection]
    SelectObject {
        /// Object to select
        object_id: ObjectId,
        /// Toggle instead of replacing
        multi_select: bool,
    },

    /// Replace the row selection, clearing the other kinds
    #[selection]
    SelectMultipleRows {
        /// Rows to select
        row_ids: Vec<RowId>,
    },

    /// Replace the object selection, clearing the other kinds
    #[selection]
    SelectMultipleObjects {
        /// Objects to select
        object_ids: Vec<ObjectId>,
    },

    /// Clear rows and seats, keeping objects
    #[selection]
    ClearSelection,

    /// Clear every selection kind
    #[selection]
    ClearAll,

    /// Select whatever a drag rectangle covers and end the drag
    #[selection]
    CompleteAreaSelection {
        /// Query rectangle
        rect: Rect,
    },

    // ========== Drag session ==========
    /// Snapshot the positions of the selected rows and objects
    #[session]
    BeginDrag,

    /// Drop the drag snapshot
    #[session]
    ClearInitialPositions,
}
