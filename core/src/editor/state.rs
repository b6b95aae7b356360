//! Editor state.

use super::drag::DragSession;
use crate::error::ImportError;
use crate::selection::Selection;
use crate::types::SeatMap;

/// Everything the editor holds between commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    /// The map being edited, if one is loaded
    pub current_map: Option<SeatMap>,
    /// Selected rows, seats and objects
    pub selection: Selection,
    /// Drag-start snapshot while a multi-entity drag is in progress
    pub drag: Option<DragSession>,
    /// Outcome of the most recent failed import, cleared by a successful one
    pub last_import_error: Option<ImportError>,
}

impl EditorState {
    /// Creates state with no map loaded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state editing `map`
    #[must_use]
    pub fn with_map(map: SeatMap) -> Self {
        Self {
            current_map: Some(map),
            ..Self::default()
        }
    }

    /// True while a map is loaded
    #[must_use]
    pub const fn has_map(&self) -> bool {
        self.current_map.is_some()
    }
}
