//! The application state controller, expressed as a reducer.
//!
//! [`EditorState`] holds the current map, the selection and the transient
//! drag session. Every command is an [`EditorAction`]; [`EditorReducer`]
//! applies it through the pure functions in [`crate::ops`], replaces the held
//! map atomically, prunes dangling selection ids and describes any
//! persistence work as [`crate::effect::Effect`] values.
//!
//! Commands against an absent map or unknown ids are silent no-ops: they
//! leave state untouched and return no effects.

mod actions;
mod drag;
mod reducer;
mod state;

pub use actions::EditorAction;
pub use drag::DragSession;
pub use reducer::{EditorEnvironment, EditorReducer};
pub use state::EditorState;
