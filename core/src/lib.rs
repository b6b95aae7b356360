//! # Seatmap Core
//!
//! In-memory layout model and mutation/selection engine for seat maps.
//!
//! This crate holds everything with invariants worth testing and nothing that
//! performs I/O:
//!
//! - **Entity model** ([`types`]): seats grouped into rows, venue objects, the
//!   [`SeatMap`] root aggregate
//! - **Map operations** ([`ops`]): pure create/update/move/delete functions
//! - **Batch labeling** ([`labeling`]): deterministic relabeling of selected rows
//! - **Selection & area query** ([`selection`]): selected id sets and rectangle
//!   hit-testing
//! - **Serialization** ([`serialization`]): JSON export envelope and validated import
//! - **Template catalog** ([`templates`]): pre-built layouts
//! - **Editor** ([`editor`]): the state controller expressed as a reducer
//!
//! ## Architecture
//!
//! The editor follows the reducer pattern:
//!
//! - **State**: [`editor::EditorState`] (current map, selection, drag session)
//! - **Action**: [`editor::EditorAction`], one variant per command
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: [`effect::Effect`], a description of persistence work
//! - **Environment**: clock, id generator and template seed, injected via traits
//!
//! The runtime crate owns the persistence adapter and executes the effects.
//!
//! ## Example
//!
//! ```
//! use seatmap_core::editor::{EditorAction, EditorEnvironment, EditorReducer, EditorState};
//! use seatmap_core::reducer::Reducer;
//!
//! let env = EditorEnvironment::production();
//! let reducer = EditorReducer::new();
//! let mut state = EditorState::default();
//!
//! reducer.reduce(&mut state, EditorAction::CreateMap { name: "Hall A".into() }, &env);
//! reducer.reduce(&mut state, EditorAction::AddNextRow, &env);
//!
//! let map = state.current_map.as_ref().map(|map| map.rows.len());
//! assert_eq!(map, Some(1));
//! ```

// Lets `#[derive(Action)]` name this crate from inside it
extern crate self as seatmap_core;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

pub mod editor;
pub mod error;
pub mod labeling;
pub mod ops;
pub mod selection;
pub mod serialization;
pub mod templates;
pub mod types;

pub use error::{ImportError, PersistenceError};
pub use reducer::Action;
pub use seatmap_macros::Action;
pub use serialization::{ExportEnvelope, ImportResult};
pub use types::{
    BatchLabelingOptions, Delta, MapId, ObjectId, Point, Row, RowId, Seat, SeatId, SeatMap, Size,
    VenueObject, VenueObjectKind,
};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// Classification of an action, used for span fields and metric labels
    ///
    /// Implemented by `#[derive(Action)]`.
    pub trait Action {
        /// The variant name
        fn name(&self) -> &'static str;

        /// `"mutation"`, `"selection"`, `"session"` or `"other"`
        fn kind(&self) -> &'static str;
    }

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Checks the action against current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime, in order
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe persistence work to be performed by the runtime.
/// They are values (not execution), so reducer tests can assert on them.
pub mod effect {
    use crate::types::SeatMap;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are returned from reducers
    /// and executed by the Store runtime against its persistence adapter.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Effect {
        /// No-op effect
        None,

        /// Save this map as the current persisted state
        Persist(Box<SeatMap>),

        /// Remove any previously persisted state
        ClearPersisted,

        /// Run effects one after another
        Sequential(Vec<Effect>),
    }

    impl Effect {
        /// Persist a snapshot of `map`
        #[must_use]
        pub fn persist(map: &SeatMap) -> Self {
            Self::Persist(Box::new(map.clone()))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Self>) -> Self {
            Self::Sequential(effects)
        }

        /// Short name used in logs and metric labels
        #[must_use]
        pub const fn name(&self) -> &'static str {
            match self {
                Self::None => "none",
                Self::Persist(_) => "persist",
                Self::ClearPersisted => "clear_persisted",
                Self::Sequential(_) => "sequential",
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter or owned by the runtime.
pub mod environment {
    use crate::error::PersistenceError;
    use crate::types::SeatMap;
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use seatmap_core::environment::{Clock, SystemClock};
    ///
    /// let before = chrono::Utc::now();
    /// assert!(SystemClock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of collision-resistant entity identifiers.
    ///
    /// Identifiers are never reused within the lifetime of a loaded map.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> String;
    }

    /// Production id generator (random UUID v4, hyphenated)
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidIdGenerator;

    impl IdGenerator for UuidIdGenerator {
        fn next_id(&self) -> String {
            uuid::Uuid::new_v4().to_string()
        }
    }

    /// Persistence adapter contract.
    ///
    /// The runtime calls `load` once at startup, `save` after every
    /// map-changing command, and `clear` only when a brand-new map is created.
    pub trait Persistence: Send + Sync {
        /// Load the previously saved map, if any
        ///
        /// # Errors
        ///
        /// Returns error if the storage cannot be read or holds invalid data.
        fn load(&self) -> Result<Option<SeatMap>, PersistenceError>;

        /// Save `map` as the current state
        ///
        /// # Errors
        ///
        /// Returns error if the storage cannot be written.
        fn save(&self, map: &SeatMap) -> Result<(), PersistenceError>;

        /// Remove any saved state
        ///
        /// # Errors
        ///
        /// Returns error if the storage cannot be written.
        fn clear(&self) -> Result<(), PersistenceError>;
    }
}
