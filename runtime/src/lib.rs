//! # Seatmap Runtime
//!
//! Runtime for the seat map editor.
//!
//! This crate provides the Store that coordinates reducer execution and
//! executes the persistence effects reducers describe.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer, environment and the persistence adapter
//! - **Effect Executor**: Runs `Persist`/`ClearPersisted` against the adapter
//! - **Persistence adapters** ([`persistence`]): in-memory and JSON file
//!
//! Effects are fire-and-forget. A failed save is logged, counted and reported
//! through [`store::Store::health`], but the in-memory state keeps the change.
//!
//! ## Example
//!
//! ```
//! use seatmap_core::editor::{EditorAction, EditorEnvironment};
//! use seatmap_runtime::EditorStore;
//! use seatmap_runtime::persistence::InMemoryPersistence;
//!
//! let mut store = EditorStore::open(EditorEnvironment::production(), InMemoryPersistence::new());
//!
//! // Send an action
//! store.send(EditorAction::CreateMap { name: "Hall A".into() });
//! store.send(EditorAction::AddNextRow);
//!
//! // Read state
//! let rows = store.state(|s| s.current_map.as_ref().map(|m| m.rows.len()));
//! assert_eq!(rows, Some(1));
//! ```

pub mod persistence;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Effect failures are not errors here: they are logged and surface
    /// through the health check instead.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The operation needs a loaded map and there is none
        #[error("No seat map is loaded")]
        NoMap,

        /// The export envelope could not be encoded
        #[error("Failed to encode seat map: {0}")]
        Serialization(#[from] serde_json::Error),
    }
}

/// Health check status levels
///
/// Indicates the current health state of a component or system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is fully operational
    Healthy,

    /// Edits still apply but at least one of them was not saved
    Degraded,
}

impl HealthStatus {
    /// Check if status is healthy
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Check if status is degraded
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Degraded)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// Health check result for a component
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    pub message: Option<String>,

    /// Optional metadata (e.g., failure counts)
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// Create a degraded check result
    #[must_use]
    pub fn degraded(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Add metadata to the health check
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// Looks up a metadata value by key
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::HealthCheck;
    use seatmap_core::PersistenceError;
    use seatmap_core::effect::Effect;
    use seatmap_core::environment::Persistence;
    use seatmap_core::reducer::{Action, Reducer};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned; commands are applied one at a time through `&mut self`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Persistence adapter (effect execution target)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        persistence: Box<dyn Persistence>,
        failed_effects: u64,
        last_failure: Option<String>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Action,
    {
        /// Create a new store with initial state, reducer, environment and
        /// persistence adapter
        ///
        /// Nothing is loaded from `persistence` here; see
        /// [`Store::open`](crate::EditorStore::open) for the editor's startup path.
        pub fn new(
            initial_state: S,
            reducer: R,
            environment: E,
            persistence: impl Persistence + 'static,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                persistence: Box::new(persistence),
                failed_effects: 0,
                last_failure: None,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then executes every returned effect in order
        /// before returning. Effect failures never propagate to the caller.
        #[tracing::instrument(
            skip(self, action),
            name = "store_send",
            fields(action = action.name(), kind = action.kind())
        )]
        pub fn send(&mut self, action: A) {
            tracing::debug!("Processing action");
            metrics::counter!("seatmap.actions.total", "kind" => action.kind()).increment(1);

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer
                    .reduce(&mut self.state, action, &self.environment)
            };

            tracing::debug!(effects = effects.len(), "Reducer completed");
            for effect in effects {
                self.execute_effect(effect);
            }
        }

        /// Read state via a closure
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the current state
        pub const fn state_ref(&self) -> &S {
            &self.state
        }

        /// The injected environment
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// The persistence adapter effects run against
        pub fn persistence(&self) -> &dyn Persistence {
            self.persistence.as_ref()
        }

        /// Perform a health check on the Store
        ///
        /// Degraded once any effect has failed; the message carries the most
        /// recent failure.
        #[must_use]
        pub fn health(&self) -> HealthCheck {
            let check = match &self.last_failure {
                Some(failure) => HealthCheck::degraded("store", failure.clone()),
                None => HealthCheck::healthy("store"),
            };

            check.with_metadata("failed_effects", self.failed_effects.to_string())
        }

        #[tracing::instrument(skip(self, effect), fields(effect = effect.name()), name = "execute_effect")]
        fn execute_effect(&mut self, effect: Effect) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                }
                Effect::Persist(map) => {
                    tracing::trace!(map_id = %map.id, "Executing Effect::Persist");
                    match self.persistence.save(&map) {
                        Ok(()) => {
                            metrics::counter!("seatmap.effects.persisted.total").increment(1);
                        }
                        Err(error) => self.record_failure("persist", &error),
                    }
                }
                Effect::ClearPersisted => {
                    tracing::trace!("Executing Effect::ClearPersisted");
                    match self.persistence.clear() {
                        Ok(()) => {
                            metrics::counter!("seatmap.effects.cleared.total").increment(1);
                        }
                        Err(error) => self.record_failure("clear_persisted", &error),
                    }
                }
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                }
            }
        }

        fn record_failure(&mut self, effect: &'static str, error: &PersistenceError) {
            tracing::error!(effect, error = %error, "Effect execution failed");
            metrics::counter!("seatmap.effects.failed.total", "effect" => effect).increment(1);
            self.failed_effects += 1;
            self.last_failure = Some(format!("{effect} failed: {error}"));
        }
    }
}

/// The editor's concrete store
pub mod editor {
    use super::error::StoreError;
    use super::store::Store;
    use seatmap_core::editor::{EditorAction, EditorEnvironment, EditorReducer, EditorState};
    use seatmap_core::environment::Persistence;
    use seatmap_core::serialization::{self, ExportEnvelope, ImportResult};
    use seatmap_core::{ImportError, SeatMap};

    /// Store specialised to the seat map editor
    pub type EditorStore = Store<EditorState, EditorAction, EditorEnvironment, EditorReducer>;

    impl EditorStore {
        /// Opens an editor, restoring the last saved map from `persistence`
        ///
        /// A load failure is logged and the editor starts empty.
        pub fn open(environment: EditorEnvironment, persistence: impl Persistence + 'static) -> Self {
            let saved = persistence.load();
            let mut store = Self::new(
                EditorState::new(),
                EditorReducer::new(),
                environment,
                persistence,
            );

            match saved {
                Ok(Some(map)) => {
                    tracing::info!(map_id = %map.id, name = %map.name, "Restored saved seat map");
                    store.send(EditorAction::RestoreMap { map: Box::new(map) });
                }
                Ok(None) => tracing::debug!("No saved seat map"),
                Err(error) => tracing::warn!(error = %error, "Failed to load saved seat map"),
            }

            store
        }

        /// The map being edited, if any
        pub fn current_map(&self) -> Option<&SeatMap> {
            self.state_ref().current_map.as_ref()
        }

        /// Imports `payload` and reports the outcome
        ///
        /// On success the imported map replaces the current one and is
        /// persisted; on failure the current map is untouched.
        ///
        /// # Errors
        ///
        /// Returns the [`ImportError`] describing the first violation found.
        pub fn import_map(&mut self, payload: impl Into<String>) -> ImportResult {
            self.send(EditorAction::ImportMap {
                payload: payload.into(),
            });

            self.state(|state| match (&state.last_import_error, &state.current_map) {
                (Some(error), _) => Err(error.clone()),
                (None, Some(map)) => Ok(map.clone()),
                (None, None) => Err(ImportError::Validation(
                    "Invalid seat map format. Missing required fields.".to_string(),
                )),
            })
        }

        /// Builds the export envelope for the current map
        ///
        /// The envelope carries a copy stamped with the current time; the
        /// loaded map itself is not modified.
        pub fn export(&self) -> Option<ExportEnvelope> {
            let now = self.environment().clock.now();
            self.current_map()
                .map(|map| serialization::export_map(map, now))
        }

        /// Exports the current map as pretty-printed JSON
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::NoMap`] when nothing is loaded, or
        /// [`StoreError::Serialization`] if encoding fails.
        pub fn export_json(&self) -> Result<String, StoreError> {
            let envelope = self.export().ok_or(StoreError::NoMap)?;
            Ok(serialization::to_json(&envelope)?)
        }
    }
}

pub use editor::EditorStore;
pub use error::StoreError;
pub use store::Store;
