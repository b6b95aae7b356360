//! Reducer for the editor.

use super::actions::EditorAction;
use super::drag::DragSession;
use super::state::EditorState;
use crate::effect::Effect;
use crate::environment::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use crate::reducer::Reducer;
use crate::selection::area_query;
use crate::types::{RowId, SeatMap};
use crate::{SmallVec, labeling, ops, serialization, smallvec, templates};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Environment dependencies for the editor reducer
#[derive(Clone)]
pub struct EditorEnvironment {
    /// Clock for `createdAt`/`updatedAt` stamps
    pub clock: Arc<dyn Clock>,
    /// Source of entity ids
    pub ids: Arc<dyn IdGenerator>,
    /// Seed for template availability; `None` seeds from entropy
    pub template_seed: Option<u64>,
}

impl EditorEnvironment {
    /// Creates an environment with unseeded templates
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            clock,
            ids,
            template_seed: None,
        }
    }

    /// System clock and UUID ids
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidIdGenerator))
    }

    /// Sets the template availability seed
    #[must_use]
    pub const fn with_template_seed(mut self, seed: Option<u64>) -> Self {
        self.template_seed = seed;
        self
    }

    fn template_rng(&self) -> StdRng {
        self.template_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

type Effects = SmallVec<[Effect; 4]>;

/// Reducer for the editor
#[derive(Clone, Debug, Default)]
pub struct EditorReducer;

impl EditorReducer {
    /// Creates a new `EditorReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Installs `next` if it differs from the current map.
    ///
    /// Selection ids that no longer exist are pruned. Returns the persist
    /// effect, or nothing when the map did not change.
    fn commit(state: &mut EditorState, next: SeatMap) -> Effects {
        if state.current_map.as_ref() == Some(&next) {
            return SmallVec::new();
        }

        state.selection.prune(&next);
        let effect = Effect::persist(&next);
        state.current_map = Some(next);
        smallvec![effect]
    }

    /// Runs a map transform against the current map, if there is one
    fn update_map<F>(state: &mut EditorState, env: &EditorEnvironment, transform: F) -> Effects
    where
        F: FnOnce(&SeatMap, DateTime<Utc>) -> SeatMap,
    {
        let Some(map) = state.current_map.as_ref() else {
            tracing::debug!("no map loaded, ignoring");
            return SmallVec::new();
        };

        let next = transform(map, env.clock.now());
        Self::commit(state, next)
    }

    /// Swaps in a whole new map, dropping selection and drag state
    fn replace_map(state: &mut EditorState, map: SeatMap) {
        state.selection.clear_all();
        state.drag = None;
        state.current_map = Some(map);
    }
}

impl Reducer for EditorReducer {
    type State = EditorState;
    type Action = EditorAction;
    type Environment = EditorEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per command
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect; 4]> {
        let ids = env.ids.as_ref();

        match action {
            // ========== Map lifecycle ==========
            EditorAction::CreateMap { name } => {
                let map = ops::create_empty_map(ids, &name, env.clock.now());
                let persist = Effect::persist(&map);
                Self::replace_map(state, map);
                smallvec![Effect::chain(vec![Effect::ClearPersisted, persist])]
            }

            EditorAction::LoadTemplate { template_id } => {
                let Some(template) = templates::template_by_id(&template_id) else {
                    tracing::debug!(template_id = %template_id, "unknown template, ignoring");
                    return SmallVec::new();
                };

                let map = template.build(ids, env.clock.now(), &mut env.template_rng());
                let persist = Effect::persist(&map);
                Self::replace_map(state, map);
                smallvec![persist]
            }

            EditorAction::ImportMap { payload } => match serialization::import_map(&payload) {
                Ok(map) => {
                    let persist = Effect::persist(&map);
                    Self::replace_map(state, map);
                    state.last_import_error = None;
                    smallvec![persist]
                }
                Err(error) => {
                    tracing::warn!(error = %error, "import rejected");
                    state.last_import_error = Some(error);
                    SmallVec::new()
                }
            }

            EditorAction::RestoreMap { map } => {
                Self::replace_map(state, *map);
                SmallVec::new()
            }

            // ========== Add ==========
            EditorAction::AddRow { label, position } => Self::update_map(state, env, |map, now| {
                let row = ops::create_row(ids, &label, position.clamped());
                ops::add_row(map, row, now)
            }),

            EditorAction::AddNextRow => Self::update_map(state, env, |map, now| {
                let (label, position) = ops::next_row_slot(map);
                ops::add_row(map, ops::create_row(ids, &label, position), now)
            }),

            EditorAction::AddSeat {
                row_id,
                label,
                position,
            } => Self::update_map(state, env, |map, now| {
                if map.row(&row_id).is_none() {
                    return map.clone();
                }
                let seat = ops::create_seat(ids, &row_id, &label, position.clamped());
                ops::add_seat(map, &row_id, seat, now)
            }),

            EditorAction::AddNextSeat { row_id } => Self::update_map(state, env, |map, now| {
                let Some(row) = map.row(&row_id) else {
                    return map.clone();
                };
                let (label, position) = ops::next_seat_slot(row);
                let seat = ops::create_seat(ids, &row_id, &label, position);
                ops::add_seat(map, &row_id, seat, now)
            }),

            EditorAction::AddObject { kind, position } => {
                Self::update_map(state, env, |map, now| {
                    ops::add_object(map, ops::create_object(ids, kind, position), now)
                })
            }

            // ========== Delete ==========
            EditorAction::DeleteRow { row_id } => {
                Self::update_map(state, env, |map, now| ops::delete_row(map, &row_id, now))
            }

            EditorAction::DeleteMultipleRows { row_ids } => Self::update_map(state, env, |map, now| {
                ops::delete_multiple_rows(map, &row_ids, now)
            }),

            EditorAction::DeleteSeat { row_id, seat_id } => {
                Self::update_map(state, env, |map, now| {
                    ops::delete_seat(map, &row_id, &seat_id, now)
                })
            }

            EditorAction::DeleteMultipleSeats { seat_ids } => {
                Self::update_map(state, env, |map, now| {
                    ops::delete_multiple_seats(map, &seat_ids, now)
                })
            }

            EditorAction::DeleteObject { object_id } => {
                Self::update_map(state, env, |map, now| {
                    ops::delete_object(map, &object_id, now)
                })
            }

            EditorAction::DeleteSelectedObjects { object_ids } => {
                Self::update_map(state, env, |map, now| {
                    ops::delete_selected_objects(map, &object_ids, now)
                })
            }

            // ========== Update ==========
            EditorAction::UpdateSeatLabel {
                row_id,
                seat_id,
                label,
            } => Self::update_map(state, env, |map, now| {
                ops::relabel_seat(map, &row_id, &seat_id, &label, now)
            }),

            EditorAction::UpdateRowLabel { row_id, label } => {
                Self::update_map(state, env, |map, now| {
                    ops::relabel_row(map, &row_id, &label, now)
                })
            }

            EditorAction::UpdateObjectLabel { object_id, label } => {
                Self::update_map(state, env, |map, now| {
                    ops::relabel_object(map, &object_id, &label, now)
                })
            }

            EditorAction::ToggleSeatAvailability { row_id, seat_id } => {
                Self::update_map(state, env, |map, now| {
                    ops::toggle_seat_availability(map, &row_id, &seat_id, now)
                })
            }

            EditorAction::ApplyBatchLabels { options } => {
                let selected: Vec<RowId> = state.selection.rows().iter().cloned().collect();
                Self::update_map(state, env, |map, now| {
                    let rows: Vec<_> = selected
                        .iter()
                        .filter_map(|row_id| map.row(row_id).cloned())
                        .collect();
                    let relabeled = labeling::apply_batch_labeling(&rows, &options);
                    labeling::merge_rows(map, relabeled, now)
                })
            }

            // ========== Move ==========
            EditorAction::MoveSeat {
                row_id,
                seat_id,
                position,
            } => Self::update_map(state, env, |map, now| {
                ops::move_seat(map, &row_id, &seat_id, position, now)
            }),

            EditorAction::MoveRow { row_id, position } => Self::update_map(state, env, |map, now| {
                ops::move_row(map, &row_id, position, now)
            }),

            EditorAction::MoveObject {
                object_id,
                position,
            } => Self::update_map(state, env, |map, now| {
                ops::move_object(map, &object_id, position, now)
            }),

            EditorAction::MoveMultipleRows { row_ids, delta } => {
                let Some(map) = state.current_map.as_ref() else {
                    return SmallVec::new();
                };

                let session = state.drag.get_or_insert_with(DragSession::default);
                session.ensure_rows(map, &row_ids);

                let next = ops::move_rows_from(
                    map,
                    session.row_origins(),
                    &row_ids,
                    delta,
                    env.clock.now(),
                );
                Self::commit(state, next)
            }

            EditorAction::MoveMultipleObjects { object_ids, delta } => {
                let Some(map) = state.current_map.as_ref() else {
                    return SmallVec::new();
                };

                let session = state.drag.get_or_insert_with(DragSession::default);
                session.ensure_objects(map, &object_ids);

                let next = ops::move_objects_from(
                    map,
                    session.object_origins(),
                    &object_ids,
                    delta,
                    env.clock.now(),
                );
                Self::commit(state, next)
            }

            // ========== Selection ==========
            EditorAction::SelectRow {
                row_id,
                multi_select,
            } => {
                if state.current_map.as_ref().and_then(|map| map.row(&row_id)).is_some() {
                    state.selection.select_row(row_id, multi_select);
                } else {
                    tracing::trace!(row_id = %row_id, "row not found, ignoring selection");
                }
                SmallVec::new()
            }

            EditorAction::SelectSeat {
                seat_id,
                multi_select,
            } => {
                if state.current_map.as_ref().and_then(|map| map.seat(&seat_id)).is_some() {
                    state.selection.select_seat(seat_id, multi_select);
                } else {
                    tracing::trace!(seat_id = %seat_id, "seat not found, ignoring selection");
                }
                SmallVec::new()
            }

            EditorAction::SelectObject {
                object_id,
                multi_select,
            } => {
                if state.current_map.as_ref().and_then(|map| map.object(&object_id)).is_some() {
                    state.selection.select_object(object_id, multi_select);
                } else {
                    tracing::trace!(object_id = %object_id, "object not found, ignoring selection");
                }
                SmallVec::new()
            }

            EditorAction::SelectMultipleRows { row_ids } => {
                if let Some(map) = state.current_map.as_ref() {
                    let existing = row_ids.into_iter().filter(|row_id| map.row(row_id).is_some());
                    state.selection.set_rows(existing);
                }
                SmallVec::new()
            }

            EditorAction::SelectMultipleObjects { object_ids } => {
                if let Some(map) = state.current_map.as_ref() {
                    let existing = object_ids
                        .into_iter()
                        .filter(|object_id| map.object(object_id).is_some());
                    state.selection.set_objects(existing);
                }
                SmallVec::new()
            }

            EditorAction::ClearSelection => {
                state.selection.clear();
                SmallVec::new()
            }

            EditorAction::ClearAll => {
                state.selection.clear_all();
                SmallVec::new()
            }

            EditorAction::CompleteAreaSelection { rect } => {
                if let Some(map) = state.current_map.as_ref() {
                    let hits = area_query(&rect, &map.rows, &map.objects);
                    tracing::debug!(
                        rows = hits.rows.len(),
                        objects = hits.objects.len(),
                        "area selection"
                    );
                    if !hits.rows.is_empty() {
                        state.selection.set_rows(hits.rows);
                    }
                    if !hits.objects.is_empty() {
                        state.selection.set_objects(hits.objects);
                    }
                }
                state.drag = None;
                SmallVec::new()
            }

            // ========== Drag session ==========
            EditorAction::BeginDrag => {
                if let Some(map) = state.current_map.as_ref() {
                    state.drag = Some(DragSession::begin(map, &state.selection));
                }
                SmallVec::new()
            }

            EditorAction::ClearInitialPositions => {
                state.drag = None;
                SmallVec::new()
            }
        }
    }
}
