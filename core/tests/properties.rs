//! Property tests for the map model, labeling, selection and serialization.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use seatmap_core::editor::{EditorAction, EditorReducer, EditorState};
use seatmap_core::environment::Clock;
use seatmap_core::reducer::Reducer;
use seatmap_core::selection::area_query;
use seatmap_core::{Point, RowId, SeatMap, labeling, ops, serialization};
use seatmap_testing::helpers::{map_with_rows, test_environment};
use seatmap_testing::properties::{
    any_delta, any_map, any_point, any_rect, any_scattered_map, labeling_options, seat_counts,
};
use seatmap_testing::{SequentialIdGenerator, test_clock};
use std::collections::HashSet;

fn all_ids(map: &SeatMap) -> Vec<String> {
    let rows = map.rows.iter().map(|row| row.id.to_string());
    let seats = map
        .rows
        .iter()
        .flat_map(|row| &row.seats)
        .map(|seat| seat.id.to_string());
    let objects = map.objects.iter().map(|object| object.id.to_string());
    std::iter::once(map.id.to_string())
        .chain(rows)
        .chain(seats)
        .chain(objects)
        .collect()
}

fn row_ids(map: &SeatMap) -> Vec<RowId> {
    map.rows.iter().map(|row| row.id.clone()).collect()
}

proptest! {
    #[test]
    fn ids_are_unique_across_entity_kinds(counts in seat_counts(), extra in 0usize..5) {
        let ids = SequentialIdGenerator::default();
        let mut map = map_with_rows(&ids, &counts);
        for _ in 0..extra {
            let object = ops::create_object(&ids, seatmap_core::VenueObjectKind::Table, Point::default());
            map = ops::add_object(&map, object, test_clock().now());
        }

        let ids = all_ids(&map);
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn seats_point_at_their_row(map in any_map()) {
        for row in &map.rows {
            for seat in &row.seats {
                prop_assert_eq!(&seat.row_id, &row.id);
            }
        }
    }

    #[test]
    fn positions_never_go_negative(map in any_map(), point in any_point(), delta in any_delta()) {
        let reducer = EditorReducer::new();
        let env = test_environment();
        let ids = row_ids(&map);
        let mut state = EditorState::with_map(map);

        reducer.reduce(&mut state, EditorAction::AddRow { label: "X".into(), position: point }, &env);
        reducer.reduce(&mut state, EditorAction::AddObject { kind: seatmap_core::VenueObjectKind::Stage, position: point }, &env);
        reducer.reduce(&mut state, EditorAction::MoveMultipleRows { row_ids: ids, delta }, &env);

        let map = state.current_map.unwrap();
        for position in map.rows.iter().map(|r| r.position).chain(map.objects.iter().map(|o| o.position)) {
            prop_assert!(position.x >= 0.0 && position.y >= 0.0);
        }
    }

    #[test]
    fn labeling_is_deterministic_and_structure_preserving(map in any_map(), options in labeling_options()) {
        let once = labeling::apply_batch_labeling(&map.rows, &options);
        let twice = labeling::apply_batch_labeling(&map.rows, &options);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), map.rows.len());

        for ((i, before), after) in map.rows.iter().enumerate().zip(&once) {
            let number = options.start_number + i64::try_from(i).unwrap();
            prop_assert_eq!(&after.id, &before.id);
            prop_assert_eq!(&after.label, &format!("{} {number}", options.row_prefix));
            prop_assert_eq!(after.seats.len(), before.seats.len());
            for (j, seat) in after.seats.iter().enumerate() {
                prop_assert_eq!(&seat.label, &format!("{}{}", options.seat_prefix, j + 1));
                prop_assert_eq!(&seat.id, &before.seats[j].id);
            }
        }
    }

    #[test]
    fn export_then_import_round_trips(map in any_scattered_map()) {
        let now = test_clock().now() + chrono::Duration::hours(1);
        let json = serialization::to_json(&serialization::export_map(&map, now)).unwrap();
        let imported = serialization::import_map(&json).unwrap();

        prop_assert_eq!(imported.updated_at, now);
        prop_assert_eq!(SeatMap { updated_at: map.updated_at, ..imported }, map);
    }

    #[test]
    fn area_query_hits_exactly_the_contained_rows(map in any_map(), rect in any_rect()) {
        let hits = area_query(&rect, &map.rows, &map.objects);
        let hit: HashSet<&RowId> = hits.rows.iter().collect();

        for row in &map.rows {
            prop_assert_eq!(hit.contains(&row.id), rect.contains(row.position));
        }
        prop_assert!(hits.objects.is_empty());
    }

    #[test]
    fn deleting_rows_prunes_the_selection(map in any_map(), victim in any::<prop::sample::Index>()) {
        prop_assume!(!map.rows.is_empty());
        let reducer = EditorReducer::new();
        let env = test_environment();
        let ids = row_ids(&map);
        let victim = ids[victim.index(ids.len())].clone();
        let mut state = EditorState::with_map(map);

        reducer.reduce(&mut state, EditorAction::SelectMultipleRows { row_ids: ids.clone() }, &env);
        reducer.reduce(&mut state, EditorAction::DeleteRow { row_id: victim.clone() }, &env);

        prop_assert!(!state.selection.rows().contains(&victim));
        prop_assert_eq!(state.selection.rows().len(), ids.len() - 1);
    }

    #[test]
    fn single_select_focuses_one_entity(map in any_map(), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6)) {
        prop_assume!(!map.rows.is_empty());
        let reducer = EditorReducer::new();
        let env = test_environment();
        let ids = row_ids(&map);
        let mut state = EditorState::with_map(map);

        for pick in &picks {
            let row_id = ids[pick.index(ids.len())].clone();
            reducer.reduce(&mut state, EditorAction::SelectRow { row_id, multi_select: true }, &env);
        }
        let last = ids[picks[0].index(ids.len())].clone();
        reducer.reduce(&mut state, EditorAction::SelectRow { row_id: last.clone(), multi_select: false }, &env);

        prop_assert_eq!(state.selection.rows().len(), 1);
        prop_assert!(state.selection.rows().contains(&last));
        prop_assert!(state.selection.seats().is_empty());
        prop_assert!(state.selection.objects().is_empty());
    }

    #[test]
    fn drag_positions_depend_only_on_the_last_delta(map in any_map(), deltas in prop::collection::vec(any_delta(), 1..8)) {
        let reducer = EditorReducer::new();
        let env = test_environment();
        let ids = row_ids(&map);
        let origins: Vec<Point> = map.rows.iter().map(|row| row.position).collect();
        let mut state = EditorState::with_map(map);

        reducer.reduce(&mut state, EditorAction::SelectMultipleRows { row_ids: ids.clone() }, &env);
        reducer.reduce(&mut state, EditorAction::BeginDrag, &env);
        for delta in &deltas {
            reducer.reduce(&mut state, EditorAction::MoveMultipleRows { row_ids: ids.clone(), delta: *delta }, &env);
        }

        let last = deltas[deltas.len() - 1];
        let map = state.current_map.unwrap();
        for (row, origin) in map.rows.iter().zip(origins) {
            prop_assert_eq!(row.position, origin.offset(last).clamped());
        }
    }
}
