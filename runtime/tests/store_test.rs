//! Integration tests for the editor store: startup restore, effect
//! execution against persistence, and import/export.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use seatmap_core::editor::EditorAction;
use seatmap_core::environment::Clock;
use seatmap_core::{ImportError, Point};
use seatmap_runtime::{EditorStore, StoreError};
use seatmap_testing::helpers::{init_tracing, sample_map, test_environment};
use seatmap_testing::mocks::PersistenceCall;
use seatmap_testing::{RecordingPersistence, test_clock};

fn open(persistence: &RecordingPersistence) -> EditorStore {
    init_tracing();
    EditorStore::open(test_environment(), persistence.clone())
}

#[test]
fn open_restores_the_saved_map_without_saving() {
    let saved = sample_map();
    let persistence = RecordingPersistence::with_saved(saved.clone());

    let store = open(&persistence);

    assert_eq!(store.current_map(), Some(&saved));
    assert_eq!(persistence.calls(), vec![PersistenceCall::Load]);
    assert!(store.health().status.is_healthy());
}

#[test]
fn open_with_nothing_saved_starts_empty() {
    let persistence = RecordingPersistence::new();
    let store = open(&persistence);

    assert!(store.current_map().is_none());
}

#[test]
fn open_survives_a_failing_load() {
    let persistence = RecordingPersistence::with_saved(sample_map());
    persistence.fail_all();

    let store = open(&persistence);

    assert!(store.current_map().is_none());
    // Load failures are not effect failures
    assert!(store.health().status.is_healthy());
}

#[test]
fn create_map_clears_before_saving() {
    let persistence = RecordingPersistence::with_saved(sample_map());
    let mut store = open(&persistence);

    store.send(EditorAction::CreateMap {
        name: "Hall B".to_string(),
    });

    let calls = persistence.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], PersistenceCall::Load);
    assert_eq!(calls[1], PersistenceCall::Clear);
    assert!(matches!(&calls[2], PersistenceCall::Save(map) if map.name == "Hall B"));
    assert_eq!(persistence.saved().map(|m| m.name), Some("Hall B".to_string()));
}

#[test]
fn every_map_change_is_saved_and_selection_is_not() {
    let persistence = RecordingPersistence::new();
    let mut store = open(&persistence);

    store.send(EditorAction::CreateMap {
        name: "Hall".to_string(),
    });
    store.send(EditorAction::AddNextRow);
    store.send(EditorAction::AddRow {
        label: "B".to_string(),
        position: Point::new(50.0, 100.0),
    });
    assert_eq!(persistence.save_count(), 3);

    let row_id = store.current_map().unwrap().rows[0].id.clone();
    store.send(EditorAction::SelectRow {
        row_id,
        multi_select: false,
    });
    store.send(EditorAction::ClearSelection);
    assert_eq!(persistence.save_count(), 3);

    assert_eq!(persistence.saved().as_ref(), store.current_map());
}

#[test]
fn no_op_commands_do_not_save() {
    let persistence = RecordingPersistence::with_saved(sample_map());
    let mut store = open(&persistence);

    store.send(EditorAction::DeleteRow {
        row_id: "missing".into(),
    });
    store.send(EditorAction::LoadTemplate {
        template_id: "opera-house".to_string(),
    });

    assert_eq!(persistence.save_count(), 0);
}

#[test]
fn failed_saves_keep_the_change_and_degrade_health() {
    let persistence = RecordingPersistence::with_saved(sample_map());
    let mut store = open(&persistence);
    persistence.fail_all();

    store.send(EditorAction::AddNextRow);
    store.send(EditorAction::AddNextRow);

    assert_eq!(store.current_map().unwrap().rows.len(), 5);
    assert_eq!(persistence.saved().unwrap().rows.len(), 3);

    let health = store.health();
    assert!(health.status.is_degraded());
    assert_eq!(health.metadata_value("failed_effects"), Some("2"));
    assert!(health.message.unwrap().starts_with("persist failed"));
}

#[test]
fn import_replaces_the_map_and_saves_it() {
    let persistence = RecordingPersistence::new();
    let mut store = open(&persistence);
    let source = sample_map();
    let payload = serde_json::json!({ "mapName": "Imported", "seatMap": source }).to_string();

    let imported = store.import_map(payload).unwrap();

    assert_eq!(imported, source);
    assert_eq!(store.current_map(), Some(&source));
    assert_eq!(persistence.saved(), Some(source));
}

#[test]
fn rejected_import_leaves_everything_alone() {
    let original = sample_map();
    let persistence = RecordingPersistence::with_saved(original.clone());
    let mut store = open(&persistence);

    let error = store
        .import_map(r#"{"seatMap": {"rows": [{"id": "r1", "label": "A"}]}}"#)
        .unwrap_err();

    assert_eq!(
        error,
        ImportError::Validation(
            "Invalid row format at row 0. Each row must have id, label, and seats array."
                .to_string()
        )
    );
    assert_eq!(store.current_map(), Some(&original));
    assert_eq!(persistence.save_count(), 0);

    let error = store.import_map("not json").unwrap_err();
    assert!(error.is_format());
}

#[test]
fn export_round_trips_through_import() {
    let persistence = RecordingPersistence::with_saved(sample_map());
    let mut store = open(&persistence);
    let before = store.current_map().cloned().unwrap();

    let json = store.export_json().unwrap();
    let imported = store.import_map(json).unwrap();

    assert_eq!(imported.rows, before.rows);
    assert_eq!(imported.objects, before.objects);
    assert_eq!(imported.id, before.id);
    assert_eq!(imported.updated_at, test_clock().now());
}

#[test]
fn export_uses_the_map_name_and_leaves_state_alone() {
    let persistence = RecordingPersistence::with_saved(sample_map());
    let store = open(&persistence);

    let envelope = store.export().unwrap();

    assert_eq!(envelope.map_name, "Test Hall");
    assert_eq!(&envelope.seat_map.rows, &store.current_map().unwrap().rows);
    assert_eq!(persistence.save_count(), 0);
}

#[test]
fn export_without_a_map_fails() {
    let store = open(&RecordingPersistence::new());

    assert!(store.export().is_none());
    assert!(matches!(store.export_json(), Err(StoreError::NoMap)));
}
