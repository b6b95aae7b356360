//! Subcommands and their execution against an [`EditorStore`].

use anyhow::{Context, Result, anyhow, bail};
use clap::Subcommand;
use seatmap_core::editor::EditorAction;
use seatmap_core::environment::Persistence;
use seatmap_core::ops::{self, MapSummary};
use seatmap_core::selection::{Rect, area_query};
use seatmap_core::{
    BatchLabelingOptions, Point, RowId, SeatMap, VenueObjectKind, labeling, serialization,
    templates,
};
use seatmap_runtime::EditorStore;
use std::io::Write;
use std::path::PathBuf;

/// Editor commands
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Start a new empty map, discarding the saved one
    New {
        /// Map name
        name: String,
    },

    /// List the built-in templates
    Templates,

    /// Replace the current map with a template
    Template {
        /// Template id (see `seatmap templates`)
        id: String,
    },

    /// Replace the current map with an exported JSON file
    Import {
        /// File to read
        file: PathBuf,
    },

    /// Write the current map to a JSON file
    Export {
        /// File to write
        file: PathBuf,
        /// Map name to record in the export (defaults to the map's name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a summary of the current map
    Show,

    /// Add a row, auto-labelled and placed below the last one by default
    AddRow {
        /// Row label
        #[arg(long)]
        label: Option<String>,
        /// Anchor x
        #[arg(long, requires = "y")]
        x: Option<f64>,
        /// Anchor y
        #[arg(long, requires = "x")]
        y: Option<f64>,
    },

    /// Append a seat to a row
    AddSeat {
        /// Row id
        row_id: String,
        /// Seat label (defaults to the next `A{n}`)
        #[arg(long)]
        label: Option<String>,
    },

    /// Place a venue object (stage, bar, exit, ...)
    AddObject {
        /// Object type
        kind: VenueObjectKind,
        /// Anchor x
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        /// Anchor y
        #[arg(long, default_value_t = 0.0)]
        y: f64,
    },

    /// Relabel rows and their seats in sequence
    Label {
        /// Row label prefix
        #[arg(long, default_value = "Row")]
        row_prefix: String,
        /// Seat label prefix
        #[arg(long, default_value = "")]
        seat_prefix: String,
        /// Number of the first row
        #[arg(long, default_value_t = 1)]
        start: i64,
        /// Last row number (informational)
        #[arg(long)]
        end: Option<i64>,
        /// Rows to relabel, in order (all rows when omitted)
        row_ids: Vec<String>,
    },

    /// Print the rows and objects inside a rectangle
    SelectArea {
        /// First corner x
        x1: f64,
        /// First corner y
        y1: f64,
        /// Opposite corner x
        x2: f64,
        /// Opposite corner y
        y2: f64,
    },

    /// Delete the saved map
    Clear,
}

/// Runs `command`, writing human-readable output to `out`
///
/// # Errors
///
/// Returns error when the command needs a map and none is saved, an id is
/// unknown, an import is rejected, or reading/writing a file fails.
pub fn run(command: Command, store: &mut EditorStore, out: &mut impl Write) -> Result<()> {
    tracing::debug!(?command, "Running command");

    match command {
        Command::New { name } => {
            store.send(EditorAction::CreateMap { name });
            let map = require_map(store)?;
            writeln!(out, "Created map {} ({})", map.name, map.id)?;
        }
        Command::Templates => {
            for template in templates::templates() {
                writeln!(
                    out,
                    "{:<14} {:<26} {}",
                    template.id, template.name, template.description
                )?;
            }
        }
        Command::Template { id } => {
            if templates::template_by_id(&id).is_none() {
                bail!("template not found: {id}");
            }
            store.send(EditorAction::LoadTemplate { template_id: id });
            let map = require_map(store)?;
            writeln!(out, "Loaded {} with {} rows", map.name, map.rows.len())?;
        }
        Command::Import { file } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let map = store
                .import_map(payload)
                .map_err(|error| anyhow!("import failed: {error}"))?;
            writeln!(out, "Imported {} with {} rows", map.name, map.rows.len())?;
        }
        Command::Export { file, name } => {
            let mut envelope = store.export().context("no map to export")?;
            if let Some(name) = name {
                envelope.map_name = name;
            }
            let json = serialization::to_json(&envelope)?;
            std::fs::write(&file, json)
                .with_context(|| format!("failed to write {}", file.display()))?;
            writeln!(out, "Exported {} to {}", envelope.map_name, file.display())?;
        }
        Command::Show => show(require_map(store)?, out)?,
        Command::AddRow { label, x, y } => {
            let position = x.zip(y).map(|(x, y)| Point::new(x, y));
            let action = if label.is_none() && position.is_none() {
                EditorAction::AddNextRow
            } else {
                let (next_label, next_position) = ops::next_row_slot(require_map(store)?);
                EditorAction::AddRow {
                    label: label.unwrap_or(next_label),
                    position: position.unwrap_or(next_position),
                }
            };
            store.send(action);
            if let Some(row) = require_map(store)?.rows.last() {
                writeln!(out, "Added row {} ({})", row.label, row.id)?;
            }
        }
        Command::AddSeat { row_id, label } => {
            let row_id = RowId::new(row_id);
            let row = require_map(store)?
                .row(&row_id)
                .ok_or_else(|| anyhow!("row not found: {row_id}"))?;
            let action = match label {
                Some(label) => EditorAction::AddSeat {
                    row_id: row_id.clone(),
                    label,
                    position: ops::next_seat_slot(row).1,
                },
                None => EditorAction::AddNextSeat {
                    row_id: row_id.clone(),
                },
            };
            store.send(action);
            if let Some(seat) = require_map(store)?
                .row(&row_id)
                .and_then(|row| row.seats.last())
            {
                writeln!(out, "Added seat {} ({})", seat.label, seat.id)?;
            }
        }
        Command::AddObject { kind, x, y } => {
            require_map(store)?;
            store.send(EditorAction::AddObject {
                kind,
                position: Point::new(x, y),
            });
            if let Some(object) = require_map(store)?.objects.last() {
                writeln!(out, "Added {} ({})", object.label, object.id)?;
            }
        }
        Command::Label {
            row_prefix,
            seat_prefix,
            start,
            end,
            row_ids,
        } => {
            let map = require_map(store)?;
            let row_ids: Vec<RowId> = if row_ids.is_empty() {
                map.rows.iter().map(|row| row.id.clone()).collect()
            } else {
                row_ids.into_iter().map(RowId::new).collect()
            };
            if let Some(missing) = row_ids.iter().find(|id| map.row(id).is_none()) {
                bail!("row not found: {missing}");
            }

            let count = i64::try_from(row_ids.len())?;
            let options = BatchLabelingOptions {
                row_prefix,
                seat_prefix,
                start_number: start,
                end_number: end.unwrap_or_else(|| start.saturating_add(count - 1)),
            };
            writeln!(out, "{}", labeling::preview(&options))?;
            store.send(EditorAction::SelectMultipleRows { row_ids });
            store.send(EditorAction::ApplyBatchLabels { options });
            writeln!(out, "Relabelled {count} rows")?;
        }
        Command::SelectArea { x1, y1, x2, y2 } => {
            let map = require_map(store)?;
            let rect = Rect::from_corners(Point::new(x1, y1), Point::new(x2, y2));
            let hits = area_query(&rect, &map.rows, &map.objects);
            for row_id in &hits.rows {
                writeln!(out, "row {row_id}")?;
            }
            for object_id in &hits.objects {
                writeln!(out, "object {object_id}")?;
            }
        }
        Command::Clear => {
            store.persistence().clear()?;
            writeln!(out, "Cleared saved map")?;
        }
    }

    Ok(())
}

fn require_map(store: &EditorStore) -> Result<&SeatMap> {
    store
        .current_map()
        .context("no map loaded; run `seatmap new <name>` or `seatmap template <id>` first")
}

fn show(map: &SeatMap, out: &mut impl Write) -> Result<()> {
    let MapSummary {
        rows,
        seats,
        objects,
        unavailable_seats,
        all_labeled,
        has_duplicate_labels,
    } = ops::map_summary(map);

    writeln!(out, "{} ({})", map.name, map.id)?;
    writeln!(
        out,
        "{rows} rows, {seats} seats ({unavailable_seats} unavailable), {objects} objects"
    )?;
    if !all_labeled {
        writeln!(out, "warning: some rows or seats have no label")?;
    }
    if has_duplicate_labels {
        writeln!(out, "warning: duplicate labels")?;
    }

    for row in &map.rows {
        writeln!(
            out,
            "  {:<10} {:>3} seats at ({}, {})  {}",
            row.label,
            row.seats.len(),
            row.position.x,
            row.position.y,
            row.id
        )?;
    }
    for object in &map.objects {
        writeln!(
            out,
            "  [{}] {} at ({}, {})  {}",
            object.kind, object.label, object.position.x, object.position.y, object.id
        )?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seatmap_runtime::persistence::InMemoryPersistence;
    use seatmap_testing::helpers::{sample_map, test_environment};

    fn store_with(map: Option<SeatMap>) -> (EditorStore, InMemoryPersistence) {
        let persistence = map.map_or_else(InMemoryPersistence::new, InMemoryPersistence::with_map);
        let store = EditorStore::open(test_environment(), persistence.clone());
        (store, persistence)
    }

    fn exec(store: &mut EditorStore, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(command, store, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn new_saves_an_empty_map() {
        let (mut store, persistence) = store_with(Some(sample_map()));

        let output = exec(
            &mut store,
            Command::New {
                name: "Hall B".into(),
            },
        )
        .unwrap();

        assert!(output.starts_with("Created map Hall B"));
        let saved = persistence.stored().unwrap();
        assert_eq!(saved.name, "Hall B");
        assert!(saved.rows.is_empty());
    }

    #[test]
    fn unknown_template_fails_without_touching_saved_state() {
        let (mut store, persistence) = store_with(Some(sample_map()));

        let error = exec(
            &mut store,
            Command::Template {
                id: "opera-house".into(),
            },
        )
        .unwrap_err();

        assert_eq!(error.to_string(), "template not found: opera-house");
        assert_eq!(persistence.stored(), Some(sample_map()));
    }

    #[test]
    fn template_lists_and_loads() {
        let (mut store, persistence) = store_with(None);

        let listing = exec(&mut store, Command::Templates).unwrap();
        assert_eq!(listing.lines().count(), 4);
        assert!(listing.contains("small-theatre"));

        exec(
            &mut store,
            Command::Template {
                id: "small-theatre".into(),
            },
        )
        .unwrap();
        assert_eq!(persistence.stored().unwrap().rows.len(), 6);
    }

    #[test]
    fn commands_needing_a_map_fail_cleanly() {
        let (mut store, _) = store_with(None);

        assert!(exec(&mut store, Command::Show).is_err());
        assert!(
            exec(
                &mut store,
                Command::AddSeat {
                    row_id: "r1".into(),
                    label: None
                }
            )
            .is_err()
        );
    }

    #[test]
    fn add_row_and_seat_use_next_slots() {
        let (mut store, _) = store_with(Some(sample_map()));

        exec(
            &mut store,
            Command::AddRow {
                label: None,
                x: None,
                y: None,
            },
        )
        .unwrap();
        let row = store.current_map().unwrap().rows[3].clone();
        assert_eq!(row.label, "Row 4");
        assert_eq!(row.position, Point::new(50.0, 200.0));

        let output = exec(
            &mut store,
            Command::AddSeat {
                row_id: row.id.to_string(),
                label: Some("VIP".into()),
            },
        )
        .unwrap();
        assert!(output.starts_with("Added seat VIP"));
        let seat = &store.current_map().unwrap().rows[3].seats[0];
        assert_eq!(seat.position, Point::new(10.0, 30.0));
    }

    #[test]
    fn add_row_with_label_keeps_next_position() {
        let (mut store, _) = store_with(Some(sample_map()));

        exec(
            &mut store,
            Command::AddRow {
                label: Some("Balcony".into()),
                x: None,
                y: None,
            },
        )
        .unwrap();

        let row = store.current_map().unwrap().rows.last().cloned().unwrap();
        assert_eq!(row.label, "Balcony");
        assert_eq!(row.position, Point::new(50.0, 200.0));
    }

    #[test]
    fn add_object_clamps_into_the_canvas() {
        let (mut store, _) = store_with(Some(sample_map()));

        let output = exec(
            &mut store,
            Command::AddObject {
                kind: "Exit".parse().unwrap(),
                x: -5.0,
                y: 400.0,
            },
        )
        .unwrap();

        assert!(output.starts_with("Added Exit 1"));
        let object = store.current_map().unwrap().objects.last().cloned().unwrap();
        assert_eq!(object.kind, VenueObjectKind::Exit);
        assert_eq!(object.position, Point::new(0.0, 400.0));
    }

    #[test]
    fn label_defaults_to_all_rows_in_map_order() {
        let (mut store, persistence) = store_with(Some(sample_map()));

        exec(
            &mut store,
            Command::Label {
                row_prefix: "Row".into(),
                seat_prefix: "S".into(),
                start: 5,
                end: None,
                row_ids: Vec::new(),
            },
        )
        .unwrap();

        let saved = persistence.stored().unwrap();
        let labels: Vec<&str> = saved.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, ["Row 5", "Row 6", "Row 7"]);
        assert_eq!(saved.rows[0].seats[0].label, "S1");
    }

    #[test]
    fn label_start_near_the_limit_saturates() {
        let (mut store, persistence) = store_with(Some(sample_map()));

        let output = exec(
            &mut store,
            Command::Label {
                row_prefix: "Row".into(),
                seat_prefix: String::new(),
                start: i64::MAX - 1,
                end: None,
                row_ids: Vec::new(),
            },
        )
        .unwrap();

        let top = format!("Row {}", i64::MAX);
        assert!(output.contains(&format!("... {top},")));
        let saved = persistence.stored().unwrap();
        let labels: Vec<&str> = saved.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, [format!("Row {}", i64::MAX - 1), top.clone(), top]);
    }

    #[test]
    fn label_rejects_unknown_rows() {
        let (mut store, persistence) = store_with(Some(sample_map()));

        let result = exec(
            &mut store,
            Command::Label {
                row_prefix: "Row".into(),
                seat_prefix: String::new(),
                start: 1,
                end: None,
                row_ids: vec!["nope".into()],
            },
        );

        assert!(result.is_err());
        assert_eq!(persistence.stored(), Some(sample_map()));
    }

    #[test]
    fn select_area_prints_hits() {
        let (mut store, _) = store_with(Some(sample_map()));
        let map = sample_map();

        let output = exec(
            &mut store,
            Command::SelectArea {
                x1: 400.0,
                y1: 0.0,
                x2: 0.0,
                y2: 75.0,
            },
        )
        .unwrap();

        assert_eq!(
            output,
            format!("row {}\nobject {}\n", map.rows[0].id, map.objects[0].id)
        );
    }

    #[test]
    fn export_then_import_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hall.json");
        let (mut store, _) = store_with(Some(sample_map()));

        exec(
            &mut store,
            Command::Export {
                file: file.clone(),
                name: Some("Renamed".into()),
            },
        )
        .unwrap();
        let written = std::fs::read_to_string(&file).unwrap();
        assert!(written.contains("\"mapName\": \"Renamed\""));

        let (mut other, persistence) = store_with(None);
        let output = exec(&mut other, Command::Import { file }).unwrap();
        assert!(output.starts_with("Imported Test Hall"));
        assert_eq!(persistence.stored().unwrap().rows, sample_map().rows);
    }

    #[test]
    fn rejected_import_reports_the_reason() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"{"mapName": "x"}"#).unwrap();
        let (mut store, _) = store_with(None);

        let error = exec(&mut store, Command::Import { file }).unwrap_err();

        assert_eq!(
            error.to_string(),
            "import failed: Invalid seat map format. Missing required fields."
        );
    }

    #[test]
    fn show_prints_summary_and_rows() {
        let (mut store, _) = store_with(Some(sample_map()));

        let output = exec(&mut store, Command::Show).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Test Hall ("));
        assert_eq!(lines[1], "3 rows, 12 seats (0 unavailable), 1 objects");
        assert_eq!(lines.len(), 2 + 3 + 1);
        assert!(lines[2].trim_start().starts_with("Row 1"));
        assert!(lines[5].contains("[stage] Stage 1 at (300, 20)"));
    }

    #[test]
    fn clear_removes_saved_state() {
        let (mut store, persistence) = store_with(Some(sample_map()));

        exec(&mut store, Command::Clear).unwrap();

        assert!(persistence.stored().is_none());
    }
}
