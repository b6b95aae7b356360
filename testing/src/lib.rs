//! # Seatmap Testing
//!
//! Testing utilities and helpers for the seat map editor.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Fixture builders for maps and editor environments
//! - Property-based testing strategies
//! - Assertion helpers for reducers
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_testing::{helpers::test_environment, RecordingPersistence};
//! use seatmap_runtime::EditorStore;
//!
//! #[test]
//! fn test_new_map_is_saved() {
//!     let persistence = RecordingPersistence::new();
//!     let mut store = EditorStore::open(test_environment(), persistence.clone());
//!
//!     store.send(EditorAction::CreateMap { name: "Hall".into() });
//!
//!     assert!(persistence.saved().is_some());
//! }
//! ```

use chrono::{DateTime, Utc};
use seatmap_core::environment::{Clock, IdGenerator};


pub use reducer_test::{EditorTest, ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use seatmap_core::environment::Persistence;
    use seatmap_core::{PersistenceError, SeatMap};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatmap_testing::mocks::FixedClock;
    /// use seatmap_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable ids: `"{prefix}-1"`, `"{prefix}-2"`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use seatmap_testing::mocks::SequentialIdGenerator;
    /// use seatmap_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("row");
    /// assert_eq!(ids.next_id(), "row-1");
    /// assert_eq!(ids.next_id(), "row-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose ids start with `prefix`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new("id")
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }

    /// One call made against [`RecordingPersistence`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum PersistenceCall {
        /// `load()`
        Load,
        /// `save(map)`
        Save(Box<SeatMap>),
        /// `clear()`
        Clear,
    }

    #[derive(Debug, Default)]
    struct Recorded {
        saved: Option<SeatMap>,
        calls: Vec<PersistenceCall>,
        failing: bool,
    }

    /// In-memory persistence that records every call
    ///
    /// Clones share the same storage, so a test can keep one handle while the
    /// store owns another.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPersistence {
        inner: Arc<Mutex<Recorded>>,
    }

    impl RecordingPersistence {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage that already holds `map`
        #[must_use]
        pub fn with_saved(map: SeatMap) -> Self {
            let persistence = Self::new();
            persistence.lock().saved = Some(map);
            persistence
        }

        /// Make every subsequent call fail with [`PersistenceError::Unavailable`]
        pub fn fail_all(&self) {
            self.lock().failing = true;
        }

        /// The currently saved map
        #[must_use]
        pub fn saved(&self) -> Option<SeatMap> {
            self.lock().saved.clone()
        }

        /// Every call made so far, in order
        #[must_use]
        pub fn calls(&self) -> Vec<PersistenceCall> {
            self.lock().calls.clone()
        }

        /// Number of `save` calls made so far
        #[must_use]
        pub fn save_count(&self) -> usize {
            self.lock()
                .calls
                .iter()
                .filter(|call| matches!(call, PersistenceCall::Save(_)))
                .count()
        }

        fn lock(&self) -> MutexGuard<'_, Recorded> {
            self.inner.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn record(&self, call: PersistenceCall) -> Result<MutexGuard<'_, Recorded>, PersistenceError> {
            let mut recorded = self.lock();
            recorded.calls.push(call);
            if recorded.failing {
                return Err(PersistenceError::Unavailable(
                    "recording persistence set to fail".to_string(),
                ));
            }
            Ok(recorded)
        }
    }

    impl Persistence for RecordingPersistence {
        fn load(&self) -> Result<Option<SeatMap>, PersistenceError> {
            Ok(self.record(PersistenceCall::Load)?.saved.clone())
        }

        fn save(&self, map: &SeatMap) -> Result<(), PersistenceError> {
            self.record(PersistenceCall::Save(Box::new(map.clone())))?.saved = Some(map.clone());
            Ok(())
        }

        fn clear(&self) -> Result<(), PersistenceError> {
            self.record(PersistenceCall::Clear)?.saved = None;
            Ok(())
        }
    }
}

/// Test helpers and utilities
///
/// Fixture builders for common test scenarios.
pub mod helpers {
    use super::mocks::{SequentialIdGenerator, test_clock};
    use super::{Clock, IdGenerator};
    use seatmap_core::editor::EditorEnvironment;
    use seatmap_core::{Point, SeatMap, ops};
    use std::sync::Arc;

    /// Seed used for template availability in [`test_environment`]
    pub const TEST_TEMPLATE_SEED: u64 = 42;

    /// Fixed clock, sequential ids and a seeded template RNG
    #[must_use]
    pub fn test_environment() -> EditorEnvironment {
        EditorEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::default()))
            .with_template_seed(Some(TEST_TEMPLATE_SEED))
    }

    /// Builds a map with one row per entry of `seat_counts`.
    ///
    /// Rows are stacked 50 units apart starting at `(50, 50)`; seats are
    /// labelled `A1, A2, ...` and spaced 40 units apart.
    #[must_use]
    pub fn map_with_rows(ids: &dyn IdGenerator, seat_counts: &[usize]) -> SeatMap {
        let now = test_clock().now();
        let mut map = ops::create_empty_map(ids, "Test Hall", now);

        for &count in seat_counts {
            let (label, position) = ops::next_row_slot(&map);
            let mut row = ops::create_row(ids, &label, position);
            for _ in 0..count {
                let (label, position) = ops::next_seat_slot(&row);
                let seat = ops::create_seat(ids, &row.id, &label, position);
                row = ops::add_seat_to_row(&row, seat);
            }
            map = ops::add_row(&map, row, now);
        }

        map
    }

    /// A map with three rows of four seats and one stage
    #[must_use]
    pub fn sample_map() -> SeatMap {
        let ids = SequentialIdGenerator::new("sample");
        let map = map_with_rows(&ids, &[4, 4, 4]);
        let stage = ops::create_object(
            &ids,
            seatmap_core::VenueObjectKind::Stage,
            Point::new(300.0, 20.0),
        );
        ops::add_object(&map, stage, test_clock().now())
    }

    /// Install a fmt subscriber for test output (honours `RUST_LOG`)
    ///
    /// Safe to call from many tests; only the first call installs it.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use super::helpers::map_with_rows;
    use super::mocks::SequentialIdGenerator;
    use proptest::prelude::*;
    use seatmap_core::selection::Rect;
    use seatmap_core::{BatchLabelingOptions, Delta, Point, SeatMap, VenueObjectKind, ops};

    /// Any finite canvas point, including negative coordinates
    pub fn any_point() -> impl Strategy<Value = Point> {
        (-2_000.0..2_000.0f64, -2_000.0..2_000.0f64).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Any drag displacement
    pub fn any_delta() -> impl Strategy<Value = Delta> {
        (-500.0..500.0f64, -500.0..500.0f64).prop_map(|(dx, dy)| Delta::new(dx, dy))
    }

    /// Any rectangle, built from two corners in either order
    pub fn any_rect() -> impl Strategy<Value = Rect> {
        (any_point(), any_point()).prop_map(|(a, b)| Rect::from_corners(a, b))
    }

    /// Seat counts for up to eight rows of up to twelve seats
    pub fn seat_counts() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0usize..12, 0..8)
    }

    /// A map with arbitrary row and seat counts and sequential ids
    pub fn any_map() -> impl Strategy<Value = SeatMap> {
        seat_counts().prop_map(|counts| map_with_rows(&SequentialIdGenerator::default(), &counts))
    }

    /// Like [`any_map`], with rows, seats and a few objects moved to
    /// arbitrary fractional positions
    pub fn any_scattered_map() -> impl Strategy<Value = SeatMap> {
        (
            any_map(),
            prop::collection::vec(any_point(), 1..16),
            prop::collection::vec(any_point(), 0..4),
        )
            .prop_map(|(mut map, points, objects)| {
                let mut points = points.into_iter().cycle();
                for row in &mut map.rows {
                    row.position = points.next().unwrap_or_default();
                    for seat in &mut row.seats {
                        seat.position = points.next().unwrap_or_default();
                    }
                }

                let ids = SequentialIdGenerator::new("object");
                map.objects = objects
                    .into_iter()
                    .map(|position| ops::create_object(&ids, VenueObjectKind::Table, position))
                    .collect();
                map
            })
    }

    /// Labeling options with short prefixes and any start number
    pub fn labeling_options() -> impl Strategy<Value = BatchLabelingOptions> {
        ("[A-Z][a-z]{0,5}", "[A-Z]{0,2}", -100i64..1_000, 0i64..50).prop_map(
            |(row_prefix, seat_prefix, start_number, span)| BatchLabelingOptions {
                row_prefix,
                seat_prefix,
                start_number,
                end_number: start_number + span,
            },
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RecordingPersistence, SequentialIdGenerator, test_clock};
