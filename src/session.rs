//! Live Session Tracker
//!
//! Tracks the train currently passing the camera and the engine numbers
//! recognized for it, and keeps the visible live fields in step.
//!
//! The state is an explicit value owned by whoever drives the stream; there
//! is no process-wide session. [`dispatch`] is the whole state machine:
//!
//! | event | guard | session change | view change |
//! |---|---|---|---|
//! | `train_start` | none | active := id, engines := {} | reset every field |
//! | `count` | none | none | totals, speed if present |
//! | `engine_number` | id matches active, number non-empty | insert number | engine list |
//! | `train_end` | id matches active | active := none | direction, speed |
//! | `train_end` | id mismatch | active := none | none |
//! | other | none | none | none |
//!
//! A mismatched `train_end` still clears the active train, while a
//! mismatched `engine_number` is ignored. The engine set is not cleared on
//! `train_end`; the next `train_start` clears it. A `train_end` frame's
//! `final_totals` reach the event log only; the counters keep the last
//! `count` totals.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{StreamEvent, Totals};

/// Text shown for an unknown direction, speed, train or empty engine list
pub const PLACEHOLDER: &str = "—";

/// Session bookkeeping mutated only by [`dispatch`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    active_train_id: Option<String>,
    seen_engine_numbers: BTreeSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_train_id(&self) -> Option<&str> {
        self.active_train_id.as_deref()
    }

    /// Engine numbers seen for the current (or just-ended) train, sorted
    pub fn seen_engine_numbers(&self) -> &BTreeSet<String> {
        &self.seen_engine_numbers
    }

    fn is_active(&self, train_id: Option<&str>) -> bool {
        match (train_id, self.active_train_id.as_deref()) {
            (Some(event_id), Some(active_id)) => event_id == active_id,
            _ => false,
        }
    }
}

/// The visible live fields, one per dashboard element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveView {
    pub active_train: String,
    pub direction: String,
    pub speed: String,
    pub locomotives: u64,
    pub railcars: u64,
    pub engines: String,
    /// Frames received on the stream, including dropped ones
    pub frames_received: u64,
    /// Frames that could not be parsed as JSON
    pub dropped_frames: u64,
}

impl Default for LiveView {
    fn default() -> Self {
        Self {
            active_train: PLACEHOLDER.to_string(),
            direction: PLACEHOLDER.to_string(),
            speed: PLACEHOLDER.to_string(),
            locomotives: 0,
            railcars: 0,
            engines: PLACEHOLDER.to_string(),
            frames_received: 0,
            dropped_frames: 0,
        }
    }
}

impl LiveView {
    fn set_totals(&mut self, totals: Totals) {
        self.locomotives = totals.locomotives();
        self.railcars = totals.railcars();
    }

    fn refresh_engines(&mut self, engines: &BTreeSet<String>) {
        self.engines = format_engines(engines);
    }
}

/// What [`dispatch`] did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Session or view changed
    Applied,
    /// Guard failed or kind not handled; nothing changed
    Ignored,
}

/// Comma-joined engine list, or the placeholder when empty.
///
/// `BTreeSet` iteration is already sorted and distinct.
pub fn format_engines(engines: &BTreeSet<String>) -> String {
    if engines.is_empty() {
        return PLACEHOLDER.to_string();
    }
    engines
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a speed the way a browser renders a JSON number: `35`, `35.5`
pub fn format_speed(mph: f64) -> String {
    mph.to_string()
}

/// Apply one stream event to the session and the live view
pub fn dispatch(
    session: &mut SessionState,
    view: &mut LiveView,
    event: &StreamEvent,
) -> DispatchOutcome {
    match event {
        StreamEvent::TrainStart { train_id, .. } => {
            session.active_train_id = train_id.clone();
            session.seen_engine_numbers.clear();

            view.active_train = train_id
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            view.direction = PLACEHOLDER.to_string();
            view.speed = PLACEHOLDER.to_string();
            view.set_totals(Totals::default());
            view.refresh_engines(&session.seen_engine_numbers);

            tracing::debug!(train_id = ?train_id, "Train session started");
            DispatchOutcome::Applied
        }

        StreamEvent::Count {
            totals, speed_mph, ..
        } => {
            view.set_totals(totals.unwrap_or_default());
            if let Some(speed) = speed_mph {
                view.speed = format_speed(*speed);
            }
            DispatchOutcome::Applied
        }

        StreamEvent::EngineNumber {
            train_id,
            engine_number,
            ..
        } => {
            let number = engine_number.as_deref().filter(|n| !n.is_empty());
            match number {
                Some(number) if session.is_active(train_id.as_deref()) => {
                    session.seen_engine_numbers.insert(number.to_string());
                    view.refresh_engines(&session.seen_engine_numbers);
                    DispatchOutcome::Applied
                }
                _ => {
                    tracing::debug!(
                        train_id = ?train_id,
                        active = ?session.active_train_id,
                        engine_number = ?engine_number,
                        "Ignoring engine number"
                    );
                    DispatchOutcome::Ignored
                }
            }
        }

        StreamEvent::TrainEnd {
            train_id,
            direction,
            avg_speed_mph,
            ..
        } => {
            let matched = session.is_active(train_id.as_deref());
            session.active_train_id = None;

            if !matched {
                tracing::debug!(train_id = ?train_id, "Train end for inactive train");
                return DispatchOutcome::Applied;
            }

            view.direction = direction
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            view.speed = avg_speed_mph
                .filter(|s| *s != 0.0)
                .map(format_speed)
                .unwrap_or_else(|| PLACEHOLDER.to_string());

            tracing::debug!(train_id = ?train_id, direction = %view.direction, "Train session ended");
            DispatchOutcome::Applied
        }

        StreamEvent::Unknown => DispatchOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(id: &str) -> StreamEvent {
        StreamEvent::TrainStart {
            train_id: Some(id.to_string()),
            ts: None,
        }
    }

    fn engine(id: &str, number: &str) -> StreamEvent {
        StreamEvent::EngineNumber {
            train_id: Some(id.to_string()),
            track_id: None,
            engine_number: Some(number.to_string()),
        }
    }

    fn count(locomotive: Option<u64>, railcar: Option<u64>, speed: Option<f64>) -> StreamEvent {
        StreamEvent::Count {
            train_id: None,
            track_id: None,
            class: None,
            direction: None,
            speed_mph: speed,
            avg_speed_mph: None,
            totals: Some(Totals {
                locomotive,
                railcar,
            }),
            ts: None,
        }
    }

    fn end(id: &str, direction: Option<&str>, avg_speed: Option<f64>) -> StreamEvent {
        StreamEvent::TrainEnd {
            train_id: Some(id.to_string()),
            direction: direction.map(str::to_string),
            avg_speed_mph: avg_speed,
            final_totals: None,
            ts: None,
        }
    }

    fn run(events: &[StreamEvent]) -> (SessionState, LiveView) {
        let mut session = SessionState::new();
        let mut view = LiveView::default();
        for event in events {
            dispatch(&mut session, &mut view, event);
        }
        (session, view)
    }

    #[test]
    fn test_initial_view_shows_placeholders() {
        let view = LiveView::default();
        assert_eq!(view.active_train, PLACEHOLDER);
        assert_eq!(view.engines, PLACEHOLDER);
        assert_eq!(view.locomotives, 0);
    }

    #[test]
    fn test_scenario_cross_train_engine_ignored() {
        let (session, view) = run(&[
            start("T1"),
            engine("T1", "4502"),
            engine("T2", "9999"),
            count(Some(2), Some(40), None),
        ]);

        assert_eq!(view.engines, "4502");
        assert_eq!(view.locomotives, 2);
        assert_eq!(view.railcars, 40);
        assert_eq!(view.active_train, "T1");
        assert_eq!(session.active_train_id(), Some("T1"));
    }

    #[test]
    fn test_scenario_train_end_matched() {
        let (session, view) = run(&[start("T1"), end("T1", Some("WB"), Some(35.0))]);

        assert_eq!(view.direction, "WB");
        assert_eq!(view.speed, "35");
        assert_eq!(session.active_train_id(), None);
    }

    #[test]
    fn test_train_end_mismatch_clears_active_but_keeps_view() {
        let (session, view) = run(&[
            start("T1"),
            count(None, None, Some(18.5)),
            end("T0", Some("EB"), Some(20.0)),
        ]);

        assert_eq!(session.active_train_id(), None);
        assert_eq!(view.direction, PLACEHOLDER);
        assert_eq!(view.speed, "18.5");
        assert_eq!(view.active_train, "T1");
    }

    #[test]
    fn test_train_end_placeholders_for_missing_fields() {
        let (_, view) = run(&[
            start("T1"),
            count(None, None, Some(12.0)),
            end("T1", None, Some(0.0)),
        ]);
        assert_eq!(view.direction, PLACEHOLDER);
        assert_eq!(view.speed, PLACEHOLDER);
    }

    #[test]
    fn test_train_end_final_totals_leave_counters_alone() {
        let mut session = SessionState::new();
        let mut view = LiveView::default();
        dispatch(&mut session, &mut view, &start("T1"));
        dispatch(&mut session, &mut view, &count(Some(1), Some(10), None));

        let event = StreamEvent::TrainEnd {
            train_id: Some("T1".to_string()),
            direction: Some("EB".to_string()),
            avg_speed_mph: None,
            final_totals: Some(Totals {
                locomotive: Some(2),
                railcar: Some(41),
            }),
            ts: None,
        };
        dispatch(&mut session, &mut view, &event);

        assert_eq!(view.direction, "EB");
        assert_eq!(view.locomotives, 1);
        assert_eq!(view.railcars, 10);
    }

    #[test]
    fn test_train_start_clears_engines() {
        let mut session = SessionState::new();
        let mut view = LiveView::default();
        for event in [start("T1"), engine("T1", "4502"), engine("T1", "1010")] {
            dispatch(&mut session, &mut view, &event);
        }
        assert_eq!(session.seen_engine_numbers().len(), 2);

        dispatch(&mut session, &mut view, &start("T2"));

        assert!(session.seen_engine_numbers().is_empty());
        assert_eq!(view.engines, PLACEHOLDER);
        assert_eq!(view.active_train, "T2");
        assert_eq!(view.locomotives, 0);
        assert_eq!(view.speed, PLACEHOLDER);
    }

    #[test]
    fn test_engines_survive_train_end_until_next_start() {
        let (session, view) = run(&[start("T1"), engine("T1", "4502"), end("T1", Some("EB"), None)]);
        assert_eq!(session.active_train_id(), None);
        assert_eq!(session.seen_engine_numbers().len(), 1);
        assert_eq!(view.engines, "4502");
    }

    #[test]
    fn test_engine_guard() {
        let mut session = SessionState::new();
        let mut view = LiveView::default();

        // No active train yet
        assert_eq!(
            dispatch(&mut session, &mut view, &engine("T1", "4502")),
            DispatchOutcome::Ignored
        );

        dispatch(&mut session, &mut view, &start("T1"));
        assert_eq!(
            dispatch(&mut session, &mut view, &engine("T1", "")),
            DispatchOutcome::Ignored
        );
        let missing_number = StreamEvent::EngineNumber {
            train_id: Some("T1".to_string()),
            track_id: Some(3),
            engine_number: None,
        };
        assert_eq!(
            dispatch(&mut session, &mut view, &missing_number),
            DispatchOutcome::Ignored
        );
        let missing_train = StreamEvent::EngineNumber {
            train_id: None,
            track_id: Some(3),
            engine_number: Some("4502".to_string()),
        };
        assert_eq!(
            dispatch(&mut session, &mut view, &missing_train),
            DispatchOutcome::Ignored
        );
        assert!(session.seen_engine_numbers().is_empty());

        assert_eq!(
            dispatch(&mut session, &mut view, &engine("T1", "4502")),
            DispatchOutcome::Applied
        );
        assert_eq!(view.engines, "4502");
    }

    #[test]
    fn test_engine_list_sorted_and_distinct() {
        let (_, view) = run(&[
            start("T1"),
            engine("T1", "7731"),
            engine("T1", "1010"),
            engine("T1", "7731"),
            engine("T1", "4502"),
        ]);
        assert_eq!(view.engines, "1010, 4502, 7731");
    }

    #[test]
    fn test_count_without_totals_zeroes() {
        let mut session = SessionState::new();
        let mut view = LiveView::default();
        dispatch(&mut session, &mut view, &count(Some(3), Some(9), None));

        let bare = StreamEvent::Count {
            train_id: None,
            track_id: None,
            class: None,
            direction: None,
            speed_mph: None,
            avg_speed_mph: None,
            totals: None,
            ts: None,
        };
        dispatch(&mut session, &mut view, &bare);

        assert_eq!(view.locomotives, 0);
        assert_eq!(view.railcars, 0);
        assert_eq!(view.speed, PLACEHOLDER);
    }

    #[test]
    fn test_unknown_event_is_inert() {
        let (session, view) = run(&[start("T1"), StreamEvent::Unknown]);
        assert_eq!(session.active_train_id(), Some("T1"));
        assert_eq!(view.active_train, "T1");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(35.0), "35");
        assert_eq!(format_speed(22.4), "22.4");
    }
}
