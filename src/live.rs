//! Frame Pipeline
//!
//! One inbound text frame flows parse → log → decode → dispatch. The
//! [`LiveDashboard`] owns the session, the visible fields and the log, so the
//! whole pipeline can run against scripted frames without a socket.

use serde::Deserialize;

use crate::error::DashboardResult;
use crate::event_log::EventLog;
use crate::models::StreamEvent;
use crate::session::{dispatch, DispatchOutcome, LiveView, SessionState};

/// What happened to a frame that parsed as JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Decoded and run through the session state machine
    Dispatched {
        kind: &'static str,
        outcome: DispatchOutcome,
    },
    /// Logged, but its fields do not form a known event shape
    Undecodable,
}

/// Session state, live fields and event log for one stream
#[derive(Debug, Clone, Default)]
pub struct LiveDashboard {
    session: SessionState,
    view: LiveView,
    log: EventLog,
}

impl LiveDashboard {
    /// Create a dashboard whose log keeps `log_capacity` entries (0 = unbounded)
    pub fn new(log_capacity: usize) -> Self {
        Self {
            session: SessionState::new(),
            view: LiveView::default(),
            log: EventLog::new(log_capacity),
        }
    }

    /// Handle one text frame.
    ///
    /// Returns `Err` only when the frame is not JSON; such a frame is counted
    /// as dropped and leaves everything else untouched.
    pub fn handle_frame(&mut self, text: &str) -> DashboardResult<FrameOutcome> {
        self.view.frames_received += 1;

        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                self.view.dropped_frames += 1;
                return Err(e.into());
            }
        };

        self.log.push(&value);

        match StreamEvent::deserialize(&value) {
            Ok(event) => Ok(self.apply(&event)),
            Err(e) => {
                tracing::warn!(error = %e, "Frame does not match a known event shape");
                Ok(FrameOutcome::Undecodable)
            }
        }
    }

    /// Count a frame that was received but cannot be handled (binary payloads)
    pub fn reject_frame(&mut self) {
        self.view.frames_received += 1;
        self.view.dropped_frames += 1;
    }

    /// Run an already-decoded event through the state machine
    pub fn apply(&mut self, event: &StreamEvent) -> FrameOutcome {
        let outcome = dispatch(&mut self.session, &mut self.view, event);
        tracing::debug!(kind = event.kind(), outcome = ?outcome, "Dispatched stream event");
        FrameOutcome::Dispatched {
            kind: event.kind(),
            outcome,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view(&self) -> &LiveView {
        &self.view
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PLACEHOLDER;

    #[test]
    fn test_scripted_session() {
        let mut dashboard = LiveDashboard::new(50);
        let frames = [
            r#"{"event":"train_start","train_id":"T1"}"#,
            r#"{"event":"engine_number","train_id":"T1","engine_number":"4502"}"#,
            r#"{"event":"engine_number","train_id":"T2","engine_number":"9999"}"#,
            r#"{"event":"count","totals":{"locomotive":2,"railcar":40}}"#,
        ];
        for frame in frames {
            dashboard.handle_frame(frame).unwrap();
        }

        let view = dashboard.view();
        assert_eq!(view.engines, "4502");
        assert_eq!(view.locomotives, 2);
        assert_eq!(view.railcars, 40);
        assert_eq!(view.active_train, "T1");
        assert_eq!(view.frames_received, 4);
        assert_eq!(dashboard.log().len(), 4);
        assert!(dashboard.log().latest().unwrap().text.contains("\"count\""));
    }

    #[test]
    fn test_malformed_frame_dropped_without_side_effects() {
        let mut dashboard = LiveDashboard::new(50);
        dashboard
            .handle_frame(r#"{"event":"train_start","train_id":"T1"}"#)
            .unwrap();

        assert!(dashboard.handle_frame("{\"event\": \"count\"").is_err());

        assert_eq!(dashboard.view().dropped_frames, 1);
        assert_eq!(dashboard.log().len(), 1);
        assert_eq!(dashboard.session().active_train_id(), Some("T1"));

        // The next frame is handled normally
        let outcome = dashboard
            .handle_frame(r#"{"event":"train_end","train_id":"T1","direction":"EB"}"#)
            .unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Dispatched {
                kind: "train_end",
                outcome: DispatchOutcome::Applied,
            }
        );
        assert_eq!(dashboard.view().direction, "EB");
    }

    #[test]
    fn test_unknown_and_non_object_frames_are_logged_only() {
        let mut dashboard = LiveDashboard::new(50);

        let outcome = dashboard.handle_frame(r#"{"event":"heartbeat"}"#).unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Dispatched {
                kind: "unknown",
                outcome: DispatchOutcome::Ignored,
            }
        );

        assert_eq!(dashboard.handle_frame("42").unwrap(), FrameOutcome::Undecodable);
        assert_eq!(
            dashboard.handle_frame(r#"{"train_id":"T9"}"#).unwrap(),
            FrameOutcome::Undecodable
        );

        assert_eq!(dashboard.log().len(), 3);
        assert_eq!(dashboard.view().active_train, PLACEHOLDER);
        assert_eq!(dashboard.view().dropped_frames, 0);
    }

    #[test]
    fn test_numeric_train_id_is_dispatched_as_text() {
        let mut dashboard = LiveDashboard::new(50);

        let outcome = dashboard
            .handle_frame(r#"{"event":"train_start","train_id":17}"#)
            .unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Dispatched {
                kind: "train_start",
                outcome: DispatchOutcome::Applied,
            }
        );
        assert_eq!(dashboard.view().active_train, "17");
        assert_eq!(dashboard.session().active_train_id(), Some("17"));
    }

    #[test]
    fn test_wrong_typed_side_fields_still_update_the_panel() {
        let mut dashboard = LiveDashboard::new(50);
        dashboard
            .handle_frame(r#"{"event":"train_start","train_id":"T1"}"#)
            .unwrap();

        let outcome = dashboard
            .handle_frame(
                r#"{"event":"count","track_id":"7","totals":{"locomotive":2,"railcar":40}}"#,
            )
            .unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Dispatched {
                kind: "count",
                outcome: DispatchOutcome::Applied,
            }
        );
        assert_eq!(dashboard.view().locomotives, 2);
        assert_eq!(dashboard.view().railcars, 40);

        let outcome = dashboard
            .handle_frame(
                r#"{"event":"train_end","train_id":"T1","direction":"WB","ts":"2024-01-01T00:00:00"}"#,
            )
            .unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Dispatched {
                kind: "train_end",
                outcome: DispatchOutcome::Applied,
            }
        );
        assert_eq!(dashboard.session().active_train_id(), None);
        assert_eq!(dashboard.view().direction, "WB");
        assert_eq!(dashboard.log().len(), 3);
    }
}
