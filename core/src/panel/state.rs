//! Panel state and its reducer.
//!
//! Every mutation of the control panel flows through [`PanelState::apply`]:
//! poll completions and button presses are delivered as [`PanelEvent`]s, and
//! the reducer answers with at most one [`PanelEffect`] for the caller to
//! perform. Nothing else writes the state.

use crate::prelude::BackendResult;
use crate::table::{CommandKind, Coordinate};

/// Oldest history entries are dropped beyond this many.
pub const HISTORY_CAP: usize = 20;

const WAITING_STATUS: &str = "Waiting for ball telemetry...";
const POWER_GUARD_STATUS: &str = "Power on the table before starting.";
const BACKEND_FAILURE_STATUS: &str = "Unable to reach the table backend.";

/// Inputs the panel reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The poll interval elapsed.
    TickElapsed,
    /// A previously issued poll finished, successfully or not.
    PollSettled {
        seq: u64,
        result: BackendResult<Coordinate>,
    },
    /// The operator pressed a command button.
    CommandPressed(CommandKind),
    /// A dispatched command finished, successfully or not.
    CommandSettled {
        kind: CommandKind,
        result: BackendResult<()>,
    },
    /// The pointer moved over the field; the coordinate is already in
    /// table space.
    ProbeMoved(Coordinate),
    /// The pointer left the field.
    ProbeLeft,
}

/// Work the caller performs on behalf of a transition. The outcome comes
/// back as another [`PanelEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEffect {
    /// Issue one coordinate poll carrying this sequence number.
    StartPoll { seq: u64 },
    /// Post the command to its endpoint.
    Dispatch(CommandKind),
}

/// Transient UI state of the control panel. Defaults on construction,
/// lives as long as the view.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub power_on: bool,
    pub start_pressed: bool,
    pub reset_pressed: bool,
    pub stop_pressed: bool,
    pub status: String,
    /// Last successfully polled ball position.
    pub coordinate: Coordinate,
    /// Manual probe position while the pointer hovers the field.
    pub probe: Option<Coordinate>,
    pub history: Vec<String>,
    next_seq: u64,
    in_flight: Option<u64>,
    applied_seq: u64,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            power_on: false,
            start_pressed: false,
            reset_pressed: false,
            stop_pressed: false,
            status: WAITING_STATUS.into(),
            coordinate: Coordinate::default(),
            probe: None,
            history: Vec::new(),
            next_seq: 0,
            in_flight: None,
            applied_seq: 0,
        }
    }
}

impl PanelState {
    /// Applies one event and returns the effect it calls for, if any.
    ///
    /// Ticks are skipped while a poll is in flight, responses carrying a
    /// sequence number at or below the last applied one are discarded, and
    /// Start is refused until Power On has been pressed. A refused or
    /// skipped event returns `None`.
    pub fn apply(&mut self, event: PanelEvent) -> Option<PanelEffect> {
        match event {
            PanelEvent::TickElapsed => {
                if self.in_flight.is_some() {
                    return None;
                }
                self.next_seq += 1;
                self.in_flight = Some(self.next_seq);
                Some(PanelEffect::StartPoll { seq: self.next_seq })
            }
            PanelEvent::PollSettled { seq, result } => {
                if self.in_flight == Some(seq) {
                    self.in_flight = None;
                }
                if seq <= self.applied_seq {
                    return None;
                }
                match result {
                    Ok(coordinate) => {
                        self.applied_seq = seq;
                        self.coordinate = coordinate;
                        self.status =
                            format!("Ball at ({:.1}, {:.1})", coordinate.x, coordinate.y);
                        self.push_history(format!(
                            "Ball at ({:.1}, {:.1})",
                            coordinate.x, coordinate.y
                        ));
                    }
                    Err(_) => {
                        self.status = BACKEND_FAILURE_STATUS.into();
                    }
                }
                None
            }
            PanelEvent::CommandPressed(kind) => {
                if kind == CommandKind::Start && !self.power_on {
                    self.status = POWER_GUARD_STATUS.into();
                    return None;
                }
                match kind {
                    CommandKind::PowerOn => self.power_on = true,
                    CommandKind::Start => self.start_pressed = true,
                    CommandKind::Reset => {
                        self.reset_pressed = true;
                        self.start_pressed = false;
                        self.stop_pressed = false;
                    }
                    CommandKind::Stop => self.stop_pressed = true,
                }
                self.status = format!("{} requested", kind.label());
                self.push_history(format!("{} requested", kind.label()));
                Some(PanelEffect::Dispatch(kind))
            }
            PanelEvent::CommandSettled { kind, result } => {
                match result {
                    Ok(()) => {
                        self.status = format!("{} acknowledged", kind.label());
                        self.push_history(format!("{} acknowledged", kind.label()));
                    }
                    Err(_) => {
                        self.status = BACKEND_FAILURE_STATUS.into();
                    }
                }
                None
            }
            PanelEvent::ProbeMoved(coordinate) => {
                self.probe = Some(coordinate);
                None
            }
            PanelEvent::ProbeLeft => {
                self.probe = None;
                None
            }
        }
    }

    /// Sequence number of the poll currently in flight, if any.
    pub fn pending_poll(&self) -> Option<u64> {
        self.in_flight
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > HISTORY_CAP {
            self.history.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::BackendError;

    fn poll_ok(state: &mut PanelState, x: f64, y: f64) -> u64 {
        let effect = state.apply(PanelEvent::TickElapsed);
        let seq = match effect {
            Some(PanelEffect::StartPoll { seq }) => seq,
            other => panic!("expected a poll effect, got {other:?}"),
        };
        state.apply(PanelEvent::PollSettled {
            seq,
            result: Ok(Coordinate { x, y }),
        });
        seq
    }

    #[test]
    fn tick_issues_one_poll_and_overlap_is_skipped() {
        let mut state = PanelState::default();

        let first = state.apply(PanelEvent::TickElapsed);
        assert_eq!(first, Some(PanelEffect::StartPoll { seq: 1 }));
        assert_eq!(state.apply(PanelEvent::TickElapsed), None);

        state.apply(PanelEvent::PollSettled {
            seq: 1,
            result: Ok(Coordinate { x: 1.0, y: 2.0 }),
        });
        assert_eq!(
            state.apply(PanelEvent::TickElapsed),
            Some(PanelEffect::StartPoll { seq: 2 })
        );
    }

    #[test]
    fn successful_poll_publishes_the_decoded_value_exactly() {
        let mut state = PanelState::default();
        poll_ok(&mut state, 100.0, 50.0);
        assert_eq!(state.coordinate, Coordinate { x: 100.0, y: 50.0 });
        assert_eq!(state.status, "Ball at (100.0, 50.0)");
    }

    #[test]
    fn failed_poll_retains_previous_value_and_reports_generically() {
        let mut state = PanelState::default();

        let effect = state.apply(PanelEvent::TickElapsed);
        assert_eq!(effect, Some(PanelEffect::StartPoll { seq: 1 }));
        state.apply(PanelEvent::PollSettled {
            seq: 1,
            result: Err(BackendError::Network("connection refused".into())),
        });
        assert_eq!(state.coordinate, Coordinate::default());
        assert_eq!(state.status, BACKEND_FAILURE_STATUS);

        poll_ok(&mut state, 3.0, 4.0);
        let effect = state.apply(PanelEvent::TickElapsed);
        let seq = match effect {
            Some(PanelEffect::StartPoll { seq }) => seq,
            other => panic!("expected a poll effect, got {other:?}"),
        };
        state.apply(PanelEvent::PollSettled {
            seq,
            result: Err(BackendError::Status(500)),
        });
        assert_eq!(state.coordinate, Coordinate { x: 3.0, y: 4.0 });
        assert_eq!(state.status, BACKEND_FAILURE_STATUS);
    }

    #[test]
    fn every_failure_kind_collapses_to_the_same_message() {
        let failures = [
            BackendError::Network("timed out".into()),
            BackendError::Status(404),
            BackendError::Decode("missing field `y`".into()),
        ];
        for failure in failures {
            let mut state = PanelState::default();
            state.apply(PanelEvent::TickElapsed);
            state.apply(PanelEvent::PollSettled {
                seq: 1,
                result: Err(failure),
            });
            assert_eq!(state.status, BACKEND_FAILURE_STATUS);
        }
    }

    #[test]
    fn stale_lower_sequence_responses_are_discarded() {
        let mut state = PanelState::default();
        poll_ok(&mut state, 1.0, 1.0);
        poll_ok(&mut state, 2.0, 2.0);

        // A late duplicate of the first response must not win.
        state.apply(PanelEvent::PollSettled {
            seq: 1,
            result: Ok(Coordinate { x: 9.0, y: 9.0 }),
        });
        assert_eq!(state.coordinate, Coordinate { x: 2.0, y: 2.0 });

        // Nor may a late failure clobber the newer status.
        state.apply(PanelEvent::PollSettled {
            seq: 2,
            result: Err(BackendError::Status(502)),
        });
        assert_eq!(state.status, "Ball at (2.0, 2.0)");
    }

    #[test]
    fn start_before_power_on_is_refused() {
        let mut state = PanelState::default();

        assert_eq!(state.apply(PanelEvent::CommandPressed(CommandKind::Start)), None);
        assert!(!state.start_pressed);
        assert_eq!(state.status, POWER_GUARD_STATUS);

        assert_eq!(
            state.apply(PanelEvent::CommandPressed(CommandKind::PowerOn)),
            Some(PanelEffect::Dispatch(CommandKind::PowerOn))
        );
        assert!(state.power_on);
        assert_eq!(
            state.apply(PanelEvent::CommandPressed(CommandKind::Start)),
            Some(PanelEffect::Dispatch(CommandKind::Start))
        );
        assert!(state.start_pressed);
    }

    #[test]
    fn stop_is_never_guarded() {
        let mut state = PanelState::default();
        assert_eq!(
            state.apply(PanelEvent::CommandPressed(CommandKind::Stop)),
            Some(PanelEffect::Dispatch(CommandKind::Stop))
        );
        assert!(state.stop_pressed);
        assert!(!state.power_on);
    }

    #[test]
    fn reset_clears_start_and_stop_flags_only() {
        let mut state = PanelState::default();
        state.apply(PanelEvent::CommandPressed(CommandKind::PowerOn));
        state.apply(PanelEvent::CommandPressed(CommandKind::Start));
        state.apply(PanelEvent::CommandPressed(CommandKind::Stop));
        assert!(state.start_pressed && state.stop_pressed);

        state.apply(PanelEvent::CommandPressed(CommandKind::Reset));
        assert!(state.reset_pressed);
        assert!(!state.start_pressed);
        assert!(!state.stop_pressed);
        assert!(state.power_on);
    }

    #[test]
    fn command_settlement_updates_status_independently_of_coordinates() {
        let mut state = PanelState::default();
        poll_ok(&mut state, 5.0, 6.0);

        state.apply(PanelEvent::CommandPressed(CommandKind::PowerOn));
        state.apply(PanelEvent::CommandSettled {
            kind: CommandKind::PowerOn,
            result: Ok(()),
        });
        assert_eq!(state.status, "Power On acknowledged");
        assert_eq!(state.coordinate, Coordinate { x: 5.0, y: 6.0 });

        state.apply(PanelEvent::CommandSettled {
            kind: CommandKind::PowerOn,
            result: Err(BackendError::Network("broken pipe".into())),
        });
        assert_eq!(state.status, BACKEND_FAILURE_STATUS);
        assert_eq!(state.coordinate, Coordinate { x: 5.0, y: 6.0 });
    }

    #[test]
    fn history_is_bounded() {
        let mut state = PanelState::default();
        for i in 0..(HISTORY_CAP as i32 + 5) {
            poll_ok(&mut state, f64::from(i), 0.0);
        }
        assert_eq!(state.history.len(), HISTORY_CAP);
        assert_eq!(state.history.last().map(String::as_str), Some("Ball at (24.0, 0.0)"));
        assert_eq!(state.history.first().map(String::as_str), Some("Ball at (5.0, 0.0)"));
    }

    #[test]
    fn probe_tracks_pointer_presence() {
        let mut state = PanelState::default();
        state.apply(PanelEvent::ProbeMoved(Coordinate { x: 12.0, y: 34.0 }));
        assert_eq!(state.probe, Some(Coordinate { x: 12.0, y: 34.0 }));
        state.apply(PanelEvent::ProbeLeft);
        assert_eq!(state.probe, None);
    }
}
