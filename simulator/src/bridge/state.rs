use crate::motion::model::{BallMotionModel, MotionConfig};
use fooscore::table::{CommandKind, Coordinate};
use log::info;

/// Table-side state behind the HTTP bridge: power, game activity, and the
/// simulated ball.
pub struct TableState {
    powered: bool,
    running: bool,
    model: BallMotionModel,
}

impl TableState {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            powered: false,
            running: false,
            model: BallMotionModel::new(config),
        }
    }

    #[cfg(test)]
    pub fn powered(&self) -> bool {
        self.powered
    }

    #[cfg(test)]
    pub fn running(&self) -> bool {
        self.running
    }

    /// Current ball position. While a game is running each call advances the
    /// simulation one step, so every poll observes fresh motion.
    pub fn coordinate(&mut self) -> Coordinate {
        if self.powered && self.running {
            self.model.step()
        } else {
            self.model.position()
        }
    }

    /// Applies a command; `false` means the table refused it. Starting an
    /// unpowered table is the only refusal.
    pub fn apply(&mut self, kind: CommandKind) -> bool {
        match kind {
            CommandKind::PowerOn => {
                self.powered = true;
                info!("table powered on");
                true
            }
            CommandKind::Start => {
                if !self.powered {
                    info!("start refused, table not powered");
                    return false;
                }
                self.running = true;
                info!("game started");
                true
            }
            CommandKind::Reset => {
                self.model.recenter();
                self.running = false;
                info!("ball recentered, game halted");
                true
            }
            CommandKind::Stop => {
                self.running = false;
                info!("game stopped");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_moves_only_while_a_game_runs() {
        let mut state = TableState::new(MotionConfig::default());
        let parked = state.coordinate();
        assert_eq!(state.coordinate(), parked);

        assert!(state.apply(CommandKind::PowerOn));
        assert!(state.apply(CommandKind::Start));
        let moved = state.coordinate();
        assert_ne!(moved, parked);

        state.apply(CommandKind::Stop);
        assert_eq!(state.coordinate(), moved);
    }

    #[test]
    fn start_is_refused_until_powered() {
        let mut state = TableState::new(MotionConfig::default());
        assert!(!state.apply(CommandKind::Start));
        assert!(!state.powered());
        assert!(!state.running());

        state.apply(CommandKind::PowerOn);
        assert!(state.powered());
        assert!(state.apply(CommandKind::Start));
        assert!(state.running());
    }

    #[test]
    fn reset_recenters_and_halts() {
        let config = MotionConfig::default();
        let kickoff = Coordinate::new(config.start_x, config.start_y);
        let mut state = TableState::new(config);
        state.apply(CommandKind::PowerOn);
        state.apply(CommandKind::Start);
        for _ in 0..10 {
            state.coordinate();
        }
        assert_ne!(state.coordinate(), kickoff);

        assert!(state.apply(CommandKind::Reset));
        assert!(!state.running());
        assert_eq!(state.coordinate(), kickoff);
    }
}
