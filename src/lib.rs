//! The logic core of a handheld minesweeper game.
//!
//! The crate is split along the seams of the device it was written for: [`grid`] owns a single
//! puzzle instance, [`scores`] owns the persisted leaderboard, and [`session`] drives a whole play
//! session through its phases, one fixed-rate tick at a time. The session talks to the outside
//! world exclusively through the [`input::InputSource`] and [`presenter::Presenter`] contracts, so
//! the same core runs under a real front end and under a scripted test harness alike.

pub mod grid;
pub mod input;
pub mod presenter;
pub mod scores;
pub mod session;

use std::time::Duration;

pub use grid::Grid;
pub use input::{Button, Buttons, InputSample, InputSource};
pub use presenter::{ExplosionPlan, Presenter};
pub use scores::{ScoreEntry, ScoreLedger, ScoreTable};
pub use session::{PauseOption, Phase, Session};

/// The nominal period of the driver loop. Each tick samples the input once, runs the current
/// phase's handler once and requests at most one redraw.
pub const TICK_PERIOD: Duration = Duration::from_millis(20);

/// How long the start-screen prompt stays on (and then off): a 1 Hz blink.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// How long the start screen waits without any input before auto-showing the leaderboard.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the game-over and win overlays stay up before the session moves on.
pub const OUTCOME_DELAY: Duration = Duration::from_secs(2);

/// How long the leaderboard stays up before the session returns to the start screen.
pub const SCORE_DISPLAY_DELAY: Duration = Duration::from_secs(3);

/// The in-game timer saturates here; reaching it forces a loss.
pub const TIMER_CAP_SECS: u16 = 999;

/// The three board presets. There are no custom sizes: the original device had exactly these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All the presets, in the order the start screen cycles through them.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The board dimensions and mine count: `(rows, columns, mines)`.
    pub fn board(self) -> (u8, u8, u16) {
        match self {
            Difficulty::Easy => (8, 8, 10),
            Difficulty::Medium => (10, 10, 20),
            Difficulty::Hard => (12, 12, 30),
        }
    }

    /// The stable key the preset is persisted under in the score file.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// The human-readable name shown on the start screen and the leaderboard.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

#[cfg(test)]
mod test {
    use super::Difficulty;

    #[test]
    fn every_preset_leaves_room_for_safe_cells() {
        for difficulty in Difficulty::ALL {
            let (rows, cols, mines) = difficulty.board();
            let cells = rows as u16 * cols as u16;

            // The first reveal excepts up to 9 cells from mine placement, so every preset must
            // have at least that many safe cells.
            assert!(cells - mines >= 9, "{:?} is overcrowded", difficulty);
        }
    }

    #[test]
    fn preset_keys_are_distinct() {
        assert_eq!(
            Difficulty::ALL.map(Difficulty::key),
            ["easy", "medium", "hard"]
        );
    }
}
