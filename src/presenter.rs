//! The render contract between the session and a front end.
//!
//! The session never queries the presenter for state: it pushes one `show_*` call per phase when
//! something visible changed, and the presenter repaints on [`Presenter::present`]. How the
//! screens actually look (pixels, terminal cells, test recordings) is entirely the presenter's
//! business.

use crate::grid::Grid;
use crate::scores::ScoreTable;
use crate::session::PauseOption;
use crate::Difficulty;

/// A packed `0xRRGGBB` color. The core prescribes the explosion palette only; presenters map it
/// onto whatever color space they have.
pub type Rgb = u32;

/// An opaque handle to a transient element drawn outside the regular screens, returned by
/// [`Presenter::draw_explosion_frame`] so the session can remove the frame again.
pub type ElementId = u32;

/// The geometry of the loss animation: a center point in presenter coordinates and one
/// radius/color pair per frame. The presenter computes it (only it knows where the clicked cell
/// sits on screen); the session replays it frame by frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplosionPlan {
    pub center: (u16, u16),
    pub radii: Vec<u16>,
    pub colors: Vec<Rgb>,
}

/// The session's render collaborator: one call per screen, plus the explosion helpers and the
/// explicit flush.
pub trait Presenter {
    /// The start screen: the currently selected difficulty and the 1 Hz prompt blink state.
    fn show_start_screen(&mut self, difficulty: Difficulty, blink_on: bool);

    /// The in-game screen: the board, the cursor and the elapsed whole seconds.
    fn show_game_screen(&mut self, grid: &Grid, cursor: (u8, u8), timer_secs: u16);

    /// The pause menu with the currently highlighted option.
    fn show_pause_menu(&mut self, selection: PauseOption);

    /// The game-over overlay on top of the final board.
    fn show_game_over(&mut self);

    /// The win overlay on top of the final board.
    fn show_you_win(&mut self);

    /// The initials-entry screen: the winning time, the initials committed so far, the slot being
    /// edited and the character currently up for selection.
    fn show_high_score_entry(
        &mut self,
        timer_secs: u16,
        initials: &str,
        char_pos: usize,
        candidate: char,
    );

    /// The leaderboard for one difficulty.
    fn show_high_scores(&mut self, table: &ScoreTable, difficulty: Difficulty);

    /// Computes the loss-animation geometry for the given board and clicked cell.
    fn explosion_plan(&mut self, grid: &Grid, cursor: (u8, u8)) -> ExplosionPlan;

    /// Draws one animation frame and returns a handle for removing it again.
    fn draw_explosion_frame(&mut self, center: (u16, u16), radius: u16, color: Rgb) -> ElementId;

    /// Removes a previously drawn animation frame.
    fn remove_element(&mut self, id: ElementId);

    /// Flushes the most recently requested screen to the device. Called at most once per tick.
    fn present(&mut self);
}
