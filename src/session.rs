//! The phase state machine that drives a whole play session.
//!
//! An external driver calls [`Session::tick`] once per fixed ~20 ms period with the current wall
//! clock. Each tick polls the input source once, dispatches to the current phase's handler, and
//! flushes at most one redraw to the presenter. Because the clock comes in from the outside, the
//! whole machine can be replayed under a test harness with synthetic instants and scripted input.

use crate::grid::Grid;
use crate::input::{Button, InputSample, InputSource};
use crate::presenter::Presenter;
use crate::scores::{ScoreLedger, ScoreTable};
use crate::{
    Difficulty, BLINK_PERIOD, IDLE_TIMEOUT, OUTCOME_DELAY, SCORE_DISPLAY_DELAY, TIMER_CAP_SECS,
};
use std::cmp;
use std::thread;
use std::time::{Duration, Instant};

/// The alphabet the initials are picked from, in cycling order.
pub const INITIALS_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// A leaderboard entry carries exactly this many initials.
pub const INITIALS_LEN: usize = 3;

/// How long each explosion frame stays on screen.
const EXPLOSION_FRAME_HOLD: Duration = Duration::from_millis(150);
/// The extra hold on the bare board after the last frame was removed.
const EXPLOSION_FINAL_HOLD: Duration = Duration::from_millis(300);

/// The seven session phases. One handler per phase; no nested mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The difficulty-select screen with the blinking prompt.
    Start,
    /// An active game.
    Playing,
    /// The two-option pause menu.
    Paused,
    /// The loss overlay, purely time-driven.
    GameOver,
    /// The win overlay, purely time-driven.
    YouWin,
    /// Picking initials for a qualifying time.
    HighScoreEntry,
    /// The leaderboard, purely time-driven.
    HighScoreDisplay,
}

/// The two pause-menu options. Any vertical joystick component flips the selection: with two
/// options, a step of plus or minus one modulo two is always the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOption {
    Resume,
    Quit,
}

impl PauseOption {
    fn other(self) -> Self {
        match self {
            PauseOption::Resume => PauseOption::Quit,
            PauseOption::Quit => PauseOption::Resume,
        }
    }
}

/// Wraparound cursor arithmetic: `(value + delta) mod modulus`, never a bounds check. This is the
/// sole maintainer of the cursor invariant the grid relies on.
fn wrap(value: u8, delta: i8, modulus: u8) -> u8 {
    (value as i16 + delta as i16).rem_euclid(modulus as i16) as u8
}

/// One play session: the current grid (if a game is on), the score ledger, and everything the
/// phase handlers need between ticks.
///
/// The input source and the presenter are injected at construction, so the session holds no
/// ambient handles to the hardware.
pub struct Session<I, P> {
    input: I,
    presenter: P,
    ledger: ScoreLedger,
    /// An optional fixed seed for every grid the session creates. Test instrumentation.
    seed: Option<u64>,

    phase: Phase,
    /// Set by [`Session::set_phase`]; `None` only before the first transition.
    phase_entered: Option<Instant>,

    /// The active game. Created on game start, replaced on the next one, `None` before the first.
    grid: Option<Grid>,
    /// The selected cell as `(row, column)`. Kept in range by `wrap`.
    cursor: (u8, u8),
    difficulty_idx: usize,

    /// The instant the in-game timer was started by the first reveal press, if it was.
    timer_start: Option<Instant>,
    /// Elapsed whole seconds, recomputed every Playing tick while the timer runs.
    timer_secs: u16,

    pause_selection: PauseOption,

    blink_on: bool,
    blink_at: Option<Instant>,
    idle_since: Option<Instant>,

    /// The initials committed so far during high-score entry.
    initials: String,
    /// Which of the three initials slots is being edited.
    char_pos: usize,
    /// The index into [`INITIALS_CHARSET`] of the character up for selection.
    char_idx: usize,

    redraw_pending: bool,
}

impl<I: InputSource, P: Presenter> Session<I, P> {
    pub fn new(input: I, presenter: P, ledger: ScoreLedger) -> Self {
        Session {
            input,
            presenter,
            ledger,
            seed: None,
            phase: Phase::Start,
            phase_entered: None,
            grid: None,
            cursor: (0, 0),
            difficulty_idx: 0,
            timer_start: None,
            timer_secs: 0,
            pause_selection: PauseOption::Resume,
            blink_on: true,
            blink_at: None,
            idle_since: None,
            initials: String::with_capacity(INITIALS_LEN),
            char_pos: 0,
            char_idx: 0,
            // The very first tick paints the start screen.
            redraw_pending: true,
        }
    }

    /// A session whose every grid replays the given mine-placement seed.
    pub fn with_seed(input: I, presenter: P, ledger: ScoreLedger, seed: u64) -> Self {
        let mut session = Self::new(input, presenter, ledger);
        session.seed = Some(seed);
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::ALL[self.difficulty_idx]
    }

    pub fn cursor(&self) -> (u8, u8) {
        self.cursor
    }

    pub fn timer_secs(&self) -> u16 {
        self.timer_secs
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn table(&self) -> &ScoreTable {
        self.ledger.table()
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Runs one tick: one input sample, one phase handler, at most one redraw.
    pub fn tick(&mut self, now: Instant) {
        let sample = self.input.poll();

        match self.phase {
            Phase::Start => self.on_start(&sample, now),
            Phase::Playing => self.on_playing(&sample, now),
            Phase::Paused => self.on_paused(&sample, now),
            Phase::GameOver => self.on_game_over(now),
            Phase::YouWin => self.on_you_win(now),
            Phase::HighScoreEntry => self.on_high_score_entry(&sample, now),
            Phase::HighScoreDisplay => self.on_high_score_display(now),
        }

        if self.redraw_pending {
            self.redraw_pending = false;
            self.render();
            self.presenter.present();
        }
    }

    /// Paints the current phase's screen. The purely time-driven phases are absent on purpose:
    /// their final frames (board, overlay, leaderboard) are painted by the transition that enters
    /// them and only flushed here.
    fn render(&mut self) {
        match self.phase {
            Phase::Start => {
                self.presenter
                    .show_start_screen(self.difficulty(), self.blink_on);
            }
            Phase::Playing => {
                if let Some(grid) = &self.grid {
                    self.presenter
                        .show_game_screen(grid, self.cursor, self.timer_secs);
                }
            }
            Phase::Paused => self.presenter.show_pause_menu(self.pause_selection),
            Phase::HighScoreEntry => {
                let candidate = INITIALS_CHARSET[self.char_idx] as char;
                self.presenter.show_high_score_entry(
                    self.timer_secs,
                    &self.initials,
                    self.char_pos,
                    candidate,
                );
            }
            Phase::GameOver | Phase::YouWin | Phase::HighScoreDisplay => {}
        }
    }

    fn set_phase(&mut self, phase: Phase, now: Instant) {
        self.phase = phase;
        self.phase_entered = Some(now);
        self.redraw_pending = true;

        // Coming back to the start screen always restarts the idle countdown.
        if phase == Phase::Start {
            self.idle_since = Some(now);
        }
    }

    fn phase_elapsed(&self, now: Instant) -> Duration {
        match self.phase_entered {
            Some(entered) => now.saturating_duration_since(entered),
            None => Duration::ZERO,
        }
    }

    fn on_start(&mut self, sample: &InputSample, now: Instant) {
        let blink_at = *self.blink_at.get_or_insert(now);
        if now.saturating_duration_since(blink_at) >= BLINK_PERIOD {
            self.blink_on = !self.blink_on;
            self.blink_at = Some(now);
            self.redraw_pending = true;
        }

        if !sample.is_idle() {
            self.idle_since = Some(now);
        }

        if sample.buttons.contains(Button::Select) {
            self.difficulty_idx = (self.difficulty_idx + 1) % Difficulty::ALL.len();
            self.redraw_pending = true;
        }

        if sample.buttons.contains(Button::Start) {
            self.start_game(now);
            return;
        }

        let idle_since = *self.idle_since.get_or_insert(now);
        if now.saturating_duration_since(idle_since) >= IDLE_TIMEOUT {
            self.idle_since = Some(now);
            self.presenter
                .show_high_scores(self.ledger.table(), self.difficulty());
            self.set_phase(Phase::HighScoreDisplay, now);
        }
    }

    fn start_game(&mut self, now: Instant) {
        let difficulty = self.difficulty();
        let grid = match self.seed {
            Some(seed) => Grid::with_seed(difficulty, seed),
            None => Grid::new(difficulty),
        };

        self.cursor = (grid.rows() / 2, grid.cols() / 2);
        self.grid = Some(grid);
        self.timer_start = None;
        self.timer_secs = 0;
        self.set_phase(Phase::Playing, now);
    }

    fn on_playing(&mut self, sample: &InputSample, now: Instant) {
        // Recompute the elapsed whole seconds; the cap is a forced loss, not an error.
        if let Some(started) = self.timer_start {
            let elapsed = now.saturating_duration_since(started).as_secs();
            self.timer_secs = cmp::min(elapsed, TIMER_CAP_SECS as u64) as u16;

            if self.timer_secs >= TIMER_CAP_SECS {
                if let Some(grid) = self.grid.as_mut() {
                    grid.forfeit();
                }
                self.show_final_board();
                self.presenter.show_game_over();
                self.set_phase(Phase::GameOver, now);
                return;
            }
        }

        if let Some((dx, dy)) = sample.movement {
            if let Some(grid) = &self.grid {
                self.cursor.0 = wrap(self.cursor.0, dy, grid.rows());
                self.cursor.1 = wrap(self.cursor.1, dx, grid.cols());
                self.redraw_pending = true;
            }
        }

        if sample.buttons.contains(Button::A) {
            // The first reveal press starts the timer.
            if self.timer_start.is_none() {
                self.timer_start = Some(now);
            }

            let result = match self.grid.as_mut() {
                Some(grid) => grid.reveal(self.cursor.0, self.cursor.1),
                None => Vec::new(),
            };

            // An empty result means the engine took no action: nothing to redraw.
            if !result.is_empty() {
                self.redraw_pending = true;

                let finished = self.grid.as_ref().map(|grid| grid.is_game_over());
                if finished == Some(true) {
                    self.finish_game(now);
                    return;
                }
            }
        }

        if sample.buttons.contains(Button::B) {
            if let Some(grid) = self.grid.as_mut() {
                if grid.toggle_flag(self.cursor.0, self.cursor.1).is_some() {
                    self.redraw_pending = true;
                }
            }
        }

        if sample.buttons.contains(Button::Select) {
            self.pause_selection = PauseOption::Resume;
            self.set_phase(Phase::Paused, now);
        }
    }

    /// Paints the final board, plays the loss animation when the game was lost, and moves to the
    /// matching outcome phase. Called with the grid already finalized.
    fn finish_game(&mut self, now: Instant) {
        let won = self.grid.as_ref().map(|grid| grid.is_won()) == Some(true);

        if won {
            if let Some(started) = self.timer_start {
                let elapsed = now.saturating_duration_since(started).as_secs();
                self.timer_secs = cmp::min(elapsed, TIMER_CAP_SECS as u64) as u16;
            }
            self.show_final_board();
            self.presenter.show_you_win();
            self.set_phase(Phase::YouWin, now);
        } else {
            self.show_final_board();
            self.play_explosion();
            self.presenter.show_game_over();
            self.set_phase(Phase::GameOver, now);
        }
    }

    fn show_final_board(&mut self) {
        if let Some(grid) = &self.grid {
            self.presenter
                .show_game_screen(grid, self.cursor, self.timer_secs);
        }
    }

    /// The deliberately blocking loss animation. The grid is already finalized when this runs, so
    /// nothing races with the sleeps; the session simply holds the tick for a few frames.
    fn play_explosion(&mut self) {
        let Some(grid) = &self.grid else {
            return;
        };

        let plan = self.presenter.explosion_plan(grid, self.cursor);

        for (&radius, &color) in plan.radii.iter().zip(plan.colors.iter()) {
            let element = self
                .presenter
                .draw_explosion_frame(plan.center, radius, color);
            self.presenter.present();
            thread::sleep(EXPLOSION_FRAME_HOLD);
            self.presenter.remove_element(element);
        }

        self.presenter.present();
        thread::sleep(EXPLOSION_FINAL_HOLD);
    }

    fn on_paused(&mut self, sample: &InputSample, now: Instant) {
        if let Some((_, dy)) = sample.movement {
            if dy != 0 {
                self.pause_selection = self.pause_selection.other();
                self.redraw_pending = true;
            }
        }

        if sample.buttons.contains(Button::A) || sample.buttons.contains(Button::Start) {
            match self.pause_selection {
                PauseOption::Resume => self.set_phase(Phase::Playing, now),
                PauseOption::Quit => self.set_phase(Phase::Start, now),
            }
            return;
        }

        // Select is the quick-resume shortcut regardless of the selection.
        if sample.buttons.contains(Button::Select) {
            self.set_phase(Phase::Playing, now);
        }
    }

    fn on_game_over(&mut self, now: Instant) {
        if self.phase_elapsed(now) >= OUTCOME_DELAY {
            self.set_phase(Phase::Start, now);
        }
    }

    fn on_you_win(&mut self, now: Instant) {
        if self.phase_elapsed(now) < OUTCOME_DELAY {
            return;
        }

        if self.ledger.qualifies(self.difficulty(), self.timer_secs) {
            self.initials.clear();
            self.char_pos = 0;
            self.char_idx = 0;
            self.set_phase(Phase::HighScoreEntry, now);
        } else {
            self.presenter
                .show_high_scores(self.ledger.table(), self.difficulty());
            self.set_phase(Phase::HighScoreDisplay, now);
        }
    }

    fn on_high_score_entry(&mut self, sample: &InputSample, now: Instant) {
        if let Some((dx, _)) = sample.movement {
            if dx != 0 {
                let len = INITIALS_CHARSET.len() as i16;
                self.char_idx = (self.char_idx as i16 + dx as i16).rem_euclid(len) as usize;
                self.redraw_pending = true;
            }
        }

        if sample.buttons.contains(Button::A) {
            self.initials.push(INITIALS_CHARSET[self.char_idx] as char);
            self.char_pos += 1;
            self.char_idx = 0;
            self.redraw_pending = true;

            if self.char_pos >= INITIALS_LEN {
                let difficulty = self.difficulty();
                let initials = self.initials.clone();
                self.ledger.insert(difficulty, &initials, self.timer_secs);
                self.presenter
                    .show_high_scores(self.ledger.table(), difficulty);
                self.set_phase(Phase::HighScoreDisplay, now);
            }
        }
    }

    fn on_high_score_display(&mut self, now: Instant) {
        if self.phase_elapsed(now) >= SCORE_DISPLAY_DELAY {
            self.set_phase(Phase::Start, now);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{PauseOption, Phase, Session};
    use crate::grid::cell::CellState;
    use crate::input::{Button, InputSample, InputSource};
    use crate::presenter::{ElementId, ExplosionPlan, Presenter, Rgb};
    use crate::scores::{ScoreLedger, ScoreTable};
    use crate::{Difficulty, Grid};
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    /// An input source fed by the tests, one sample per tick; empty queue polls as idle.
    #[derive(Default)]
    struct ScriptedInput {
        queue: VecDeque<InputSample>,
    }

    impl ScriptedInput {
        fn push(&mut self, sample: InputSample) {
            self.queue.push_back(sample);
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> InputSample {
            self.queue.pop_front().unwrap_or_default()
        }
    }

    /// Everything a presenter can be asked to show, flattened for assertions.
    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Start { difficulty: Difficulty, blink_on: bool },
        Game { cursor: (u8, u8), timer_secs: u16 },
        Pause(PauseOption),
        GameOver,
        YouWin,
        Entry { initials: String, candidate: char },
        HighScores(Difficulty),
        ExplosionFrame(u16),
        Present,
    }

    #[derive(Default)]
    struct RecordingPresenter {
        calls: Vec<Shown>,
    }

    impl RecordingPresenter {
        fn count(&self, shown: &Shown) -> usize {
            self.calls.iter().filter(|call| *call == shown).count()
        }
    }

    impl Presenter for RecordingPresenter {
        fn show_start_screen(&mut self, difficulty: Difficulty, blink_on: bool) {
            self.calls.push(Shown::Start {
                difficulty,
                blink_on,
            });
        }

        fn show_game_screen(&mut self, _grid: &Grid, cursor: (u8, u8), timer_secs: u16) {
            self.calls.push(Shown::Game { cursor, timer_secs });
        }

        fn show_pause_menu(&mut self, selection: PauseOption) {
            self.calls.push(Shown::Pause(selection));
        }

        fn show_game_over(&mut self) {
            self.calls.push(Shown::GameOver);
        }

        fn show_you_win(&mut self) {
            self.calls.push(Shown::YouWin);
        }

        fn show_high_score_entry(
            &mut self,
            _timer_secs: u16,
            initials: &str,
            _char_pos: usize,
            candidate: char,
        ) {
            self.calls.push(Shown::Entry {
                initials: initials.to_string(),
                candidate,
            });
        }

        fn show_high_scores(&mut self, _table: &ScoreTable, difficulty: Difficulty) {
            self.calls.push(Shown::HighScores(difficulty));
        }

        fn explosion_plan(&mut self, _grid: &Grid, _cursor: (u8, u8)) -> ExplosionPlan {
            // Two frames keep the blocking animation short under test.
            ExplosionPlan {
                center: (0, 0),
                radii: vec![1, 2],
                colors: vec![0xff8000, 0xff0000],
            }
        }

        fn draw_explosion_frame(
            &mut self,
            _center: (u16, u16),
            radius: u16,
            _color: Rgb,
        ) -> ElementId {
            self.calls.push(Shown::ExplosionFrame(radius));
            radius as ElementId
        }

        fn remove_element(&mut self, _id: ElementId) {}

        fn present(&mut self) {
            self.calls.push(Shown::Present);
        }
    }

    type TestSession = Session<ScriptedInput, RecordingPresenter>;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pocket_mines_session_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    /// A seeded session over a fresh (default) ledger stored at a scratch path.
    fn new_session(name: &str) -> TestSession {
        let path = scratch_file(name);
        let _ = fs::remove_file(&path);

        Session::with_seed(
            ScriptedInput::default(),
            RecordingPresenter::default(),
            ScoreLedger::load(path),
            42,
        )
    }

    fn step(session: &mut TestSession, sample: InputSample, now: Instant) {
        session.input_mut().push(sample);
        session.tick(now);
    }

    /// Walks the cursor to the target one axis at a time, one tick per step.
    fn move_cursor_to(session: &mut TestSession, target: (u8, u8), now: Instant) {
        while session.cursor() != target {
            let (row, col) = session.cursor();
            let dy = (target.0 as i8 - row as i8).signum();
            let dx = if dy == 0 {
                (target.1 as i8 - col as i8).signum()
            } else {
                0
            };
            step(session, InputSample::movement(dx, dy), now);
        }
    }

    /// Starts an easy game and triggers the mine-placing first reveal at the center.
    fn start_revealed_game(session: &mut TestSession, now: Instant) {
        step(session, InputSample::button(Button::Start), now);
        assert_eq!(session.phase(), Phase::Playing);
        step(session, InputSample::button(Button::A), now);
    }

    #[test]
    fn the_first_tick_paints_the_start_screen() {
        let mut session = new_session("first_tick");
        session.tick(Instant::now());

        assert_eq!(
            session.presenter().calls,
            [
                Shown::Start {
                    difficulty: Difficulty::Easy,
                    blink_on: true
                },
                Shown::Present
            ]
        );
    }

    #[test]
    fn select_cycles_the_difficulty_with_wraparound() {
        let mut session = new_session("cycle");
        let t0 = Instant::now();

        for expected in [Difficulty::Medium, Difficulty::Hard, Difficulty::Easy] {
            step(&mut session, InputSample::button(Button::Select), t0);
            assert_eq!(session.difficulty(), expected);
        }
    }

    #[test]
    fn the_prompt_blinks_at_one_hertz() {
        let mut session = new_session("blink");
        let t0 = Instant::now();

        session.tick(t0);
        let painted = session.presenter().calls.len();

        // Just short of the blink period nothing visible changes, so nothing is painted.
        session.tick(t0 + Duration::from_millis(499));
        assert_eq!(session.presenter().calls.len(), painted);

        session.tick(t0 + Duration::from_millis(500));
        assert_eq!(
            session.presenter().calls.last(),
            Some(&Shown::Present)
        );
        assert_eq!(
            session.presenter().count(&Shown::Start {
                difficulty: Difficulty::Easy,
                blink_on: false
            }),
            1
        );
    }

    #[test]
    fn ten_idle_seconds_show_the_leaderboard_exactly_once() {
        let mut session = new_session("idle");
        let t0 = Instant::now();

        session.tick(t0);
        session.tick(t0 + Duration::from_millis(9_999));
        assert_eq!(session.phase(), Phase::Start);

        session.tick(t0 + Duration::from_secs(10));
        assert_eq!(session.phase(), Phase::HighScoreDisplay);
        assert_eq!(session.presenter().count(&Shown::HighScores(Difficulty::Easy)), 1);

        // Still on display: no second leaderboard request.
        session.tick(t0 + Duration::from_millis(10_500));
        assert_eq!(session.presenter().count(&Shown::HighScores(Difficulty::Easy)), 1);

        // The display phase times out back to the start screen after 3 more seconds.
        session.tick(t0 + Duration::from_secs(13));
        assert_eq!(session.phase(), Phase::Start);
    }

    #[test]
    fn any_input_resets_the_idle_countdown() {
        let mut session = new_session("idle_reset");
        let t0 = Instant::now();

        session.tick(t0);
        step(
            &mut session,
            InputSample::movement(1, 0),
            t0 + Duration::from_secs(9),
        );

        session.tick(t0 + Duration::from_secs(12));
        assert_eq!(session.phase(), Phase::Start);

        session.tick(t0 + Duration::from_secs(19));
        assert_eq!(session.phase(), Phase::HighScoreDisplay);
    }

    #[test]
    fn starting_a_game_centers_the_cursor_and_resets_the_timer() {
        let mut session = new_session("start_game");
        step(&mut session, InputSample::button(Button::Start), Instant::now());

        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.cursor(), (4, 4));
        assert_eq!(session.timer_secs(), 0);

        let grid = session.grid().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (8, 8));
        assert!(!grid.mines_placed());
    }

    #[test]
    fn the_cursor_wraps_around_both_axes() {
        let mut session = new_session("wrap");
        let t0 = Instant::now();
        step(&mut session, InputSample::button(Button::Start), t0);

        // Five steps up from row 4 pass the top edge and come out at the bottom.
        for _ in 0..5 {
            step(&mut session, InputSample::movement(0, -1), t0);
        }
        assert_eq!(session.cursor(), (7, 4));

        for _ in 0..4 {
            step(&mut session, InputSample::movement(1, 0), t0);
        }
        assert_eq!(session.cursor(), (7, 0));
    }

    #[test]
    fn the_first_reveal_starts_the_timer_and_redraws_the_board() {
        let mut session = new_session("reveal");
        let t0 = Instant::now();
        start_revealed_game(&mut session, t0);

        let grid = session.grid().unwrap();
        assert!(grid.mines_placed());
        assert!(grid.revealed_count() > 0);
        assert_eq!(
            session.presenter().calls.last(),
            Some(&Shown::Present)
        );
        assert!(session.presenter().count(&Shown::Game {
            cursor: (4, 4),
            timer_secs: 0
        }) >= 1);

        // The timer is now running off the wall clock.
        session.tick(t0 + Duration::from_secs(3));
        assert_eq!(session.timer_secs(), 3);
    }

    #[test]
    fn flag_toggles_redraw_and_count() {
        let mut session = new_session("flag");
        let t0 = Instant::now();
        step(&mut session, InputSample::button(Button::Start), t0);

        step(&mut session, InputSample::button(Button::B), t0);
        assert_eq!(session.grid().unwrap().flags_placed(), 1);

        step(&mut session, InputSample::button(Button::B), t0);
        assert_eq!(session.grid().unwrap().flags_placed(), 0);
    }

    #[test]
    fn the_pause_menu_flips_confirms_and_shortcuts() {
        let mut session = new_session("pause");
        let t0 = Instant::now();
        step(&mut session, InputSample::button(Button::Start), t0);

        step(&mut session, InputSample::button(Button::Select), t0);
        assert_eq!(session.phase(), Phase::Paused);
        assert_eq!(session.presenter().count(&Shown::Pause(PauseOption::Resume)), 1);

        // Any vertical component flips the two-option selection.
        step(&mut session, InputSample::movement(0, 1), t0);
        assert_eq!(session.presenter().count(&Shown::Pause(PauseOption::Quit)), 1);
        step(&mut session, InputSample::movement(0, -1), t0);
        assert_eq!(session.presenter().count(&Shown::Pause(PauseOption::Resume)), 2);

        // Select is the quick-resume shortcut.
        step(&mut session, InputSample::button(Button::Select), t0);
        assert_eq!(session.phase(), Phase::Playing);

        // Quit via the menu lands back on the start screen.
        step(&mut session, InputSample::button(Button::Select), t0);
        step(&mut session, InputSample::movement(0, 1), t0);
        step(&mut session, InputSample::button(Button::A), t0);
        assert_eq!(session.phase(), Phase::Start);
    }

    #[test]
    fn the_saturated_timer_forces_a_loss() {
        let mut session = new_session("timeout");
        let t0 = Instant::now();
        start_revealed_game(&mut session, t0);

        session.tick(t0 + Duration::from_secs(1_000));

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.timer_secs(), 999);
        let grid = session.grid().unwrap();
        assert!(grid.is_game_over());
        assert!(!grid.is_won());
        assert_eq!(session.presenter().count(&Shown::GameOver), 1);

        // The overlay holds for two seconds, then the session returns to the start screen.
        session.tick(t0 + Duration::from_secs(1_001));
        assert_eq!(session.phase(), Phase::GameOver);
        session.tick(t0 + Duration::from_secs(1_003));
        assert_eq!(session.phase(), Phase::Start);
    }

    #[test]
    fn stepping_on_a_mine_plays_the_explosion_and_ends_the_game() {
        let mut session = new_session("explosion");
        let t0 = Instant::now();
        start_revealed_game(&mut session, t0);

        let mine = {
            let grid = session.grid().unwrap();
            (0..grid.rows())
                .flat_map(|r| (0..grid.cols()).map(move |c| (r, c)))
                .find(|&(r, c)| grid.is_mine(r, c))
                .unwrap()
        };

        move_cursor_to(&mut session, mine, t0);
        step(&mut session, InputSample::button(Button::A), t0);

        assert_eq!(session.phase(), Phase::GameOver);
        assert!(session.grid().unwrap().is_game_over());
        assert_eq!(session.presenter().count(&Shown::ExplosionFrame(1)), 1);
        assert_eq!(session.presenter().count(&Shown::ExplosionFrame(2)), 1);
        assert_eq!(session.presenter().count(&Shown::GameOver), 1);
    }

    #[test]
    fn winning_runs_the_whole_entry_and_leaderboard_pipeline() {
        let mut session = new_session("win_pipeline");
        let t0 = Instant::now();
        start_revealed_game(&mut session, t0);

        // Reveal every remaining safe cell; the scripted cursor walk makes this a pure
        // input-driven playthrough.
        while session.phase() == Phase::Playing {
            let target = {
                let grid = session.grid().unwrap();
                (0..grid.rows())
                    .flat_map(|r| (0..grid.cols()).map(move |c| (r, c)))
                    .find(|&(r, c)| {
                        !grid.is_mine(r, c) && grid.cell(r, c).state() == CellState::Unrevealed
                    })
            };
            let Some(target) = target else { break };

            move_cursor_to(&mut session, target, t0);
            step(&mut session, InputSample::button(Button::A), t0);
        }

        assert_eq!(session.phase(), Phase::YouWin);
        assert_eq!(session.presenter().count(&Shown::YouWin), 1);

        // A zero-second win against the default table qualifies.
        let t1 = t0 + Duration::from_secs(2);
        session.tick(t1);
        assert_eq!(session.phase(), Phase::HighScoreEntry);

        // Pick 'B' for the first initial, then commit twice more with the reset 'A'.
        step(&mut session, InputSample::movement(1, 0), t1);
        step(&mut session, InputSample::button(Button::A), t1);
        step(&mut session, InputSample::button(Button::A), t1);
        assert_eq!(session.phase(), Phase::HighScoreEntry);
        step(&mut session, InputSample::button(Button::A), t1);

        assert_eq!(session.phase(), Phase::HighScoreDisplay);
        let best = &session.table().entries(Difficulty::Easy)[0];
        assert_eq!(best.initials, "BAA");
        assert_eq!(best.time, 0);

        // And the leaderboard times out back to the start screen.
        session.tick(t1 + Duration::from_secs(3));
        assert_eq!(session.phase(), Phase::Start);

        let _ = fs::remove_file(scratch_file("win_pipeline"));
    }

    #[test]
    fn wraparound_arithmetic_covers_both_edges() {
        assert_eq!(super::wrap(0, -1, 8), 7);
        assert_eq!(super::wrap(7, 1, 8), 0);
        assert_eq!(super::wrap(3, 0, 8), 3);
        assert_eq!(super::wrap(0, 1, 2), 1);
        assert_eq!(super::wrap(1, 1, 2), 0);
    }

    #[test]
    fn the_initials_alphabet_is_the_fixed_36_symbol_wheel() {
        assert_eq!(super::INITIALS_CHARSET.len(), 36);
        assert_eq!(super::INITIALS_CHARSET[0], b'A');
        assert_eq!(super::INITIALS_CHARSET[25], b'Z');
        assert_eq!(super::INITIALS_CHARSET[26], b'0');
        assert_eq!(super::INITIALS_CHARSET[35], b'9');
    }
}
