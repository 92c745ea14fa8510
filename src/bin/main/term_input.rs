//! The keyboard stand-in for the joystick and the four device buttons.
//!
//! This is where the raw-input concerns the core refuses to know about live: key repeat limiting
//! for the movement axes and per-button debouncing, mirroring what the device firmware did with
//! the analog stick dead zone and the shift-register keys.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pocket_mines::{Button, InputSample, InputSource};
use std::time::{Duration, Instant};

/// The minimum spacing between two movement events, so a held arrow key walks the cursor at a
/// controlled pace instead of sprinting.
const MOVE_REPEAT: Duration = Duration::from_millis(120);
/// The minimum spacing between two presses of the same button.
const BUTTON_DEBOUNCE: Duration = Duration::from_millis(150);

pub struct TermInput {
    last_move: Option<Instant>,
    last_press: [Option<Instant>; 4],
    quit: bool,
}

impl TermInput {
    pub fn new() -> Self {
        TermInput {
            last_move: None,
            last_press: [None; 4],
            quit: false,
        }
    }

    /// Whether the player asked to close the program. Quitting is a front-end concern, not a
    /// session phase, so the driver loop checks this flag itself.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn movement(&mut self, sample: &mut InputSample, dx: i8, dy: i8, now: Instant) {
        let due = self
            .last_move
            .map_or(true, |last| now.duration_since(last) >= MOVE_REPEAT);

        if due {
            sample.movement = Some((dx, dy));
            self.last_move = Some(now);
        }
    }

    fn press(&mut self, sample: &mut InputSample, button: Button, now: Instant) {
        let slot = match button {
            Button::A => 0,
            Button::B => 1,
            Button::Start => 2,
            Button::Select => 3,
        };

        let due = self.last_press[slot]
            .map_or(true, |last| now.duration_since(last) >= BUTTON_DEBOUNCE);

        if due {
            sample.buttons.insert(button);
            self.last_press[slot] = Some(now);
        }
    }

    fn apply(&mut self, key: KeyEvent, sample: &mut InputSample, now: Instant) {
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => self.movement(sample, 0, -1, now),
            KeyCode::Down | KeyCode::Char('s') => self.movement(sample, 0, 1, now),
            KeyCode::Left | KeyCode::Char('a') => self.movement(sample, -1, 0, now),
            KeyCode::Right | KeyCode::Char('d') => self.movement(sample, 1, 0, now),
            KeyCode::Char(' ') | KeyCode::Char('z') => self.press(sample, Button::A, now),
            KeyCode::Char('f') | KeyCode::Char('x') => self.press(sample, Button::B, now),
            KeyCode::Enter => self.press(sample, Button::Start, now),
            KeyCode::Tab => self.press(sample, Button::Select, now),
            KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') => {
                if key.modifiers == KeyModifiers::CONTROL {
                    self.quit = true;
                }
            }
            _ => {}
        };
    }
}

impl InputSource for TermInput {
    /// Drains every pending terminal event without blocking and folds them into one sample.
    fn poll(&mut self) -> InputSample {
        let mut sample = InputSample::idle();
        let now = Instant::now();

        while event::poll(Duration::ZERO).unwrap_or(false) {
            let Ok(event) = event::read() else {
                break;
            };

            if let Event::Key(key) = event {
                if key.kind != KeyEventKind::Release {
                    self.apply(key, &mut sample, now);
                }
            }
        }

        sample
    }
}
