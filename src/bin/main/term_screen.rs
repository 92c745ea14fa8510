//! The terminal renderer: a [`Presenter`] that buffers the requested screen and repaints it on
//! [`Presenter::present`].
//!
//! The session pushes state in; nothing here reads the core back. Every `show_*` call replaces the
//! buffered screen (or sets an overlay on top of it), and `present` draws the whole frame from
//! scratch, so a lost terminal cell never survives past the next flush.

use pocket_mines::grid::cell::CellState;
use pocket_mines::grid::Grid;
use pocket_mines::presenter::{ElementId, ExplosionPlan, Presenter, Rgb};
use pocket_mines::scores::ScoreTable;
use pocket_mines::{Difficulty, PauseOption};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Terminal,
};
use std::io::Stderr;

/// The number of terminal columns a single cell occupies. Two columns per cell keeps the board
/// roughly square on common fonts.
const CELL_WIDTH: u16 = 2;

const CLOSED_CELL_SYMBOL: &str = "░░";
const FLAG_SYMBOL: &str = "▶ ";
const MINE_SYMBOL: &str = "◉ ";
const EMPTY_CELL_SYMBOL: &str = "  ";

const APP_BG_COLOR: Color = Color::Black;
const BOARD_BORDER_COLOR: Color = Color::DarkGray;
const CLOSED_CELL_COLOR: Color = Color::DarkGray;
const FLAG_COLOR: Color = Color::LightRed;
const MINE_COLOR: Color = Color::Red;
const REGULAR_TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::DarkGray;
const TITLE_COLOR: Color = Color::Yellow;
const SELECTION_COLOR: Color = Color::Yellow;
const GAME_OVER_BORDER_COLOR: Color = Color::Red;
const YOU_WIN_BORDER_COLOR: Color = Color::Green;
const PAUSE_BORDER_COLOR: Color = Color::LightYellow;

/// The colors of the open cells' digits, indexed by the adjacent-mine count (0 is unused).
const DIGIT_COLORS: [Color; 9] = [
    Color::Reset,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightRed,
    Color::Blue,
    Color::Red,
    Color::Cyan,
    Color::White,
    Color::Gray,
];

const TITLE_TEXT: &str = "POCKET MINES";
const PROMPT_TEXT: &str = "PRESS START";
const START_LEGEND_TEXT: [&str; 3] = [
    "[←][→] / [a][d]: change difficulty",
    "[ENTER]: start the game",
    "[q] / [ESC]: quit",
];
const GAME_LEGEND_TEXT: &str =
    "[arrows] move   [SPACE] open   [f] flag   [TAB] pause   [q] quit";
const PAUSE_POPUP_TITLE: &str = "PAUSED";
const GAME_OVER_POPUP_TEXT: [&str; 1] = ["GAME OVER"];
const YOU_WIN_POPUP_TEXT: [&str; 1] = ["YOU WIN!"];

/// One board cell, snapshotted at `show_game_screen` time so the renderer never holds a borrow of
/// the live grid.
#[derive(Debug, Clone, Copy)]
enum CellGlyph {
    Closed,
    Flagged,
    Mine,
    Open(u8),
}

/// A full snapshot of the in-game screen.
#[derive(Debug, Clone)]
struct BoardView {
    rows: u8,
    cols: u8,
    cells: Vec<CellGlyph>,
    cursor: (u8, u8),
    timer_secs: u16,
    mine_counter: i32,
}

impl BoardView {
    fn snapshot(grid: &Grid, cursor: (u8, u8), timer_secs: u16) -> Self {
        let lost = grid.is_game_over() && !grid.is_won();
        let mut cells = Vec::with_capacity(grid.rows() as usize * grid.cols() as usize);

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let cell = grid.cell(row, col);

                let glyph = if lost && cell.is_mine() {
                    CellGlyph::Mine
                } else {
                    match cell.state() {
                        CellState::Flagged => CellGlyph::Flagged,
                        CellState::Unrevealed => CellGlyph::Closed,
                        CellState::Revealed => match cell.adjacent_mines() {
                            Some(count) => CellGlyph::Open(count),
                            None => CellGlyph::Mine,
                        },
                    }
                };

                cells.push(glyph);
            }
        }

        BoardView {
            rows: grid.rows(),
            cols: grid.cols(),
            cells,
            cursor,
            timer_secs,
            mine_counter: grid.mine_counter(),
        }
    }

    fn glyph(&self, row: u8, col: u8) -> CellGlyph {
        self.cells[row as usize * self.cols as usize + col as usize]
    }
}

/// The buffered screen. Exactly one of these is current at any moment; `present` renders it.
#[derive(Debug, Clone)]
enum Screen {
    Blank,
    Start {
        difficulty: Difficulty,
        blink_on: bool,
    },
    Game(BoardView),
    Pause(PauseOption),
    Entry {
        timer_secs: u16,
        initials: String,
        char_pos: usize,
        candidate: char,
    },
    Scores {
        difficulty: Difficulty,
        rows: Vec<(String, u16)>,
    },
}

/// An overlay popup drawn on top of the current screen.
#[derive(Debug, Clone, Copy)]
enum Banner {
    GameOver,
    YouWin,
}

/// One buffered explosion frame. At most one exists at a time: the session removes each frame
/// before drawing the next.
#[derive(Debug, Clone, Copy)]
struct Flash {
    center: (u16, u16),
    radius: u16,
    color: Rgb,
    id: ElementId,
}

pub struct TermScreen {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    screen: Screen,
    banner: Option<Banner>,
    flash: Option<Flash>,
    next_element_id: ElementId,
}

impl TermScreen {
    pub fn new(terminal: Terminal<CrosstermBackend<Stderr>>) -> Self {
        TermScreen {
            terminal,
            screen: Screen::Blank,
            banner: None,
            flash: None,
            next_element_id: 0,
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.banner = None;
    }
}

impl Presenter for TermScreen {
    fn show_start_screen(&mut self, difficulty: Difficulty, blink_on: bool) {
        self.set_screen(Screen::Start {
            difficulty,
            blink_on,
        });
    }

    fn show_game_screen(&mut self, grid: &Grid, cursor: (u8, u8), timer_secs: u16) {
        self.set_screen(Screen::Game(BoardView::snapshot(grid, cursor, timer_secs)));
    }

    fn show_pause_menu(&mut self, selection: PauseOption) {
        self.set_screen(Screen::Pause(selection));
    }

    fn show_game_over(&mut self) {
        self.banner = Some(Banner::GameOver);
    }

    fn show_you_win(&mut self) {
        self.banner = Some(Banner::YouWin);
    }

    fn show_high_score_entry(
        &mut self,
        timer_secs: u16,
        initials: &str,
        char_pos: usize,
        candidate: char,
    ) {
        self.set_screen(Screen::Entry {
            timer_secs,
            initials: initials.to_string(),
            char_pos,
            candidate,
        });
    }

    fn show_high_scores(&mut self, table: &ScoreTable, difficulty: Difficulty) {
        let rows = table
            .entries(difficulty)
            .iter()
            .map(|entry| (entry.initials.clone(), entry.time))
            .collect();

        self.set_screen(Screen::Scores { difficulty, rows });
    }

    fn explosion_plan(&mut self, _grid: &Grid, cursor: (u8, u8)) -> ExplosionPlan {
        // The plan's coordinates are board cells: `(x, y)` with the clicked cell as the center and
        // the radii growing one ring per frame.
        ExplosionPlan {
            center: (cursor.1 as u16, cursor.0 as u16),
            radii: vec![1, 2, 3, 4],
            colors: vec![0xFF8000, 0xFF0000, 0xFFFF00, 0xFF8000],
        }
    }

    fn draw_explosion_frame(&mut self, center: (u16, u16), radius: u16, color: Rgb) -> ElementId {
        let id = self.next_element_id;
        self.next_element_id += 1;

        self.flash = Some(Flash {
            center,
            radius,
            color,
            id,
        });

        id
    }

    fn remove_element(&mut self, id: ElementId) {
        if self.flash.map_or(false, |flash| flash.id == id) {
            self.flash = None;
        }
    }

    fn present(&mut self) {
        // destructure so the closure borrows the buffered state and the terminal independently
        let Self {
            terminal,
            screen,
            banner,
            flash,
            ..
        } = self;

        let banner = *banner;
        let flash = *flash;

        let _ = terminal.draw(|frame| render(screen, banner, flash, frame));
    }
}

fn render(screen: &Screen, banner: Option<Banner>, flash: Option<Flash>, frame: &mut Frame) {
    let root = frame.size();
    frame.render_widget(Block::default().bg(APP_BG_COLOR), root);

    match screen {
        Screen::Blank => {}
        Screen::Start {
            difficulty,
            blink_on,
        } => render_start(frame, *difficulty, *blink_on),
        Screen::Game(view) => render_game(frame, view, flash),
        Screen::Pause(selection) => render_pause(frame, *selection),
        Screen::Entry {
            timer_secs,
            initials,
            char_pos,
            candidate,
        } => render_entry(frame, *timer_secs, initials, *char_pos, *candidate),
        Screen::Scores { difficulty, rows } => render_scores(frame, *difficulty, rows),
    };

    if let Some(banner) = banner {
        let (text, border_color) = match banner {
            Banner::GameOver => (GAME_OVER_POPUP_TEXT, GAME_OVER_BORDER_COLOR),
            Banner::YouWin => (YOU_WIN_POPUP_TEXT, YOU_WIN_BORDER_COLOR),
        };

        render_popup(frame, text.map(|line| line.to_string()), border_color);
    }
}

fn render_start(frame: &mut Frame, difficulty: Difficulty, blink_on: bool) {
    let prompt = if blink_on { PROMPT_TEXT } else { "" };

    let mut lines = vec![
        Line::styled(TITLE_TEXT, Style::default().fg(TITLE_COLOR).bold()),
        Line::default(),
        Line::styled(
            format!("< {} >", difficulty.label()),
            Style::default().fg(SELECTION_COLOR),
        ),
        Line::default(),
        Line::styled(prompt, Style::default().fg(REGULAR_TEXT_COLOR)),
        Line::default(),
    ];
    lines.extend(
        START_LEGEND_TEXT.map(|legend| Line::styled(legend, Style::default().fg(DIM_TEXT_COLOR))),
    );

    let container = centered_rect(frame.size(), 40, lines.len() as u16);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        container,
    );
}

fn render_game(frame: &mut Frame, view: &BoardView, flash: Option<Flash>) {
    let board_width = view.cols as u16 * CELL_WIDTH + 2;
    let board_height = view.rows as u16 + 2;

    // stack the status bar, the bordered board and the legend vertically, centered as a group
    let root = frame.size();
    let group_height = 1 + board_height + 1;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            root.height.saturating_sub(group_height) / 2,
            1,
            board_height,
            1,
        ]))
        .split(root);

    let status_container = centered_rect(vertical[1], board_width, 1);
    let board_container = centered_rect(vertical[2], board_width, board_height);
    let legend_container = vertical[3];

    let status = Line::from(vec![
        Span::styled(
            format!("MINES {:>3}", view.mine_counter),
            Style::default().fg(FLAG_COLOR),
        ),
        Span::raw(" ".repeat(board_width.saturating_sub(18) as usize)),
        Span::styled(
            format!("TIME {:>3}", view.timer_secs),
            Style::default().fg(REGULAR_TEXT_COLOR),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), status_container);

    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BOARD_BORDER_COLOR)),
        board_container,
    );

    let grid_container = Rect {
        x: board_container.x + 1,
        y: board_container.y + 1,
        width: board_width - 2,
        height: board_height - 2,
    };

    let mut lines = Vec::with_capacity(view.rows as usize);
    for row in 0..view.rows {
        let mut spans = Vec::with_capacity(view.cols as usize);
        for col in 0..view.cols {
            let (symbol, color) = match view.glyph(row, col) {
                CellGlyph::Closed => (CLOSED_CELL_SYMBOL.to_string(), CLOSED_CELL_COLOR),
                CellGlyph::Flagged => (FLAG_SYMBOL.to_string(), FLAG_COLOR),
                CellGlyph::Mine => (MINE_SYMBOL.to_string(), MINE_COLOR),
                CellGlyph::Open(0) => (EMPTY_CELL_SYMBOL.to_string(), REGULAR_TEXT_COLOR),
                CellGlyph::Open(count) => {
                    (format!("{count} "), DIGIT_COLORS[count as usize])
                }
            };

            let mut style = Style::default().fg(color);
            if (row, col) == view.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            spans.push(Span::styled(symbol, style));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), grid_container);

    if let Some(flash) = flash {
        render_flash(frame, flash, grid_container);
    }

    frame.render_widget(
        Paragraph::new(GAME_LEGEND_TEXT)
            .fg(DIM_TEXT_COLOR)
            .alignment(Alignment::Center),
        legend_container,
    );
}

/// Paints one explosion ring as a solid block over the board. The flash coordinates are board
/// cells; they get scaled to terminal cells and clamped to the board's rectangle.
fn render_flash(frame: &mut Frame, flash: Flash, grid_container: Rect) {
    let center_x = grid_container.x + flash.center.0 * CELL_WIDTH + CELL_WIDTH / 2;
    let center_y = grid_container.y + flash.center.1;

    let half_width = flash.radius * CELL_WIDTH;
    let half_height = flash.radius;

    let area = Rect {
        x: center_x.saturating_sub(half_width),
        y: center_y.saturating_sub(half_height),
        width: half_width * 2 + 1,
        height: half_height * 2 + 1,
    }
    .intersection(grid_container);

    frame.render_widget(Block::default().bg(rgb_color(flash.color)), area);
}

fn render_pause(frame: &mut Frame, selection: PauseOption) {
    let option_line = |option: PauseOption, label: &str| {
        if selection == option {
            Line::styled(format!("> {label} <"), Style::default().fg(SELECTION_COLOR))
        } else {
            Line::styled(label.to_string(), Style::default().fg(REGULAR_TEXT_COLOR))
        }
    };

    let lines = vec![
        Line::styled(PAUSE_POPUP_TITLE, Style::default().fg(TITLE_COLOR).bold()),
        Line::default(),
        option_line(PauseOption::Resume, "RESUME"),
        option_line(PauseOption::Quit, "QUIT"),
    ];

    let container = centered_rect(frame.size(), 20, lines.len() as u16 + 2);
    frame.render_widget(Clear, container);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(PAUSE_BORDER_COLOR)),
        ),
        container,
    );
}

fn render_entry(
    frame: &mut Frame,
    timer_secs: u16,
    initials: &str,
    char_pos: usize,
    candidate: char,
) {
    // the three slots: committed characters, the candidate in the edited slot, dashes after it
    let mut slots = Vec::with_capacity(3);
    for pos in 0..3 {
        let (symbol, style) = if pos < char_pos {
            (
                initials.chars().nth(pos).unwrap_or('-'),
                Style::default().fg(REGULAR_TEXT_COLOR),
            )
        } else if pos == char_pos {
            (
                candidate,
                Style::default()
                    .fg(SELECTION_COLOR)
                    .add_modifier(Modifier::REVERSED),
            )
        } else {
            ('-', Style::default().fg(DIM_TEXT_COLOR))
        };

        slots.push(Span::styled(format!(" {symbol} "), style));
    }

    let lines = vec![
        Line::styled("NEW HIGH SCORE!", Style::default().fg(TITLE_COLOR).bold()),
        Line::default(),
        Line::styled(
            format!("TIME {timer_secs:>3}"),
            Style::default().fg(REGULAR_TEXT_COLOR),
        ),
        Line::default(),
        Line::from(slots),
        Line::default(),
        Line::styled(
            "[↑][↓] pick a letter, [SPACE] confirm",
            Style::default().fg(DIM_TEXT_COLOR),
        ),
    ];

    let container = centered_rect(frame.size(), 40, lines.len() as u16);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        container,
    );
}

fn render_scores(frame: &mut Frame, difficulty: Difficulty, rows: &[(String, u16)]) {
    let mut lines = vec![
        Line::styled(
            format!("HIGH SCORES · {}", difficulty.label()),
            Style::default().fg(TITLE_COLOR).bold(),
        ),
        Line::default(),
    ];

    for (rank, (initials, time)) in rows.iter().enumerate() {
        lines.push(Line::styled(
            format!("{}. {initials}  {time:>3}", rank + 1),
            Style::default().fg(REGULAR_TEXT_COLOR),
        ));
    }

    let container = centered_rect(frame.size(), 30, lines.len() as u16);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        container,
    );
}

/// Builds a centered popup out of the given lines, sized to its contents, and renders it on top of
/// whatever is already on the frame.
fn render_popup(frame: &mut Frame, lines: impl IntoIterator<Item = String>, border_color: Color) {
    let lines: Vec<String> = lines.into_iter().collect();
    let width = lines.iter().map(|line| line.len()).max().unwrap_or(0) as u16 + 6;
    let height = lines.len() as u16 + 2;

    let container = centered_rect(frame.size(), width, height);

    let text = Paragraph::new(lines.join("\n"))
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .bg(APP_BG_COLOR)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        );

    frame.render_widget(Clear, container);
    frame.render_widget(text, container);
}

/// A rectangle of the requested size in the middle of the container (clamped to it).
fn centered_rect(container: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(container.width);
    let height = height.min(container.height);

    Rect {
        x: container.x + (container.width - width) / 2,
        y: container.y + (container.height - height) / 2,
        width,
        height,
    }
}

/// Maps a packed `0xRRGGBB` color onto the terminal's RGB color space.
fn rgb_color(color: Rgb) -> Color {
    Color::Rgb((color >> 16) as u8, (color >> 8) as u8, color as u8)
}
