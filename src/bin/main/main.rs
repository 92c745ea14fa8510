pub mod term_input;
pub mod term_screen;

use clap::Parser;
use color_eyre::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use pocket_mines::{ScoreLedger, Session, TICK_PERIOD};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use std::time::Instant;
use term_input::TermInput;
use term_screen::TermScreen;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where the leaderboard is persisted.
    #[arg(short, long, default_value = "high_scores.json")]
    scores: PathBuf,
    /// Fix the mine placement for reproducible boards.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    // Initialize the terminal user interface.
    enter_terminal()?;
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;

    // Assemble the session out of its collaborators.
    let ledger = ScoreLedger::load(args.scores);
    let input = TermInput::new();
    let presenter = TermScreen::new(terminal);

    let mut session = match args.seed {
        Some(seed) => Session::with_seed(input, presenter, ledger, seed),
        None => Session::new(input, presenter, ledger),
    };

    // Start the main loop: one tick per period, with the sleep absorbing the tick's own cost.
    while !session.input().quit_requested() {
        let tick_started = Instant::now();
        session.tick(tick_started);
        std::thread::sleep(TICK_PERIOD.saturating_sub(tick_started.elapsed()));
    }

    // Exit the user interface.
    leave_terminal()?;
    Ok(())
}

fn enter_terminal() -> Result<()> {
    terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stderr(), EnterAlternateScreen)?;

    // restore the terminal even when the process dies mid-frame
    let panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = leave_terminal();
        panic_hook(panic);
    }));

    Ok(())
}

fn leave_terminal() -> Result<()> {
    crossterm::execute!(std::io::stderr(), LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}
