//! # quizmaster
//!
//! Timed multiple-choice quiz sessions over a categorized question bank.
//!
//! Questions are shown in random order with shuffled options, each answer is
//! collected under a deadline, and every finished session is appended to a
//! CSV result file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quizmaster::{AnswerCollector, CsvResultStore, PresentationShuffler, Quiz, QuizEngine, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Load and validate the question bank
//!     let quiz = Quiz::from_json("questions.json")?;
//!
//!     let mut engine = QuizEngine::new(
//!         PresentationShuffler::from_entropy(),
//!         AnswerCollector::stdin()?,
//!         CsvResultStore::new("results.csv"),
//!     );
//!
//!     // Ask for a category and play on stdin/stdout
//!     quiz.run_console(&mut engine, std::io::stdout(), None).await
//! }
//! ```

mod app;
pub mod config;
mod console;
mod data;
pub mod engine;
mod error;
mod models;
pub mod terminal;
mod ui;

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use rand::Rng;

pub use app::App;
pub use console::ConsoleView;
pub use data::{
    load_questions_from_json, parse_questions, CsvResultStore,
    MemoryResultStore, ResultRow, ResultStore, DEFAULT_QUESTIONS_PATH, DEFAULT_RESULTS_PATH,
    RESULT_HEADER,
};
pub use engine::{
    feedback, parse_choice, AnswerCollector, AnswerFeed, Collected, PresentationShuffler,
    QuizEngine, SessionReport, SessionScorer, SessionView,
};
pub use error::{LoadError, PersistenceError, QuizError, RecordError};
pub use models::{
    option_label, AppState, Category, CategoryBank, FeedbackBand, PresentedQuestion, Question,
    SessionOutcome, SessionSummary, SkippedRecord, MAX_OPTIONS, TIMESTAMP_FORMAT,
};

/// How often the terminal front-end redraws while waiting for keys.
const TICK: Duration = Duration::from_millis(100);

/// A loaded question bank, ready to be played.
pub struct Quiz {
    bank: CategoryBank,
}

impl Quiz {
    /// Create a quiz from an already validated bank.
    pub fn new(bank: CategoryBank) -> Self {
        Self { bank }
    }

    /// Load a quiz from a JSON file.
    ///
    /// Fails when the file is unreadable, malformed, or holds no valid
    /// category. Individual invalid questions are skipped.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quizmaster::Quiz;
    ///
    /// let quiz = Quiz::from_json("questions.json").expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let path = path.as_ref();
        let bank = load_questions_from_json(path)?;
        if bank.is_empty() {
            return Err(QuizError::EmptyBank(path.to_path_buf()));
        }
        Ok(Self::new(bank))
    }

    pub fn bank(&self) -> &CategoryBank {
        &self.bank
    }

    /// Play sessions with line prompts written to `out`.
    pub async fn run_console<S, R, W>(
        &self,
        engine: &mut QuizEngine<S, R>,
        out: W,
        start: Option<&str>,
    ) -> Result<(), QuizError>
    where
        S: ResultStore,
        R: Rng,
        W: Write,
    {
        let mut view = ConsoleView::new(out);
        console::run(&self.bank, engine, &mut view, start).await
    }

    /// Run the full-screen terminal front-end until the user quits.
    pub fn run_tui<S: ResultStore>(
        &self,
        shuffler: PresentationShuffler<StdRng>,
        store: S,
        time_limit: Duration,
        start: Option<&str>,
    ) -> Result<(), QuizError> {
        let mut app = App::new(&self.bank, shuffler, store).with_time_limit(time_limit);
        if let Some(name) = start {
            if !app.select_category_named(name) {
                return Err(QuizError::UnknownCategory(name.to_string()));
            }
            app.start_quiz(Instant::now());
        }

        let mut guard = terminal::TerminalGuard::enter()?;
        run_event_loop(guard.terminal(), &mut app)
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| ui::render(frame, app, now))?;
        // Only after the summary has been drawn.
        app.persist_pending();

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code, Instant::now()) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match app.state {
        AppState::Menu => handle_menu_input(app, key, now),
        AppState::Quiz => handle_quiz_input(app, key, now),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_menu_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_category();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_category();
            false
        }
        KeyCode::Enter => {
            app.start_quiz(now);
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Up => {
            app.select_previous_option();
            false
        }
        KeyCode::Down => {
            app.select_next_option();
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_selected(now);
            false
        }
        KeyCode::Char(c) => {
            app.submit_key(c, now);
            false
        }
        KeyCode::Esc => true,
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}
