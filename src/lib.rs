//! # range-quiz
//!
//! A terminal quiz runner. Questions are loaded from a JSON array, a
//! contiguous 1-based range of them is selected, and each one is asked in
//! turn with its choices shown in source order. The final screen lists every
//! missed question.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use range_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::new(QuizConfig::from_inputs("questions.json", "1", "30"));
//!     quiz.run().await
//! }
//! ```
//!
//! The engine can also be driven without a terminal:
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), range_quiz::QuizError> {
//! use range_quiz::{QuizConfig, prepare_session};
//!
//! let mut engine = prepare_session(&QuizConfig::default()).await?;
//! let key = engine.current_question()?.correct_key.clone();
//! engine.submit_answer(&key)?;
//! engine.advance()?;
//! # Ok(())
//! # }
//! ```

mod app;
pub mod config;
mod data;
pub mod logging;
mod models;
mod quiz;
pub mod terminal;
mod ui;

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;

pub use app::{App, FormField, StartForm, StartRequest};
pub use config::QuizConfig;
pub use data::{
    DEFAULT_QUESTIONS_PATH, LoadError, LoadOptions, QuestionSource, load, normalize_record,
    parse_questions,
};
pub use models::{AppState, Choice, Choices, Question};
pub use quiz::{
    ChoiceBadge, EngineError, EngineState, Feedback, MissRecord, QuizEngine, QuizRange,
    QuizResults, QuizSession, RangeError, select_range,
};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid range: {0}")]
    Range(#[from] RangeError),

    #[error("Quiz engine misuse: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Validate the configured range, load the source and start a session on
/// the selected slice. Range bounds are checked before anything is fetched.
pub async fn prepare_session(config: &QuizConfig) -> Result<QuizEngine, QuizError> {
    let range = QuizRange::new(config.start, config.end)?;
    let questions = load(&config.source, config.load_options).await?;

    let mut engine = QuizEngine::with_pool(questions);
    engine.begin(range)?;
    Ok(engine)
}

/// A quiz that runs in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            app: App::new(&config),
        }
    }

    /// Take over the terminal until the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app).await;
        terminal::restore()?;
        result
    }
}

/// What the event loop should do after a key press.
enum Action {
    None,
    Load(StartRequest),
    Quit,
}

async fn run_event_loop(
    terminal: &mut terminal::QuizTerminal,
    app: &mut App,
) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(app, key.code) {
            Action::None => {}
            Action::Quit => break,
            Action::Load(request) => {
                // Show the loading line before the fetch suspends us.
                terminal.draw(|frame| ui::render(frame, app))?;
                let loaded = load(&request.source, app.load_options()).await;
                app.complete_start(&request, loaded);
            }
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    match app.state {
        AppState::Start => handle_start_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_start_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => match app.request_start() {
            Some(request) => Action::Load(request),
            None => Action::None,
        },
        KeyCode::Tab | KeyCode::Down => {
            app.focus_next();
            Action::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.focus_previous();
            Action::None
        }
        KeyCode::Backspace => {
            app.input_pop();
            Action::None
        }
        KeyCode::Char(c) => {
            app.input_push(c);
            Action::None
        }
        KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_choice(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_choice(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.select_choice(digit as usize - 1);
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm(),
        KeyCode::Char('n') | KeyCode::Char('N') => {
            if app.engine().state() == EngineState::Answered {
                app.next_question();
            }
        }
        KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('X') => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_screen_typing_does_not_quit() {
        let mut app = App::default();
        assert!(matches!(handle_input(&mut app, KeyCode::Char('q')), Action::None));
        assert_eq!(app.form().path, "./questions.jsonq");
        assert!(matches!(handle_input(&mut app, KeyCode::Esc), Action::Quit));
    }

    #[test]
    fn enter_on_valid_form_requests_load() {
        let mut app = App::default();
        match handle_input(&mut app, KeyCode::Enter) {
            Action::Load(request) => {
                assert_eq!(request.source, QuestionSource::default());
                assert_eq!(request.range.to_string(), "1-30");
            }
            _ => panic!("expected a load request"),
        }
        assert!(app.form().loading);
    }

    #[test]
    fn quiz_keys_drive_the_engine() {
        let mut app = App::default();
        let request = app.request_start().unwrap();
        let questions = parse_questions(
            r#"[{"question":"Q1","answer":{"A":"x","B":"y"},"correct_answer":"B"}]"#,
            LoadOptions::default(),
        );
        app.complete_start(&request, questions);
        assert_eq!(app.state, AppState::Quiz);

        handle_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.selected_choice(), 1);
        handle_input(&mut app, KeyCode::Enter);
        assert_eq!(app.engine().feedback(), Some(&Feedback::Correct));
        handle_input(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::Result);

        assert!(matches!(handle_input(&mut app, KeyCode::Char('r')), Action::None));
        assert_eq!(app.state, AppState::Start);
    }
}
