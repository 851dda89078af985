//! The quiz state machine.
//!
//! ```text
//! NotStarted -> Unanswered -> Answered -> Unanswered -> ... -> Finished
//! ```
//!
//! [`QuizEngine::reset`] returns to `NotStarted` from any state.

use std::fmt;

use thiserror::Error;

use crate::models::{Choices, Question};

use super::range::{QuizRange, RangeError};

/// Misuse of the engine by its caller.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("the current question has already been answered")]
    AlreadyAnswered,

    #[error("no question at the current position")]
    OutOfRange,

    #[error("cannot start a quiz without questions")]
    NoQuestions,

    #[error("no quiz is in progress")]
    NotInProgress,

    #[error("the current question has not been answered yet")]
    NotAnswered,

    #[error("the quiz has not finished")]
    NotFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    /// Waiting for an answer to the current question.
    Unanswered,
    /// The current question was answered and feedback is showing.
    Answered,
    Finished,
}

/// Outcome of a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong {
        chosen_key: String,
        correct_key: String,
        /// `None` when the correct key is not among the choices.
        correct_text: Option<String>,
    },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => f.write_str("Correct"),
            Self::Wrong {
                correct_key,
                correct_text,
                ..
            } => write!(
                f,
                "Wrong. Correct: {}. {}",
                correct_key,
                correct_text.as_deref().unwrap_or("")
            ),
        }
    }
}

/// How a choice relates to a missed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceBadge {
    Correct,
    YourChoice,
    None,
}

/// Snapshot of a wrongly answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissRecord {
    pub question: String,
    pub page: String,
    pub choices: Choices,
    pub chosen_key: String,
    pub correct_key: String,
}

impl MissRecord {
    fn capture(question: &Question, chosen_key: &str) -> Self {
        Self {
            question: question.text.clone(),
            page: question.page.clone(),
            choices: question.choices.clone(),
            chosen_key: chosen_key.to_string(),
            correct_key: question.correct_key.clone(),
        }
    }

    pub fn chosen_text(&self) -> &str {
        self.choices.get(&self.chosen_key).unwrap_or("")
    }

    pub fn correct_text(&self) -> &str {
        self.choices.get(&self.correct_key).unwrap_or("")
    }

    /// The correct key wins when it is also the chosen one.
    pub fn badge(&self, key: &str) -> ChoiceBadge {
        if key == self.correct_key {
            ChoiceBadge::Correct
        } else if key == self.chosen_key {
            ChoiceBadge::YourChoice
        } else {
            ChoiceBadge::None
        }
    }
}

/// Final summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResults<'a> {
    pub correct_count: usize,
    pub wrong_count: usize,
    pub range: QuizRange,
    pub missed: &'a [MissRecord],
}

impl QuizResults<'_> {
    pub fn total(&self) -> usize {
        self.correct_count + self.wrong_count
    }

    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total > 0 {
            (self.correct_count as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Mutable progress of one quiz run.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    all_questions: Vec<Question>,
    selected_range: Option<QuizRange>,
    active_questions: Vec<Question>,
    cursor: usize,
    correct_count: usize,
    wrong_count: usize,
    missed: Vec<MissRecord>,
    answer_locked: bool,
}

impl QuizSession {
    pub fn all_questions(&self) -> &[Question] {
        &self.all_questions
    }

    pub fn selected_range(&self) -> Option<QuizRange> {
        self.selected_range
    }

    pub fn active_questions(&self) -> &[Question] {
        &self.active_questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn wrong_count(&self) -> usize {
        self.wrong_count
    }

    pub fn missed(&self) -> &[MissRecord] {
        &self.missed
    }

    pub fn answer_locked(&self) -> bool {
        self.answer_locked
    }

    /// Clears everything except the loaded pool.
    fn clear_progress(&mut self) {
        self.selected_range = None;
        self.active_questions.clear();
        self.cursor = 0;
        self.correct_count = 0;
        self.wrong_count = 0;
        self.missed.clear();
        self.answer_locked = false;
    }
}

/// Drives a [`QuizSession`] through its states.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    session: QuizSession,
    state: EngineState,
    feedback: Option<Feedback>,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEngine {
    pub fn new() -> Self {
        Self {
            session: QuizSession::default(),
            state: EngineState::NotStarted,
            feedback: None,
        }
    }

    /// Create an engine with an already loaded question pool.
    pub fn with_pool(questions: Vec<Question>) -> Self {
        let mut engine = Self::new();
        engine.load_pool(questions);
        engine
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Feedback for the current question while it is answered.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Replace the question pool. Any session in progress is discarded.
    pub fn load_pool(&mut self, questions: Vec<Question>) {
        self.reset();
        self.session.all_questions = questions;
    }

    pub fn pool(&self) -> &[Question] {
        &self.session.all_questions
    }

    /// Select `range` from the loaded pool and start on it.
    pub fn begin(&mut self, range: QuizRange) -> Result<(), RangeError> {
        let selected = range.select(&self.session.all_questions)?.to_vec();
        self.activate(selected, range);
        Ok(())
    }

    /// Start a session over `questions`, recording `range` for the summary.
    pub fn start(&mut self, questions: Vec<Question>, range: QuizRange) -> Result<(), EngineError> {
        if questions.is_empty() {
            return Err(EngineError::NoQuestions);
        }
        self.activate(questions, range);
        Ok(())
    }

    fn activate(&mut self, questions: Vec<Question>, range: QuizRange) {
        self.session.clear_progress();
        self.session.selected_range = Some(range);
        self.session.active_questions = questions;
        self.feedback = None;
        self.state = EngineState::Unanswered;

        tracing::info!(
            %range,
            questions = self.session.active_questions.len(),
            "quiz started"
        );
    }

    pub fn current_question(&self) -> Result<&Question, EngineError> {
        self.session
            .active_questions
            .get(self.session.cursor)
            .ok_or(EngineError::OutOfRange)
    }

    /// 1-based number of the current question.
    pub fn question_number(&self) -> usize {
        self.session.cursor + 1
    }

    pub fn total_questions(&self) -> usize {
        self.session.active_questions.len()
    }

    /// Score `key` against the current question and lock it.
    pub fn submit_answer(&mut self, key: &str) -> Result<&Feedback, EngineError> {
        match self.state {
            EngineState::Unanswered => {}
            EngineState::Answered => return Err(EngineError::AlreadyAnswered),
            EngineState::NotStarted | EngineState::Finished => {
                return Err(EngineError::NotInProgress);
            }
        }
        if self.session.answer_locked {
            return Err(EngineError::AlreadyAnswered);
        }

        let question = self
            .session
            .active_questions
            .get(self.session.cursor)
            .ok_or(EngineError::OutOfRange)?;

        let feedback = if key == question.correct_key {
            self.session.correct_count += 1;
            Feedback::Correct
        } else {
            let record = MissRecord::capture(question, key);
            let feedback = Feedback::Wrong {
                chosen_key: key.to_string(),
                correct_key: question.correct_key.clone(),
                correct_text: question.correct_text().map(str::to_string),
            };
            self.session.wrong_count += 1;
            self.session.missed.push(record);
            feedback
        };

        tracing::debug!(
            question = self.session.cursor + 1,
            chosen = key,
            correct = feedback.is_correct(),
            "answer submitted"
        );

        self.session.answer_locked = true;
        self.state = EngineState::Answered;
        Ok(&*self.feedback.insert(feedback))
    }

    /// Move past an answered question.
    pub fn advance(&mut self) -> Result<EngineState, EngineError> {
        match self.state {
            EngineState::Answered => {}
            EngineState::Unanswered => return Err(EngineError::NotAnswered),
            EngineState::NotStarted | EngineState::Finished => {
                return Err(EngineError::NotInProgress);
            }
        }

        self.session.cursor += 1;
        self.feedback = None;

        if self.session.cursor >= self.session.active_questions.len() {
            self.state = EngineState::Finished;
            tracing::info!(
                correct = self.session.correct_count,
                wrong = self.session.wrong_count,
                "quiz finished"
            );
        } else {
            self.session.answer_locked = false;
            self.state = EngineState::Unanswered;
        }

        Ok(self.state)
    }

    /// Back to `NotStarted`, keeping the loaded pool.
    pub fn reset(&mut self) {
        self.session.clear_progress();
        self.feedback = None;
        self.state = EngineState::NotStarted;
        tracing::debug!("quiz reset");
    }

    pub fn results(&self) -> Result<QuizResults<'_>, EngineError> {
        if self.state != EngineState::Finished {
            return Err(EngineError::NotFinished);
        }
        let range = self.session.selected_range.ok_or(EngineError::NotFinished)?;

        Ok(QuizResults {
            correct_count: self.session.correct_count,
            wrong_count: self.session.wrong_count,
            range,
            missed: &self.session.missed,
        })
    }
}
