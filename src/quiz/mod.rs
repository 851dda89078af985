//! Quiz progression: range selection and the scoring state machine.

mod engine;
mod range;

pub use engine::{
    ChoiceBadge, EngineError, EngineState, Feedback, MissRecord, QuizEngine, QuizResults,
    QuizSession,
};
pub use range::{QuizRange, RangeError, select_range};
