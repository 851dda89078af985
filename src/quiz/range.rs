use std::fmt;

use thiserror::Error;

use crate::models::Question;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Start must be at least 1")]
    InvalidStart,

    #[error("End must be greater than or equal to Start")]
    InvalidEnd,

    #[error("Start ({start}) is beyond available questions ({available})")]
    StartBeyondAvailable { start: i64, available: usize },

    #[error("No questions in selected range")]
    EmptyRange,
}

/// A 1-based inclusive window over the loaded question pool.
///
/// Construction checks the bounds against each other only; checks against
/// the pool happen in [`QuizRange::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRange {
    start: i64,
    end: i64,
}

impl QuizRange {
    pub fn new(start: i64, end: i64) -> Result<Self, RangeError> {
        if start < 1 {
            return Err(RangeError::InvalidStart);
        }
        if end < start {
            return Err(RangeError::InvalidEnd);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Slice `all` to this window. `end` is clamped to the pool size.
    pub fn select<'a>(&self, all: &'a [Question]) -> Result<&'a [Question], RangeError> {
        let available = all.len();
        let available_i64 = i64::try_from(available).unwrap_or(i64::MAX);

        if self.start > available_i64 {
            return Err(RangeError::StartBeyondAvailable {
                start: self.start,
                available,
            });
        }

        let from = usize::try_from(self.start.max(1) - 1).map_err(|_| RangeError::EmptyRange)?;
        let to = usize::try_from(self.end.min(available_i64)).map_err(|_| RangeError::EmptyRange)?;

        if from >= to {
            return Err(RangeError::EmptyRange);
        }

        let selected = &all[from..to];
        tracing::debug!(range = %self, selected = selected.len(), available, "selected range");
        Ok(selected)
    }
}

impl fmt::Display for QuizRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Validate `start`/`end` and slice `all` in one step.
pub fn select_range(all: &[Question], start: i64, end: i64) -> Result<&[Question], RangeError> {
    QuizRange::new(start, end)?.select(all)
}
