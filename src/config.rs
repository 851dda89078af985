//! User-supplied quiz settings and the parsing rules for form input.

use std::path::PathBuf;

use crate::data::{LoadOptions, QuestionSource};

pub const DEFAULT_START: i64 = 1;
pub const DEFAULT_END: i64 = 30;

/// Settings collected before a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub source: QuestionSource,
    pub start: i64,
    pub end: i64,
    pub load_options: LoadOptions,
    pub log_file: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            source: QuestionSource::default(),
            start: DEFAULT_START,
            end: DEFAULT_END,
            load_options: LoadOptions::default(),
            log_file: None,
        }
    }
}

impl QuizConfig {
    /// Build a config from raw text inputs, applying the same fallbacks as
    /// the start form.
    pub fn from_inputs(source: &str, start: &str, end: &str) -> Self {
        Self {
            source: QuestionSource::from_input(source),
            start: parse_start(start),
            end: parse_end(end),
            ..Self::default()
        }
    }
}

/// Parse the start index, falling back to [`DEFAULT_START`].
pub fn parse_start(input: &str) -> i64 {
    parse_index(input).unwrap_or(DEFAULT_START)
}

/// Parse the end index, falling back to [`DEFAULT_END`].
pub fn parse_end(input: &str) -> i64 {
    parse_index(input).unwrap_or(DEFAULT_END)
}

/// Read a leading integer (`"12abc"` is 12). Zero counts as missing.
fn parse_index(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };

    (value != 0).then_some(value)
}
