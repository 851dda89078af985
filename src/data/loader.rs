use std::fmt;
use std::path::PathBuf;

use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Choices, Question};

pub const DEFAULT_QUESTIONS_PATH: &str = "./questions.json";

const NON_ARRAY_ROOT: &str = "JSON root must be an array: [ {...}, {...} ]";

/// Errors raised while loading a question source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be fetched (missing file, transport failure or a
    /// non-success HTTP status).
    #[error("Cannot load questions from {location} ({reason}). Check path or run a local server.")]
    SourceUnavailable { location: String, reason: String },

    /// The payload is not a JSON array of records.
    #[error("{0}")]
    MalformedSource(String),

    /// Every record was filtered out during normalization.
    #[error("No valid questions found in JSON.")]
    NoValidQuestions,
}

/// Where questions are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    File(PathBuf),
    Url(String),
}

impl QuestionSource {
    /// Interpret user input. Blank input falls back to
    /// [`DEFAULT_QUESTIONS_PATH`]; `http://` and `https://` prefixes select a
    /// remote fetch.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        let location = if trimmed.is_empty() {
            DEFAULT_QUESTIONS_PATH
        } else {
            trimmed
        };

        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl Default for QuestionSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_QUESTIONS_PATH))
    }
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Knobs for normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop questions whose correct key is not one of their choices.
    pub strict: bool,
}

/// Record as it appears in the source document. Every field is optional and
/// may hold any JSON type.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    page: Value,
    #[serde(default)]
    question: Value,
    #[serde(default)]
    answer: Value,
    #[serde(default)]
    correct_answer: Value,
}

/// Fetch, parse and normalize questions. Every call re-reads the source.
pub async fn load(
    source: &QuestionSource,
    options: LoadOptions,
) -> Result<Vec<Question>, LoadError> {
    tracing::info!(%source, strict = options.strict, "loading questions");

    let body = fetch(source).await?;
    let questions = parse_questions(&body, options)?;

    tracing::info!(%source, count = questions.len(), "loaded questions");
    Ok(questions)
}

async fn fetch(source: &QuestionSource) -> Result<String, LoadError> {
    let unavailable = |reason: String| LoadError::SourceUnavailable {
        location: source.to_string(),
        reason,
    };

    match source {
        QuestionSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|err| unavailable(err.to_string())),
        QuestionSource::Url(url) => {
            let response = reqwest::Client::new()
                .get(url)
                .header(CACHE_CONTROL, "no-store")
                .send()
                .await
                .map_err(|err| unavailable(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(unavailable(status.to_string()));
            }

            response.text().await.map_err(|err| unavailable(err.to_string()))
        }
    }
}

/// Parse a JSON document into normalized, filtered questions.
pub fn parse_questions(json: &str, options: LoadOptions) -> Result<Vec<Question>, LoadError> {
    let root: Value = serde_json::from_str(json)
        .map_err(|err| LoadError::MalformedSource(format!("Invalid JSON: {}", err)))?;

    let Value::Array(records) = root else {
        return Err(LoadError::MalformedSource(NON_ARRAY_ROOT.to_string()));
    };

    let total = records.len();
    let questions: Vec<Question> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (index, normalize_record(record)))
        .filter(|(index, question)| retain(*index, question, options))
        .map(|(_, question)| question)
        .collect();

    if total != questions.len() {
        tracing::info!(
            dropped = total - questions.len(),
            total,
            "skipped records that failed validation"
        );
    }

    if questions.is_empty() {
        return Err(LoadError::NoValidQuestions);
    }

    Ok(questions)
}

fn retain(index: usize, question: &Question, options: LoadOptions) -> bool {
    if !question.is_well_formed() {
        tracing::debug!(record = index, "dropping incomplete record");
        return false;
    }

    if !question.is_answerable() {
        tracing::warn!(
            record = index,
            correct_key = %question.correct_key,
            strict = options.strict,
            "correct answer is not among the choices"
        );
        return !options.strict;
    }

    true
}

/// Coerce one raw record into a [`Question`] without validating it.
///
/// Records that are not JSON objects normalize to an empty question.
pub fn normalize_record(record: &Value) -> Question {
    let raw = if record.is_object() {
        RawRecord::deserialize(record).unwrap_or_default()
    } else {
        RawRecord::default()
    };

    let choices = match &raw.answer {
        Value::Object(map) => map
            .iter()
            .map(|(key, text)| (key.clone(), coerce_text(text)))
            .collect(),
        _ => Choices::new(),
    };

    Question {
        page: coerce_text(&raw.page),
        text: coerce_text(&raw.question),
        choices,
        correct_key: coerce_text(&raw.correct_answer).trim().to_string(),
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        // Integral floats such as `4.0` or `1e2` print without a fraction.
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                number.as_f64().map(|float| float.to_string()).unwrap_or_default()
            }
        }
        // Booleans and compound values use their JSON text.
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
