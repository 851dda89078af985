mod loader;

pub use loader::{
    DEFAULT_QUESTIONS_PATH, LoadError, LoadOptions, QuestionSource, load, normalize_record,
    parse_questions,
};
