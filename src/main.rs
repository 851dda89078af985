use std::path::PathBuf;

use clap::Parser;
use range_quiz::config::{DEFAULT_END, DEFAULT_START, parse_end, parse_start};
use range_quiz::{DEFAULT_QUESTIONS_PATH, LoadOptions, QuestionSource, Quiz, QuizConfig, logging};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file or http(s) URL to load the questions from
    #[arg(short, long, env = "QUIZ_QUESTIONS", default_value = DEFAULT_QUESTIONS_PATH)]
    questions: String,

    /// First question of the range (1-based)
    #[arg(
        short,
        long,
        env = "QUIZ_START",
        default_value_t = DEFAULT_START.to_string(),
        allow_hyphen_values = true
    )]
    start: String,

    /// Last question of the range (inclusive)
    #[arg(
        short,
        long,
        env = "QUIZ_END",
        default_value_t = DEFAULT_END.to_string(),
        allow_hyphen_values = true
    )]
    end: String,

    /// Skip questions whose correct answer is not one of their choices
    #[arg(long, env = "QUIZ_STRICT")]
    strict: bool,

    /// Append diagnostic logs to this file
    #[arg(long, env = "QUIZ_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl From<Args> for QuizConfig {
    fn from(args: Args) -> Self {
        Self {
            source: QuestionSource::from_input(&args.questions),
            start: parse_start(&args.start),
            end: parse_end(&args.end),
            load_options: LoadOptions {
                strict: args.strict,
            },
            log_file: args.log_file,
        }
    }
}

#[tokio::main]
async fn main() {
    let config = QuizConfig::from(Args::parse());

    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = Quiz::new(config).run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> QuizConfig {
        let argv = std::iter::once("range-quiz").chain(args.iter().copied());
        QuizConfig::from(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults_without_flags() {
        let config = config(&[]);
        assert_eq!(config.source, QuestionSource::default());
        assert_eq!(config.start, DEFAULT_START);
        assert_eq!(config.end, DEFAULT_END);
        assert!(!config.load_options.strict);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn blank_questions_flag_uses_default_path() {
        assert_eq!(config(&["--questions", "  "]).source, QuestionSource::default());
    }

    #[test]
    fn negative_start_is_accepted_as_a_value() {
        let config = config(&["--start", "-3", "-e", "0"]);
        assert_eq!(config.start, -3);
        assert_eq!(config.end, DEFAULT_END);
    }

    #[test]
    fn flags_map_onto_config() {
        let config = config(&[
            "-q",
            "https://example.com/q.json",
            "-s",
            "5",
            "--end",
            "7x",
            "--strict",
            "--log-file",
            "quiz.log",
        ]);
        assert_eq!(
            config.source,
            QuestionSource::Url("https://example.com/q.json".to_string())
        );
        assert_eq!(config.start, 5);
        assert_eq!(config.end, 7);
        assert!(config.load_options.strict);
        assert_eq!(config.log_file, Some(PathBuf::from("quiz.log")));
    }
}
