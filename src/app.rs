use crate::config::{QuizConfig, parse_end, parse_start};
use crate::data::{LoadError, LoadOptions, QuestionSource};
use crate::models::{AppState, Question};
use crate::quiz::{EngineState, QuizEngine, QuizRange};

/// Editable field on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Path,
    Start,
    End,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Path => Self::Start,
            Self::Start => Self::End,
            Self::End => Self::Path,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Path => Self::End,
            Self::Start => Self::Path,
            Self::End => Self::Start,
        }
    }
}

/// Raw text of the start screen inputs.
#[derive(Debug, Clone)]
pub struct StartForm {
    pub path: String,
    pub start: String,
    pub end: String,
    pub focus: FormField,
    pub error: Option<String>,
    pub loading: bool,
}

impl StartForm {
    fn from_config(config: &QuizConfig) -> Self {
        Self {
            path: config.source.to_string(),
            start: config.start.to_string(),
            end: config.end.to_string(),
            focus: FormField::Path,
            error: None,
            loading: false,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Path => &mut self.path,
            FormField::Start => &mut self.start,
            FormField::End => &mut self.end,
        }
    }
}

/// A validated start request waiting for its questions to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub source: QuestionSource,
    pub range: QuizRange,
}

/// Presenter state. Reads from the engine and forwards user actions to it.
pub struct App {
    pub state: AppState,
    form: StartForm,
    load_options: LoadOptions,
    engine: QuizEngine,
    selected_choice: usize,
    result_scroll: usize,
}

impl App {
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            state: AppState::Start,
            form: StartForm::from_config(config),
            load_options: config.load_options,
            engine: QuizEngine::new(),
            selected_choice: 0,
            result_scroll: 0,
        }
    }

    pub fn form(&self) -> &StartForm {
        &self.form
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn load_options(&self) -> LoadOptions {
        self.load_options
    }

    pub fn selected_choice(&self) -> usize {
        self.selected_choice
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn input_push(&mut self, c: char) {
        self.form.focused_mut().push(c);
    }

    pub fn input_pop(&mut self) {
        self.form.focused_mut().pop();
    }

    pub fn focus_next(&mut self) {
        self.form.focus = self.form.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.form.focus = self.form.focus.previous();
    }

    /// Validate the form. Returns the request to load, or records an inline
    /// error and stays on the start screen.
    pub fn request_start(&mut self) -> Option<StartRequest> {
        self.form.error = None;

        let start = parse_start(&self.form.start);
        let end = parse_end(&self.form.end);

        match QuizRange::new(start, end) {
            Ok(range) => {
                self.form.loading = true;
                Some(StartRequest {
                    source: QuestionSource::from_input(&self.form.path),
                    range,
                })
            }
            Err(err) => {
                self.form.error = Some(err.to_string());
                None
            }
        }
    }

    /// Finish a start request with the outcome of its load.
    pub fn complete_start(
        &mut self,
        request: &StartRequest,
        loaded: Result<Vec<Question>, LoadError>,
    ) {
        self.form.loading = false;

        let questions = match loaded {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(source = %request.source, error = %err, "load failed");
                self.form.error = Some(err.to_string());
                return;
            }
        };

        self.engine.load_pool(questions);
        if let Err(err) = self.engine.begin(request.range) {
            tracing::warn!(range = %request.range, error = %err, "range rejected");
            self.form.error = Some(err.to_string());
            return;
        }

        self.selected_choice = 0;
        self.state = AppState::Quiz;
    }

    fn choice_count(&self) -> usize {
        self.engine
            .current_question()
            .map(|question| question.choices.len())
            .unwrap_or(0)
    }

    pub fn select_next_choice(&mut self) {
        let count = self.choice_count();
        if count > 0 && self.engine.state() == EngineState::Unanswered {
            self.selected_choice = (self.selected_choice + 1) % count;
        }
    }

    pub fn select_previous_choice(&mut self) {
        let count = self.choice_count();
        if count > 0 && self.engine.state() == EngineState::Unanswered {
            self.selected_choice = (self.selected_choice + count - 1) % count;
        }
    }

    /// Jump to the choice at `index` (0-based) if it exists.
    pub fn select_choice(&mut self, index: usize) {
        if index < self.choice_count() && self.engine.state() == EngineState::Unanswered {
            self.selected_choice = index;
        }
    }

    /// Submit the highlighted choice, or move on once answered.
    pub fn confirm(&mut self) {
        match self.engine.state() {
            EngineState::Unanswered => self.submit_selected(),
            EngineState::Answered => self.next_question(),
            EngineState::NotStarted | EngineState::Finished => {}
        }
    }

    fn submit_selected(&mut self) {
        let key = match self.engine.current_question() {
            Ok(question) => match question.choices.as_slice().get(self.selected_choice) {
                Some(choice) => choice.key.clone(),
                None => return,
            },
            Err(err) => {
                tracing::warn!(error = %err, "submit without a current question");
                return;
            }
        };

        if let Err(err) = self.engine.submit_answer(&key) {
            tracing::warn!(error = %err, "answer ignored");
        }
    }

    pub fn next_question(&mut self) {
        match self.engine.advance() {
            Ok(EngineState::Finished) => {
                self.result_scroll = 0;
                self.state = AppState::Result;
            }
            Ok(_) => self.selected_choice = 0,
            Err(err) => tracing::warn!(error = %err, "advance ignored"),
        }
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.engine.session().missed().len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Abandon or finish the session and return to the start screen. The
    /// form keeps its values.
    pub fn restart(&mut self) {
        self.engine.reset();
        self.state = AppState::Start;
        self.selected_choice = 0;
        self.result_scroll = 0;
        self.form.error = None;
        self.form.loading = false;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&QuizConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_questions;

    const QUESTIONS: &str = r#"[
        {"page":"1","question":"Q1","answer":{"A":"x","B":"y"},"correct_answer":"A"},
        {"page":"2","question":"Q2","answer":{"A":"x","B":"y","C":"z"},"correct_answer":"C"},
        {"page":"3","question":"Q3","answer":{"A":"x","B":"y"},"correct_answer":"B"}
    ]"#;

    fn loaded() -> Result<Vec<Question>, LoadError> {
        parse_questions(QUESTIONS, LoadOptions::default())
    }

    fn app_with(start: &str, end: &str) -> App {
        let mut app = App::default();
        app.form.start = start.to_string();
        app.form.end = end.to_string();
        app
    }

    fn started(start: &str, end: &str) -> App {
        let mut app = app_with(start, end);
        let request = app.request_start().unwrap();
        app.complete_start(&request, loaded());
        app
    }

    #[test]
    fn form_is_prefilled_from_config() {
        let app = App::default();
        assert_eq!(app.form().path, "./questions.json");
        assert_eq!(app.form().start, "1");
        assert_eq!(app.form().end, "30");
        assert_eq!(app.state, AppState::Start);
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut app = App::default();
        app.focus_next();
        app.input_pop();
        app.input_push('2');
        app.focus_previous();
        app.focus_previous();
        app.input_push('9');
        assert_eq!(app.form().start, "2");
        assert_eq!(app.form().end, "309");
    }

    #[test]
    fn invalid_bounds_never_request_a_load() {
        let mut app = app_with("-2", "5");
        assert!(app.request_start().is_none());
        assert_eq!(app.form().error.as_deref(), Some("Start must be at least 1"));

        let mut app = app_with("5", "3");
        assert!(app.request_start().is_none());
        assert_eq!(
            app.form().error.as_deref(),
            Some("End must be greater than or equal to Start")
        );
    }

    #[test]
    fn load_failure_stays_on_start() {
        let mut app = App::default();
        let request = app.request_start().unwrap();
        app.complete_start(&request, Err(LoadError::NoValidQuestions));

        assert_eq!(app.state, AppState::Start);
        assert_eq!(app.form().error.as_deref(), Some("No valid questions found in JSON."));
        assert_eq!(app.engine().state(), EngineState::NotStarted);
    }

    #[test]
    fn start_beyond_pool_stays_on_start() {
        let app = started("4", "10");
        assert_eq!(app.state, AppState::Start);
        assert_eq!(
            app.form().error.as_deref(),
            Some("Start (4) is beyond available questions (3)")
        );
    }

    #[test]
    fn full_run_reaches_results() {
        let mut app = started("2", "30");
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.engine().total_questions(), 2);

        // Q2: pick "A" (wrong), then advance.
        app.confirm();
        assert_eq!(app.engine().state(), EngineState::Answered);
        app.select_next_choice();
        assert_eq!(app.selected_choice(), 0);
        app.confirm();

        // Q3: pick "B" (correct).
        app.select_choice(1);
        app.confirm();
        app.confirm();

        assert_eq!(app.state, AppState::Result);
        let results = app.engine().results().unwrap();
        assert_eq!(results.correct_count, 1);
        assert_eq!(results.wrong_count, 1);
        assert_eq!(results.range.to_string(), "2-30");
        assert_eq!(results.missed[0].chosen_key, "A");
        assert_eq!(results.missed[0].correct_text(), "z");
    }

    #[test]
    fn choice_selection_wraps() {
        let mut app = started("1", "1");
        app.select_previous_choice();
        assert_eq!(app.selected_choice(), 1);
        app.select_next_choice();
        assert_eq!(app.selected_choice(), 0);
        app.select_choice(7);
        assert_eq!(app.selected_choice(), 0);
    }

    #[test]
    fn restart_returns_to_start_with_form_kept() {
        let mut app = started("1", "2");
        app.confirm();
        app.restart();

        assert_eq!(app.state, AppState::Start);
        assert_eq!(app.form().start, "1");
        assert_eq!(app.form().end, "2");
        assert_eq!(app.engine().state(), EngineState::NotStarted);
        assert_eq!(app.engine().pool().len(), 3);
        assert_eq!(app.engine().session().correct_count(), 0);
    }

    #[test]
    fn result_scroll_is_clamped() {
        let mut app = started("1", "3");
        for _ in 0..3 {
            app.select_choice(1);
            app.confirm();
            app.confirm();
        }
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.engine().session().missed().len(), 2);

        app.scroll_results_down();
        app.scroll_results_down();
        app.scroll_results_down();
        assert_eq!(app.result_scroll(), 1);
        app.scroll_results_up();
        app.scroll_results_up();
        assert_eq!(app.result_scroll(), 0);
    }
}
