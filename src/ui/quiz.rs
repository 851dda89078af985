use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Choices, Question};
use crate::quiz::{EngineState, Feedback};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let engine = app.engine();
    let Ok(question) = engine.current_question() else {
        return;
    };

    let text_width = area.width.saturating_sub(4);
    let text_height = question_height(&question.text, text_width, area.height / 2);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(text_height + 1),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_page(frame, chunks[1], question);
    render_question_text(frame, chunks[2], &question.text);
    render_choices(frame, chunks[3], question, app);
    render_feedback(frame, chunks[4], engine.feedback());
    render_controls(frame, chunks[5], engine.state());
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let engine = app.engine();
    let session = engine.session();

    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let tally = Line::from(vec![
        Span::styled(
            format!("{} correct", session.correct_count()),
            Style::default().fg(Color::Green),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} wrong", session.wrong_count()),
            Style::default().fg(Color::Red),
        ),
    ]);
    frame.render_widget(Paragraph::new(tally), halves[0]);

    let progress = format!(
        "{}/{}",
        engine.question_number(),
        engine.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn render_page(frame: &mut Frame, area: Rect, question: &Question) {
    let page = if question.page.is_empty() {
        "-"
    } else {
        question.page.as_str()
    };
    let widget = Paragraph::new(format!("Page {}", page)).fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

/// Rows needed to show `text` wrapped at `width`, capped at `max_rows`.
fn question_height(text: &str, width: u16, max_rows: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .lines()
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();

    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .clamp(1, max_rows.max(1))
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_choices(frame: &mut Frame, area: Rect, question: &Question, app: &App) {
    let answered = app.engine().state() == EngineState::Answered;
    let chosen = match app.engine().feedback() {
        Some(Feedback::Wrong { chosen_key, .. }) => Some(chosen_key.as_str()),
        _ => None,
    };

    let lines = choice_lines(
        &question.choices,
        &question.correct_key,
        app.selected_choice(),
        answered.then_some(chosen),
    );

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

/// `outcome` is `None` while unanswered, otherwise the wrongly chosen key
/// (if any).
fn choice_lines<'a>(
    choices: &'a Choices,
    correct_key: &str,
    selected: usize,
    outcome: Option<Option<&str>>,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = Vec::with_capacity(choices.len() * 2);

    for (index, choice) in choices.iter().enumerate() {
        let is_selected = index == selected;
        let style = match outcome {
            None if is_selected => Style::default().fg(Color::Cyan).bold(),
            None => Style::default().fg(Color::Gray),
            Some(_) if choice.key == correct_key => Style::default().fg(Color::Green).bold(),
            Some(Some(chosen)) if choice.key == chosen => Style::default().fg(Color::Red).bold(),
            Some(_) => Style::default().fg(Color::DarkGray),
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", choice.key), style),
            Span::styled(choice.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    lines
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: Option<&Feedback>) {
    let Some(feedback) = feedback else {
        return;
    };

    let color = if feedback.is_correct() {
        Color::Green
    } else {
        Color::Red
    };
    let widget = Paragraph::new(feedback.to_string())
        .wrap(Wrap { trim: true })
        .fg(color)
        .bold();
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, state: EngineState) {
    let hint = if state == EngineState::Answered {
        "enter/n next  ·  x back to start  ·  q quit"
    } else {
        "j/k navigate  ·  enter select  ·  x back to start  ·  q quit"
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Choices {
        [("A", "x"), ("B", "y"), ("C", "z")].into_iter().collect()
    }

    #[test]
    fn one_line_pair_per_choice_in_order() {
        let choices = choices();
        let lines = choice_lines(&choices, "B", 0, None);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].to_string(), " > A. x");
        assert_eq!(lines[2].to_string(), "   B. y");
        assert_eq!(lines[4].to_string(), "   C. z");
    }

    #[test]
    fn answered_choices_are_colored_by_key() {
        let choices = choices();
        let lines = choice_lines(&choices, "B", 2, Some(Some("C")));
        assert_eq!(lines[2].spans[1].style.fg, Some(Color::Green));
        assert_eq!(lines[4].spans[1].style.fg, Some(Color::Red));
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn question_height_follows_wrapped_text() {
        assert_eq!(question_height("", 40, 10), 1);
        assert_eq!(question_height("short", 40, 10), 1);
        assert_eq!(question_height(&"x".repeat(100), 40, 10), 3);
        assert_eq!(question_height("one\ntwo\n\nfour", 40, 10), 4);
        assert_eq!(question_height(&"x".repeat(1000), 40, 10), 10);
    }
}
