use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::quiz::{ChoiceBadge, MissRecord, QuizResults};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Ok(results) = app.engine().results() else {
        return;
    };

    let [summary, missed, controls] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .areas(area);

    render_score_summary(frame, summary, &results);
    render_missed(frame, missed, results.missed, app.result_scroll());
    render_controls(frame, controls);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, results: &QuizResults) {
    let percentage = results.percentage();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("Questions {}", results.range),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} correct", results.correct_count),
                Style::default().fg(Color::Green).bold(),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} wrong", results.wrong_count),
                Style::default().fg(Color::Red).bold(),
            ),
            Span::styled(
                format!("  ({:.0}%)", percentage),
                Style::default().fg(get_grade_color(percentage)).bold(),
            ),
        ]),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

/// Every missed question starting at entry `scroll`.
fn render_missed(frame: &mut Frame, area: Rect, missed: &[MissRecord], scroll: usize) {
    let lines: Vec<Line> = if missed.is_empty() {
        vec![Line::from(Span::styled(
            "No wrong answers",
            Style::default().fg(Color::Green),
        ))]
    } else {
        missed
            .iter()
            .enumerate()
            .skip(scroll)
            .flat_map(|(index, miss)| miss_lines(index + 1, miss))
            .collect()
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Missed questions ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn miss_lines(number: usize, miss: &MissRecord) -> Vec<Line<'_>> {
    let mut lines = Vec::with_capacity(miss.choices.len() + 5);

    lines.push(Line::from(vec![
        Span::styled(format!("{:2}. ", number), Style::default().fg(Color::DarkGray)),
        Span::styled(miss.question.as_str(), Style::default().fg(Color::White).bold()),
    ]));
    lines.push(Line::from(Span::styled(
        format!("    Page: {}", miss.page),
        Style::default().fg(Color::DarkGray),
    )));

    for choice in &miss.choices {
        let (badge, style) = match miss.badge(&choice.key) {
            ChoiceBadge::Correct => (" correct", Style::default().fg(Color::Green)),
            ChoiceBadge::YourChoice => (" your choice", Style::default().fg(Color::Red)),
            ChoiceBadge::None => ("", Style::default().fg(Color::Gray)),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {}. {}", choice.key, choice.text),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(badge, style.add_modifier(Modifier::BOLD)),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("    You chose: ", Style::default().fg(Color::Red).bold()),
        Span::raw(format!("{}. {}", miss.chosen_key, miss.chosen_text())),
    ]));
    lines.push(Line::from(vec![
        Span::styled("    Correct: ", Style::default().fg(Color::Green).bold()),
        Span::raw(format!("{}. {}", miss.correct_key, miss.correct_text())),
    ]));
    lines.push(Line::from(""));

    lines
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::data::{LoadOptions, parse_questions};

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    #[test]
    fn miss_lines_show_badges_and_answers() {
        let miss = MissRecord {
            question: "Capital of France?".to_string(),
            page: "12".to_string(),
            choices: [("α", "Paris"), ("β", "Rome"), ("γ", "Oslo")]
                .into_iter()
                .collect(),
            chosen_key: "γ".to_string(),
            correct_key: "α".to_string(),
        };

        let text: Vec<String> = miss_lines(3, &miss)
            .iter()
            .map(|line| line.to_string())
            .collect();

        assert_eq!(
            text,
            vec![
                " 3. Capital of France?",
                "    Page: 12",
                "    α. Paris correct",
                "    β. Rome",
                "    γ. Oslo your choice",
                "    You chose: γ. Oslo",
                "    Correct: α. Paris",
                "",
            ]
        );
    }

    #[test]
    fn summary_starts_at_the_top() {
        let mut app = App::default();
        let request = app.request_start().unwrap();
        let questions = parse_questions(
            r#"[{"question":"Q1","answer":{"A":"x","B":"y"},"correct_answer":"A"}]"#,
            LoadOptions::default(),
        );
        app.complete_start(&request, questions);
        app.select_choice(1);
        app.confirm();
        app.confirm();

        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal.draw(|frame| render(frame, frame.area(), &app)).unwrap();
        let buffer = terminal.backend().buffer();

        assert!(row(buffer, 1).trim().is_empty());
        assert!(row(buffer, 2).contains("RESULTS"));
        assert!(row(buffer, 3).contains("Questions 1-30"));
        assert!(row(buffer, 5).contains("0 correct"));
        assert!((0..24).any(|y| row(buffer, y).contains("Missed questions")));
    }

    #[test]
    fn grade_colors() {
        assert_eq!(get_grade_color(100.0), Color::Green);
        assert_eq!(get_grade_color(75.0), Color::Cyan);
        assert_eq!(get_grade_color(50.0), Color::Yellow);
        assert_eq!(get_grade_color(10.0), Color::Red);
    }
}
