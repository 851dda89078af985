use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, FormField};

const LABEL_WIDTH: usize = 14;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Fill(1),
    ])
    .split(area);

    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(72),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let form = app.form();
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        field_line("Questions", &form.path, form.focus == FormField::Path),
        field_line("Start", &form.start, form.focus == FormField::Start),
        field_line("End", &form.end, form.focus == FormField::End),
        Line::from(""),
    ];

    if form.loading {
        content.push(Line::from(Span::styled(
            "Loading questions...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &form.error {
        content.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "ENTER",
        Style::default().fg(Color::Green).bold(),
    )));
    content.push(Line::from("to start".fg(Color::DarkGray)));
    content.push(Line::from(
        "tab next field  ·  esc quit".fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, columns[1]);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let (marker, value_style) = if focused {
        (">", Style::default().fg(Color::Yellow))
    } else {
        (" ", Style::default().fg(Color::Gray))
    };
    let cursor = if focused { "_" } else { " " };

    Line::from(vec![
        Span::styled(format!("{} ", marker), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{:>width$}: ", label, width = LABEL_WIDTH),
            Style::default().fg(Color::White),
        ),
        Span::styled(value, value_style),
        Span::styled(cursor, value_style),
    ])
}
