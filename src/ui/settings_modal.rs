use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::settings::{Field, SettingsForm, QUESTIONS_RANGE, SECONDS_RANGE};
use crate::ui::centered;

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let marker = if focused { "> " } else { "  " };

    Line::from(vec![
        Span::raw(marker),
        Span::raw(label),
        Span::styled(format!(" {value:>4} "), value_style),
    ])
}

/// Draw the settings form centered over whatever is already in `area`
pub fn render(form: &SettingsForm, area: Rect, buf: &mut Buffer) {
    let modal = centered(area, 52, 10);
    Clear.render(modal, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Timer Settings ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(modal);
    block.render(modal, buf);

    let seconds_label = format!(
        "Seconds per question ({}-{}):",
        SECONDS_RANGE.start(),
        SECONDS_RANGE.end()
    );
    let questions_label = format!(
        "Total questions ({}-{}):     ",
        QUESTIONS_RANGE.start(),
        QUESTIONS_RANGE.end()
    );

    let error_line = match &form.error {
        Some(e) => Line::from(Span::styled(e.to_string(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    };

    let lines = vec![
        Line::from(""),
        field_line(
            &seconds_label,
            &form.seconds,
            form.focus == Field::SecondsPerQuestion,
        ),
        field_line(
            &questions_label,
            &form.questions,
            form.focus == Field::TotalQuestions,
        ),
        Line::from(""),
        error_line,
        Line::from(""),
        Line::from(Span::styled(
            "(enter) save  (esc) cancel  (tab) switch",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
    ];

    Paragraph::new(lines).render(inner, buf);
}
