pub mod format;
pub mod settings_modal;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget},
};

use crate::{
    app::{App, AppState},
    ui::format::{countdown_color, countdown_label, format_countdown, format_total, progress_ratio},
};

const CARD_WIDTH: u16 = 52;
const CARD_HEIGHT: u16 = 16;

/// Rect of at most `width` x `height` centered inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state() {
            AppState::Finished => render_finished(self, area, buf),
            AppState::Timer => render_timer(self, area, buf),
            AppState::Settings => {
                render_timer(self, area, buf);
                if let Some(form) = &self.settings {
                    settings_modal::render(form, area, buf);
                }
            }
        }
    }
}

fn render_timer(app: &App, area: Rect, buf: &mut Buffer) {
    let state = app.timer.state();
    let config = app.timer.config();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    if app.timer.is_flashing() {
        Block::default()
            .style(Style::default().bg(Color::Green))
            .render(area, buf);
    }

    let card = centered(area, CARD_WIDTH, CARD_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" CCAT Practice Timer ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(card);
    block.render(card, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(1), // question progress
            Constraint::Length(1),
            Constraint::Length(1), // countdown
            Constraint::Length(1), // countdown label
            Constraint::Length(1),
            Constraint::Length(1), // progress bar
            Constraint::Length(1),
            Constraint::Length(1), // time per question
            Constraint::Length(1), // total remaining
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(inner);

    Paragraph::new(Span::styled(
        format!(
            "Question {} / {}",
            state.current_question, config.total_questions
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let color = countdown_color(state.secs_left_for_question, state.is_overtime);
    Paragraph::new(Span::styled(
        format_countdown(state.secs_left_for_question),
        bold_style.fg(color),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        countdown_label(state.secs_left_for_question),
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    let gauge_color = if state.secs_left_for_question < 0 {
        Color::Red
    } else {
        Color::Blue
    };
    Gauge::default()
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(progress_ratio(
            state.secs_left_for_question,
            state.secs_per_question,
        ))
        .label("")
        .render(chunks[5], buf);

    stat_line(
        "Time per question:",
        format!("{}s", state.secs_per_question),
        chunks[7],
        buf,
    );
    stat_line(
        "Total time remaining:",
        format_total(state.total_secs_remaining),
        chunks[8],
        buf,
    );

    Paragraph::new(Span::styled(
        "(space) next  (q) quit  (s) settings  (r) restart",
        dim_style.add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[10], buf);
}

fn stat_line(label: &str, value: String, area: Rect, buf: &mut Buffer) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    Paragraph::new(label.to_string()).render(halves[0], buf);
    Paragraph::new(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right)
    .render(halves[1], buf);
}

fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let state = app.timer.state();
    let card = centered(area, CARD_WIDTH, 9);
    Clear.render(card, buf);

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(card);
    block.render(card, buf);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Done!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "You completed {} of {} questions",
            state.completed_questions(),
            app.timer.config().total_questions
        )),
        Line::from(Span::styled(
            format!("Session started {}", state.started_wall.format("%H:%M:%S")),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(r) start new session  (esc) exit",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}
