use ratatui::style::Color;

/// Seconds left on the question, `+N` once in overtime
pub fn format_countdown(secs_left: i64) -> String {
    if secs_left >= 0 {
        secs_left.to_string()
    } else {
        format!("+{}", secs_left.unsigned_abs())
    }
}

pub fn countdown_label(secs_left: i64) -> &'static str {
    if secs_left >= 0 {
        "seconds remaining"
    } else {
        "seconds over"
    }
}

/// `m:ss`
pub fn format_total(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Fill ratio of the per-question progress bar, full once in overtime
pub fn progress_ratio(secs_left: i64, secs_per_question: u32) -> f64 {
    if secs_left < 0 {
        return 1.0;
    }
    if secs_per_question == 0 {
        return 0.0;
    }
    (secs_left as f64 / secs_per_question as f64).clamp(0.0, 1.0)
}

/// Red when close to (or past) zero. The overtime shade alternates every second.
pub fn countdown_color(secs_left: i64, is_overtime: bool) -> Color {
    if secs_left < 0 {
        if is_overtime && secs_left % 2 == 0 {
            Color::LightRed
        } else {
            Color::Red
        }
    } else if secs_left <= 5 {
        Color::LightRed
    } else {
        Color::White
    }
}
