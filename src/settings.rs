use std::ops::RangeInclusive;

use thiserror::Error;

pub const SECONDS_RANGE: RangeInclusive<u32> = 5..=300;
pub const QUESTIONS_RANGE: RangeInclusive<u32> = 1..=200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} is empty")]
    Empty { field: Field },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: Field, min: u32, max: u32 },
    #[error("total questions cannot be below question {current}")]
    BelowCurrentQuestion { current: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Field {
    #[strum(serialize = "seconds per question")]
    SecondsPerQuestion,
    #[strum(serialize = "total questions")]
    TotalQuestions,
}

/// Validated values ready to hand to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub secs_per_question: u32,
    pub total_questions: u32,
}

/// Editable state of the settings modal
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub seconds: String,
    pub questions: String,
    pub focus: Field,
    pub error: Option<SettingsError>,
}

const MAX_DIGITS: usize = 4;

impl SettingsForm {
    pub fn new(secs_per_question: u32, total_questions: u32) -> Self {
        Self {
            seconds: secs_per_question.to_string(),
            questions: total_questions.to_string(),
            focus: Field::SecondsPerQuestion,
            error: None,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::SecondsPerQuestion => &mut self.seconds,
            Field::TotalQuestions => &mut self.questions,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::SecondsPerQuestion => Field::TotalQuestions,
            Field::TotalQuestions => Field::SecondsPerQuestion,
        };
    }

    /// Non-digits are ignored
    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let field = self.focused_mut();
        if field.len() < MAX_DIGITS {
            field.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
        self.error = None;
    }

    /// Check both fields; `current_question` is the lowest allowed total.
    pub fn validate(&self, current_question: u32) -> Result<Settings, SettingsError> {
        let secs_per_question =
            parse_in_range(&self.seconds, Field::SecondsPerQuestion, &SECONDS_RANGE)?;
        let total_questions =
            parse_in_range(&self.questions, Field::TotalQuestions, &QUESTIONS_RANGE)?;

        if total_questions < current_question {
            return Err(SettingsError::BelowCurrentQuestion {
                current: current_question,
            });
        }

        Ok(Settings {
            secs_per_question,
            total_questions,
        })
    }

    /// Like [`validate`](Self::validate) but remembers the error for display
    pub fn submit(&mut self, current_question: u32) -> Option<Settings> {
        match self.validate(current_question) {
            Ok(settings) => {
                self.error = None;
                Some(settings)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

fn parse_in_range(
    raw: &str,
    field: Field,
    range: &RangeInclusive<u32>,
) -> Result<u32, SettingsError> {
    if raw.is_empty() {
        return Err(SettingsError::Empty { field });
    }
    let out_of_range = SettingsError::OutOfRange {
        field,
        min: *range.start(),
        max: *range.end(),
    };
    let value: u32 = raw.parse().map_err(|_| out_of_range.clone())?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(out_of_range)
    }
}
