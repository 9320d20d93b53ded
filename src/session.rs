use chrono::{DateTime, Local};
use std::time::Instant;

/// Floor applied to the per-question budget whenever time is redistributed
pub const MIN_SECS_PER_QUESTION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub total_questions: u32,
    pub default_secs_per_question: u32,
}

impl SessionConfig {
    pub fn new(total_questions: u32, default_secs_per_question: u32) -> Self {
        Self {
            total_questions: total_questions.max(1),
            default_secs_per_question: default_secs_per_question.max(1),
        }
    }

    /// Whole-session budget in seconds
    pub fn total_budget(&self) -> u64 {
        self.total_questions as u64 * self.default_secs_per_question as u64
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(50, 18)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FinishReason {
    Completed,
    Quit,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_question: u32,
    pub secs_left_for_question: i64,
    pub secs_per_question: u32,
    pub total_secs_remaining: u64,
    pub is_running: bool,
    pub is_finished: bool,
    pub is_overtime: bool,
    pub started_at: Instant,
    pub started_wall: DateTime<Local>,
    pub finish_reason: Option<FinishReason>,
}

impl SessionState {
    /// Fresh running state with full budgets taken from `config`
    pub fn fresh(config: &SessionConfig, now: Instant) -> Self {
        Self {
            current_question: 1,
            secs_left_for_question: config.default_secs_per_question as i64,
            secs_per_question: config.default_secs_per_question,
            total_secs_remaining: config.total_budget(),
            is_running: true,
            is_finished: false,
            is_overtime: false,
            started_at: now,
            started_wall: Local::now(),
            finish_reason: None,
        }
    }

    /// Number of questions the user got through
    pub fn completed_questions(&self) -> u32 {
        match self.finish_reason {
            Some(FinishReason::Completed) => self.current_question,
            _ => self.current_question.saturating_sub(1),
        }
    }
}
