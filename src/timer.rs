//! Session timer state machine.
//!
//! The timer never owns a clock or a thread. Callers feed it [`TimerEvent`]s
//! together with the current instant and carry out the [`Effect`]s it returns
//! (start/stop the tick source, ring the bell, schedule the flash continuation).

use std::time::{Duration, Instant};

use tracing::debug;

use crate::session::{FinishReason, SessionConfig, SessionState, MIN_SECS_PER_QUESTION};

/// Delay between an advance request and the actual question increment
pub const FLASH_WINDOW: Duration = Duration::from_millis(500);

/// Identifies one scheduled flash continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick,
    Advance,
    FlashElapsed(FlashToken),
    Quit,
    Restart,
    OpenSettings,
    CloseSettings,
    ApplySettings {
        secs_per_question: u32,
        total_questions: u32,
    },
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartTicking,
    StopTicking,
    PlayNotification,
    ScheduleFlash(FlashToken),
    CancelFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Running,
    Paused,
    Finished,
}

#[derive(Debug)]
pub struct SessionTimer {
    baseline: SessionConfig,
    config: SessionConfig,
    state: SessionState,
    phase: Phase,
    pending_flash: Option<FlashToken>,
    next_token: u64,
}

impl SessionTimer {
    /// Create a running session anchored at `now`.
    ///
    /// The returned effects must be applied by the caller (they start the tick source).
    pub fn start(config: SessionConfig, now: Instant) -> (Self, Vec<Effect>) {
        debug!(
            total_questions = config.total_questions,
            secs_per_question = config.default_secs_per_question,
            "session started"
        );
        let timer = Self {
            baseline: config,
            config,
            state: SessionState::fresh(&config, now),
            phase: Phase::Running,
            pending_flash: None,
            next_token: 0,
        };
        (timer, vec![Effect::StartTicking])
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Config currently in force (may differ from the baseline after settings changes)
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn baseline(&self) -> &SessionConfig {
        &self.baseline
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the flash window of an advance is open
    pub fn is_flashing(&self) -> bool {
        self.pending_flash.is_some()
    }

    /// The question the user will be on once any pending flash settles.
    ///
    /// Settings must never shrink the session below this.
    pub fn committed_question(&self) -> u32 {
        self.state.current_question + u32::from(self.pending_flash.is_some())
    }

    pub fn apply(&mut self, event: TimerEvent, now: Instant) -> Vec<Effect> {
        match event {
            TimerEvent::Tick => {
                self.tick();
                vec![]
            }
            TimerEvent::Advance => self.advance(),
            TimerEvent::FlashElapsed(token) => {
                self.complete_advance(token, now);
                vec![]
            }
            TimerEvent::Quit => self.quit(),
            TimerEvent::Restart => self.restart(now),
            TimerEvent::OpenSettings => self.open_settings(),
            TimerEvent::CloseSettings => self.close_settings(),
            TimerEvent::ApplySettings {
                secs_per_question,
                total_questions,
            } => {
                self.apply_settings(secs_per_question, total_questions, now);
                vec![]
            }
        }
    }

    /// One elapsed second. Ignored unless running.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.state.secs_left_for_question -= 1;
        if self.state.secs_left_for_question <= 0 && !self.state.is_overtime {
            debug!(question = self.state.current_question, "question in overtime");
            self.state.is_overtime = true;
        }
        self.state.total_secs_remaining = self.state.total_secs_remaining.saturating_sub(1);
    }

    pub fn advance(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return vec![];
        }
        if self.pending_flash.is_some() {
            debug!("advance ignored, flash window still open");
            return vec![];
        }

        if self.state.current_question >= self.config.total_questions {
            self.finish(FinishReason::Completed);
            return vec![Effect::StopTicking];
        }

        self.state.is_overtime = false;
        let token = FlashToken(self.next_token);
        self.next_token += 1;
        self.pending_flash = Some(token);

        vec![Effect::PlayNotification, Effect::ScheduleFlash(token)]
    }

    /// Deferred half of [`advance`](Self::advance), run once the flash window closes.
    pub fn complete_advance(&mut self, token: FlashToken, now: Instant) {
        if self.pending_flash != Some(token) {
            debug!(?token, "stale flash continuation dropped");
            return;
        }
        self.pending_flash = None;
        if self.phase == Phase::Finished {
            return;
        }

        self.state.current_question += 1;
        self.redistribute(self.state.current_question, now);
    }

    /// Recompute the per-question budget from wall-clock time elapsed since the session anchor.
    pub fn redistribute(&mut self, question: u32, now: Instant) {
        let elapsed = now.saturating_duration_since(self.state.started_at).as_secs();
        let remaining = self.config.total_budget().saturating_sub(elapsed);
        self.state.total_secs_remaining = remaining;

        let questions_remaining =
            self.config.total_questions as i64 - question as i64 + 1;
        if questions_remaining > 0 {
            let share = remaining / questions_remaining as u64;
            self.state.secs_per_question =
                share.clamp(MIN_SECS_PER_QUESTION as u64, u32::MAX as u64) as u32;
        }
        self.state.secs_left_for_question = self.state.secs_per_question as i64;

        debug!(
            question,
            elapsed,
            remaining,
            secs_per_question = self.state.secs_per_question,
            "time redistributed"
        );
    }

    pub fn quit(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Finished {
            return vec![];
        }
        self.finish(FinishReason::Quit);
        vec![Effect::StopTicking, Effect::CancelFlash]
    }

    /// Throw away the current session and start over from the baseline config.
    pub fn restart(&mut self, now: Instant) -> Vec<Effect> {
        debug!(phase = %self.phase, "session restarted");
        self.config = self.baseline;
        self.state = SessionState::fresh(&self.config, now);
        self.phase = Phase::Running;
        self.pending_flash = None;
        vec![Effect::CancelFlash, Effect::StartTicking]
    }

    pub fn open_settings(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return vec![];
        }
        self.phase = Phase::Paused;
        self.state.is_running = false;
        vec![Effect::StopTicking]
    }

    pub fn close_settings(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Paused {
            return vec![];
        }
        self.phase = Phase::Running;
        self.state.is_running = true;
        vec![Effect::StartTicking]
    }

    /// Reset the budget to `secs_per_question * total_questions`, measured from `now`.
    ///
    /// The new values become the active config; the baseline used by restart is untouched.
    /// A pending flash still counts toward the question floor.
    pub fn apply_settings(&mut self, secs_per_question: u32, total_questions: u32, now: Instant) {
        if self.phase == Phase::Finished {
            return;
        }
        let total_questions = total_questions.max(self.committed_question());
        self.config = SessionConfig::new(total_questions, secs_per_question);

        self.state.secs_per_question = self.config.default_secs_per_question;
        self.state.secs_left_for_question = self.config.default_secs_per_question as i64;
        self.state.total_secs_remaining = self.config.total_budget();
        self.state.is_overtime = false;
        self.state.started_at = now;

        debug!(
            secs_per_question = self.config.default_secs_per_question,
            total_questions = self.config.total_questions,
            "settings applied"
        );
    }

    fn finish(&mut self, reason: FinishReason) {
        debug!(%reason, question = self.state.current_question, "session finished");
        self.phase = Phase::Finished;
        self.state.is_running = false;
        self.state.is_finished = true;
        self.state.finish_reason = Some(reason);
        self.pending_flash = None;
    }
}
