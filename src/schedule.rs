use std::time::{Duration, Instant};

use crate::timer::{Effect, FlashToken, TimerEvent, FLASH_WINDOW};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Turns the timer's tick/flash effects into due [`TimerEvent`]s.
///
/// This is the one-second tick source and the owner of the deferred flash
/// continuation. It is polled by the event loop rather than running its own thread.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_tick: Option<Instant>,
    flash: Option<(Instant, FlashToken)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ticking(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn start_ticking(&mut self, now: Instant) {
        self.next_tick = Some(now + TICK_INTERVAL);
    }

    pub fn stop_ticking(&mut self) {
        self.next_tick = None;
    }

    pub fn schedule_flash(&mut self, token: FlashToken, now: Instant) {
        self.flash = Some((now + FLASH_WINDOW, token));
    }

    pub fn cancel_flash(&mut self) {
        self.flash = None;
    }

    /// Apply the scheduling half of a transition's effects.
    /// Returns true if a notification was requested.
    pub fn handle_effects(&mut self, effects: &[Effect], now: Instant) -> bool {
        let mut notify = false;
        for effect in effects {
            match *effect {
                Effect::StartTicking => self.start_ticking(now),
                Effect::StopTicking => self.stop_ticking(),
                Effect::ScheduleFlash(token) => self.schedule_flash(token, now),
                Effect::CancelFlash => self.cancel_flash(),
                Effect::PlayNotification => notify = true,
            }
        }
        notify
    }

    /// Events that have come due at `now`, oldest first.
    ///
    /// If the loop fell behind, every missed second is returned as its own tick.
    pub fn due(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut due: Vec<(Instant, TimerEvent)> = Vec::new();

        if let Some(mut next) = self.next_tick {
            while next <= now {
                due.push((next, TimerEvent::Tick));
                next += TICK_INTERVAL;
            }
            self.next_tick = Some(next);
        }

        if let Some((at, token)) = self.flash {
            if at <= now {
                due.push((at, TimerEvent::FlashElapsed(token)));
                self.flash = None;
            }
        }

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, ev)| ev).collect()
    }
}
