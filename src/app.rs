use std::time::Instant;

use crossterm::event::KeyEvent;
use tracing::{info, warn};

use crate::input::{map_form_key, map_key, Action, FormAction};
use crate::notify::Notifier;
use crate::schedule::Scheduler;
use crate::session::SessionConfig;
use crate::settings::SettingsForm;
use crate::timer::{Phase, SessionTimer, TimerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Timer,
    Settings,
    Finished,
}

/// Glue between the session timer and its collaborators: the scheduler that
/// produces ticks and flash continuations, the notifier, and the settings form.
pub struct App {
    pub timer: SessionTimer,
    pub scheduler: Scheduler,
    pub settings: Option<SettingsForm>,
    notifier: Box<dyn Notifier>,
    should_exit: bool,
}

impl App {
    pub fn new(config: SessionConfig, notifier: Box<dyn Notifier>, now: Instant) -> Self {
        let (timer, effects) = SessionTimer::start(config, now);
        let mut scheduler = Scheduler::new();
        scheduler.handle_effects(&effects, now);

        Self {
            timer,
            scheduler,
            settings: None,
            notifier,
            should_exit: false,
        }
    }

    pub fn state(&self) -> AppState {
        match (self.timer.phase(), self.settings.is_some()) {
            (Phase::Finished, _) => AppState::Finished,
            (_, true) => AppState::Settings,
            _ => AppState::Timer,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Feed one event to the timer and carry out what it asks for
    pub fn dispatch(&mut self, event: TimerEvent, now: Instant) {
        let effects = self.timer.apply(event, now);
        if self.scheduler.handle_effects(&effects, now) {
            self.notify();
        }
    }

    /// Deliver whatever ticks or flash continuations are due
    pub fn on_refresh(&mut self, now: Instant) {
        for event in self.scheduler.due(now) {
            self.dispatch(event, now);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if self.settings.is_some() {
            if let Some(action) = map_form_key(&key) {
                self.on_form_action(action, now);
            }
            return;
        }

        match map_key(&key) {
            Some(Action::Advance) => self.dispatch(TimerEvent::Advance, now),
            Some(Action::Quit) => self.dispatch(TimerEvent::Quit, now),
            Some(Action::Restart) => {
                self.settings = None;
                self.dispatch(TimerEvent::Restart, now);
            }
            Some(Action::OpenSettings) => self.open_settings(now),
            Some(Action::Exit) => self.should_exit = true,
            None => {}
        }
    }

    fn open_settings(&mut self, now: Instant) {
        if self.timer.phase() != Phase::Running {
            return;
        }
        let state = self.timer.state();
        self.settings = Some(SettingsForm::new(
            state.secs_per_question,
            self.timer.config().total_questions,
        ));
        self.dispatch(TimerEvent::OpenSettings, now);
    }

    fn close_settings(&mut self, now: Instant) {
        self.settings = None;
        self.dispatch(TimerEvent::CloseSettings, now);
    }

    fn on_form_action(&mut self, action: FormAction, now: Instant) {
        let current_question = self.timer.committed_question();
        let Some(form) = self.settings.as_mut() else {
            return;
        };

        match action {
            FormAction::Digit(c) => form.push_digit(c),
            FormAction::Backspace => form.backspace(),
            FormAction::SwitchField => form.toggle_focus(),
            FormAction::Save => {
                if let Some(settings) = form.submit(current_question) {
                    info!(
                        secs_per_question = settings.secs_per_question,
                        total_questions = settings.total_questions,
                        "settings saved"
                    );
                    self.dispatch(
                        TimerEvent::ApplySettings {
                            secs_per_question: settings.secs_per_question,
                            total_questions: settings.total_questions,
                        },
                        now,
                    );
                    self.close_settings(now);
                }
            }
            FormAction::Cancel => self.close_settings(now),
            FormAction::Exit => self.should_exit = true,
        }
    }

    fn notify(&mut self) {
        if let Err(e) = self.notifier.play_notification() {
            warn!(error = %e, "notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotifyError, Silent};
    use crate::settings::SettingsError;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Counting(Rc<Cell<u32>>);

    impl Notifier for Counting {
        fn play_notification(&mut self) -> Result<(), NotifyError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn play_notification(&mut self) -> Result<(), NotifyError> {
            Err(NotifyError::Io(std::io::Error::other("no audio")))
        }
    }

    #[test]
    fn refresh_delivers_ticks() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);
        app.on_refresh(t0 + ms(2500));
        assert_eq!(app.timer.state().secs_left_for_question, 16);
        assert_eq!(app.state(), AppState::Timer);
    }

    #[test]
    fn space_advances_after_flash_and_rings() {
        let t0 = Instant::now();
        let rings = Rc::new(Cell::new(0));
        let mut app = App::new(
            SessionConfig::new(3, 18),
            Box::new(Counting(rings.clone())),
            t0,
        );

        app.on_key(key(KeyCode::Char(' ')), t0 + ms(100));
        assert_eq!(rings.get(), 1);
        assert!(app.timer.is_flashing());
        assert_eq!(app.timer.state().current_question, 1);

        app.on_refresh(t0 + ms(700));
        assert!(!app.timer.is_flashing());
        assert_eq!(app.timer.state().current_question, 2);
    }

    #[test]
    fn failed_notification_does_not_disturb_timer() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Failing), t0);
        app.on_key(key(KeyCode::Char(' ')), t0);
        app.on_refresh(t0 + ms(600));
        assert_eq!(app.timer.state().current_question, 2);
    }

    #[test]
    fn quit_stops_ticks() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char('q')), t0 + ms(500));
        assert_eq!(app.state(), AppState::Finished);
        assert!(!app.scheduler.is_ticking());

        app.on_refresh(t0 + Duration::from_secs(10));
        assert_eq!(app.timer.state().secs_left_for_question, 18);
    }

    #[test]
    fn settings_modal_pauses_and_applies() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);

        app.on_key(key(KeyCode::Char('s')), t0);
        assert_eq!(app.state(), AppState::Settings);
        assert!(!app.scheduler.is_ticking());

        // space is not an advance while the modal is open
        app.on_key(key(KeyCode::Char(' ')), t0);
        assert!(!app.timer.is_flashing());

        app.on_key(key(KeyCode::Backspace), t0);
        app.on_key(key(KeyCode::Backspace), t0);
        app.on_key(key(KeyCode::Char('3')), t0);
        app.on_key(key(KeyCode::Char('0')), t0);
        app.on_key(key(KeyCode::Tab), t0);
        app.on_key(key(KeyCode::Backspace), t0);
        app.on_key(key(KeyCode::Char('5')), t0);
        app.on_key(key(KeyCode::Enter), t0 + ms(3000));

        assert_eq!(app.state(), AppState::Timer);
        assert!(app.scheduler.is_ticking());
        let state = app.timer.state();
        assert_eq!(state.secs_per_question, 30);
        assert_eq!(state.secs_left_for_question, 30);
        assert_eq!(state.total_secs_remaining, 150);
        assert_eq!(app.timer.config().total_questions, 5);
    }

    #[test]
    fn invalid_settings_keep_modal_open() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char('s')), t0);
        app.on_key(key(KeyCode::Backspace), t0);
        app.on_key(key(KeyCode::Backspace), t0);
        app.on_key(key(KeyCode::Char('2')), t0);
        app.on_key(key(KeyCode::Enter), t0);

        assert_eq!(app.state(), AppState::Settings);
        assert!(app.settings.as_ref().unwrap().error.is_some());
        assert_eq!(app.timer.state().secs_per_question, 18);
    }

    #[test]
    fn settings_saved_during_flash_keep_question_in_range() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(5, 18), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char(' ')), t0);
        app.on_refresh(t0 + ms(600));
        assert_eq!(app.timer.state().current_question, 2);

        app.on_key(key(KeyCode::Char(' ')), t0 + ms(700));
        app.on_key(key(KeyCode::Char('s')), t0 + ms(800));
        app.on_key(key(KeyCode::Tab), t0 + ms(800));
        app.on_key(key(KeyCode::Backspace), t0 + ms(800));
        app.on_key(key(KeyCode::Char('2')), t0 + ms(800));
        app.on_key(key(KeyCode::Enter), t0 + ms(800));

        // the pending advance makes 3 the lowest allowed total
        assert_eq!(app.state(), AppState::Settings);
        assert_eq!(
            app.settings.as_ref().unwrap().error,
            Some(SettingsError::BelowCurrentQuestion { current: 3 })
        );

        app.on_key(key(KeyCode::Backspace), t0 + ms(800));
        app.on_key(key(KeyCode::Char('3')), t0 + ms(800));
        app.on_key(key(KeyCode::Enter), t0 + ms(800));
        assert_eq!(app.state(), AppState::Timer);

        app.on_refresh(t0 + ms(1300));
        let state = app.timer.state();
        assert_eq!(state.current_question, 3);
        assert_eq!(app.timer.config().total_questions, 3);
        assert!(state.current_question <= app.timer.config().total_questions);
    }

    #[test]
    fn cancelled_settings_time_still_counts_on_next_advance() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char('s')), t0);
        app.on_refresh(t0 + Duration::from_secs(30));
        assert_eq!(app.timer.state().total_secs_remaining, 54);

        let resumed = t0 + Duration::from_secs(30);
        app.on_key(key(KeyCode::Esc), resumed);
        app.on_key(key(KeyCode::Char(' ')), resumed);
        app.on_refresh(resumed + ms(500));

        let state = app.timer.state();
        assert_eq!(state.current_question, 2);
        assert_eq!(state.total_secs_remaining, 54 - 30);
        assert_eq!(state.secs_per_question, 12);
    }

    #[test]
    fn cancel_settings_resumes_without_changes() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char('s')), t0);
        app.on_key(key(KeyCode::Char('9')), t0);
        app.on_key(key(KeyCode::Esc), t0);

        assert_eq!(app.state(), AppState::Timer);
        assert!(!app.should_exit());
        assert_eq!(app.timer.state().secs_per_question, 18);
        assert!(app.scheduler.is_ticking());
    }

    #[test]
    fn restart_cancels_in_flight_flash() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(3, 18), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char(' ')), t0);
        app.on_key(key(KeyCode::Char('r')), t0 + ms(200));
        app.on_refresh(t0 + ms(800));

        assert_eq!(app.timer.state().current_question, 1);
        assert!(!app.timer.is_flashing());
    }

    #[test]
    fn finishing_last_question_then_restart() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::new(1, 10), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Char(' ')), t0);
        assert_eq!(app.state(), AppState::Finished);

        app.on_key(key(KeyCode::Char('r')), t0 + ms(100));
        assert_eq!(app.state(), AppState::Timer);
        assert!(app.scheduler.is_ticking());
    }

    #[test]
    fn escape_exits() {
        let t0 = Instant::now();
        let mut app = App::new(SessionConfig::default(), Box::new(Silent), t0);
        app.on_key(key(KeyCode::Esc), t0);
        assert!(app.should_exit());
    }
}
