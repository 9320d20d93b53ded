use ccat_timer::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_logging,
    notify::{Notifier, Silent, TerminalBell},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    settings::{QUESTIONS_RANGE, SECONDS_RANGE},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};
use tracing::info;

/// practice-exam countdown timer with time redistribution
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A CCAT-style practice timer: every question gets a time budget, overtime counts up instead of skipping ahead, and each advance spreads the time that is left across the remaining questions."
)]
pub struct Cli {
    /// number of questions in the session [default: from config, else 50]
    #[clap(short = 'q', long, value_parser = clap::value_parser!(u32).range(*QUESTIONS_RANGE.start() as i64..=*QUESTIONS_RANGE.end() as i64))]
    questions: Option<u32>,

    /// seconds allotted to each question [default: from config, else 18]
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(*SECONDS_RANGE.start() as i64..=*SECONDS_RANGE.end() as i64))]
    seconds: Option<u32>,

    /// do not ring the terminal bell when moving to the next question
    #[clap(long)]
    mute: bool,

    /// store the resulting question count, seconds and sound setting as new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn resolve(&self, stored: Config) -> Config {
        Config {
            total_questions: self.questions.unwrap_or(stored.total_questions),
            secs_per_question: self.seconds.unwrap_or(stored.secs_per_question),
            sound: stored.sound && !self.mute,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = init_logging(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = FileConfigStore::new();
    let config = cli.resolve(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let notifier: Box<dyn Notifier> = if config.sound {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(Silent)
    };
    info!(
        total_questions = config.total_questions,
        secs_per_question = config.secs_per_question,
        sound = config.sound,
        "starting session"
    );
    let mut app = App::new(config.session_config(), notifier, Instant::now());
    let result = start_tui(&mut terminal, &mut app);

    restore_terminal()?;
    terminal.show_cursor()?;

    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Refresh | AppEvent::Resize => app.on_refresh(Instant::now()),
            AppEvent::Key(key) => {
                let now = Instant::now();
                // keep ticks flowing when input arrives faster than the refresh interval
                app.on_refresh(now);
                app.on_key(key, now);
            }
        }

        if app.should_exit() {
            break;
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
