use std::io::{self, Write};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to ring terminal bell: {0}")]
    Io(#[from] io::Error),
}

/// Something that can make a short "next question" sound
pub trait Notifier {
    fn play_notification(&mut self) -> Result<(), NotifyError>;
}

/// Rings the terminal bell by writing BEL to the wrapped writer
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Notifier for TerminalBell<W> {
    fn play_notification(&mut self) -> Result<(), NotifyError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Used with `--mute` and in tests
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn play_notification(&mut self) -> Result<(), NotifyError> {
        Ok(())
    }
}
