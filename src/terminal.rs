//! Terminal session guard
//!
//! Entering the TUI switches to the alternate screen and raw mode; dropping
//! the guard switches back, so early returns through `?` leave the shell usable.

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Holds the terminal in TUI mode until dropped
pub struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    /// Enables raw mode and enters the alternate screen on `out`
    pub fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self {
            out,
            raw_mode: true,
        };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }

    /// Enters the alternate screen only; raw mode is left untouched
    pub fn screen_only(mut out: W) -> io::Result<Self> {
        execute!(out, EnterAlternateScreen)?;
        Ok(Self {
            out,
            raw_mode: false,
        })
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = disable_raw_mode();
        }
        let _ = execute!(self.out, LeaveAlternateScreen);
    }
}
