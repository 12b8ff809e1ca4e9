//! Owns the real terminal: raw mode, the alternate screen, and restoring
//! both on exit or panic.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

/// The crossterm-backed terminal the dashboard draws into.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self {
            terminal,
            active: false,
        })
    }

    /// Take over the terminal. `title` names the monitor being watched
    /// in the window title.
    pub fn enter(&mut self, title: &str) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(SetTitle(format!("logwatch · {title}")))?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn exit(&mut self) {
        if std::mem::take(&mut self.active) {
            restore();
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.exit();
    }
}

/// Errors are ignored so a half-initialized terminal is still restored.
fn restore() {
    let mut out = stdout();
    let _ = out.execute(cursor::Show);
    let _ = out.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Install color-eyre reporting plus a panic hook that restores the
/// terminal before the report prints.
///
/// Call this before [`Tui::enter`] so a panic during startup is readable.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
