use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

pub type Backend = CrosstermBackend<Stdout>;

/// Raw mode, alternate screen and hidden cursor, held for the session's lifetime.
///
/// `restore` undoes the setup once; `Drop` covers every path that skips it.
pub struct TerminalSession {
    terminal: Terminal<Backend>,
    restored: bool,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        match prepare() {
            Ok(terminal) => Ok(Self {
                terminal,
                restored: false,
            }),
            Err(err) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
                let _ = disable_raw_mode();
                Err(err)
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<Backend> {
        &mut self.terminal
    }

    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        teardown(&mut self.terminal)
    }
}

/// The three steps that hand the shell back, in the order they must run.
trait Teardown {
    fn leave_raw_mode(&mut self) -> Result<()>;
    fn leave_alternate_screen(&mut self) -> Result<()>;
    fn show_cursor(&mut self) -> Result<()>;
}

impl Teardown for Terminal<Backend> {
    fn leave_raw_mode(&mut self) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        execute!(self.backend_mut(), LeaveAlternateScreen, Show)
            .context("failed to leave alternate screen")
    }

    fn show_cursor(&mut self) -> Result<()> {
        Terminal::show_cursor(self).context("failed to show cursor")
    }
}

/// Runs every step even after a failure and reports the first error.
fn teardown<T: Teardown>(target: &mut T) -> Result<()> {
    let raw = target.leave_raw_mode();
    let screen = target.leave_alternate_screen();
    let cursor = target.show_cursor();
    raw.and(screen).and(cursor)
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn prepare() -> Result<Terminal<Backend>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Puts the shell back before the panic message prints.
pub fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        original(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Default)]
    struct RecordingTeardown {
        steps: Vec<&'static str>,
        failing: Vec<&'static str>,
    }

    impl RecordingTeardown {
        fn step(&mut self, name: &'static str) -> Result<()> {
            self.steps.push(name);
            if self.failing.contains(&name) {
                return Err(anyhow!("{name} failed"));
            }
            Ok(())
        }
    }

    impl Teardown for RecordingTeardown {
        fn leave_raw_mode(&mut self) -> Result<()> {
            self.step("raw")
        }

        fn leave_alternate_screen(&mut self) -> Result<()> {
            self.step("screen")
        }

        fn show_cursor(&mut self) -> Result<()> {
            self.step("cursor")
        }
    }

    #[test]
    fn failed_raw_mode_still_leaves_screen_and_shows_cursor() {
        let mut target = RecordingTeardown {
            failing: vec!["raw"],
            ..Default::default()
        };
        let err = teardown(&mut target).expect_err("raw mode failure");
        assert_eq!(err.to_string(), "raw failed");
        assert_eq!(target.steps, vec!["raw", "screen", "cursor"]);
    }

    #[test]
    fn first_error_wins_when_several_steps_fail() {
        let mut target = RecordingTeardown {
            failing: vec!["screen", "cursor"],
            ..Default::default()
        };
        let err = teardown(&mut target).expect_err("screen failure");
        assert_eq!(err.to_string(), "screen failed");
        assert_eq!(target.steps.len(), 3);
    }

    #[test]
    fn clean_teardown_runs_every_step_in_order() {
        let mut target = RecordingTeardown::default();
        teardown(&mut target).expect("clean teardown");
        assert_eq!(target.steps, vec!["raw", "screen", "cursor"]);
    }
}
