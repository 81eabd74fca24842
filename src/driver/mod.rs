//! Automation driver layer.
//!
//! A driver turns the six abstract instructions the orchestrator issues into
//! real input for one terminal application: keystrokes through AppleScript
//! for Ghostty, CLI calls for tmux. Drivers never address a pane directly;
//! every call acts on whichever pane is active.
//!
//! [`Backend`] adds the bits the orchestrator itself never calls: launching
//! the application and opening a fresh window for each configured window.

pub mod ghostty;
pub mod tmux;

#[cfg(test)]
pub mod testing;

use std::fmt;

use crate::layout::Orientation;

/// A failed automation call. Opaque to the orchestrator and fatal to the
/// window being built.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The helper program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// The helper program ran and reported failure.
    #[error("{program} {action} failed: {output}")]
    Command {
        program: &'static str,
        action: String,
        output: String,
    },
}

/// The capability the orchestrator drives.
///
/// Calls are synchronous round-trips to a single application instance and
/// must never be issued concurrently.
pub trait Driver {
    /// Bring the application to the foreground. Idempotent.
    fn activate(&mut self) -> Result<(), DriverError>;

    /// Split the active pane; the new pane appears below and becomes active.
    fn split_horizontal(&mut self) -> Result<(), DriverError>;

    /// Split the active pane; the new pane appears to the right and becomes
    /// active.
    fn split_vertical(&mut self) -> Result<(), DriverError>;

    fn navigate_previous(&mut self) -> Result<(), DriverError>;

    fn navigate_next(&mut self) -> Result<(), DriverError>;

    /// Type `text` into the active pane and submit it.
    fn send_text(&mut self, text: &str) -> Result<(), DriverError>;

    fn split(&mut self, orientation: Orientation) -> Result<(), DriverError> {
        match orientation {
            Orientation::Horizontal => self.split_horizontal(),
            Orientation::Vertical => self.split_vertical(),
        }
    }
}

impl<D: Driver + ?Sized> Driver for &mut D {
    fn activate(&mut self) -> Result<(), DriverError> {
        (**self).activate()
    }

    fn split_horizontal(&mut self) -> Result<(), DriverError> {
        (**self).split_horizontal()
    }

    fn split_vertical(&mut self) -> Result<(), DriverError> {
        (**self).split_vertical()
    }

    fn navigate_previous(&mut self) -> Result<(), DriverError> {
        (**self).navigate_previous()
    }

    fn navigate_next(&mut self) -> Result<(), DriverError> {
        (**self).navigate_next()
    }

    fn send_text(&mut self, text: &str) -> Result<(), DriverError> {
        (**self).send_text(text)
    }
}

/// A driver that also owns the application lifecycle.
pub trait Backend: Driver {
    /// Start the application (or attach to it) and wait until it accepts
    /// input.
    fn launch(&mut self) -> Result<(), DriverError>;

    /// Prepare a window to build `name` in. `position` is the window's
    /// 0-based place in the config; the first window reuses whatever the
    /// launch left open.
    fn open_window(&mut self, name: &str, position: usize) -> Result<(), DriverError>;
}

/// Backends selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    #[default]
    Ghostty,
    Tmux,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Ghostty => f.write_str("ghostty"),
            BackendKind::Tmux => f.write_str("tmux"),
        }
    }
}
