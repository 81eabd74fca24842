//! tmux backend.
//!
//! Wraps the tmux CLI: one detached session per run, one tmux window per
//! configured window, and relative pane moves through `select-pane -t .-/.+`.
//! Split panes are inserted right after the active pane, so depth-first
//! growth leaves pane indices in creation order and the relative moves walk
//! them the same way Ghostty's previous/next split bindings do.

use std::process::{Command, Output};

use tracing::{debug, info, warn};

use super::{Backend, Driver, DriverError};
use crate::layout::Orientation;

const TMUX: &str = "tmux";

/// Default session name used when none is given on the command line.
pub const DEFAULT_SESSION: &str = "ghostmux";

/// Convention for session names: punctuation tmux would parse as a target
/// separator is replaced with `-`.
pub fn session_name(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if sanitized.is_empty() {
        DEFAULT_SESSION.to_string()
    } else {
        sanitized
    }
}

fn run_tmux<I, S>(args: I) -> Result<Output, DriverError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(TMUX)
        .args(args)
        .output()
        .map_err(|source| DriverError::Spawn {
            program: TMUX,
            source,
        })
}

/// Run a tmux command and return its trimmed stdout, or fail with stderr.
fn tmux_checked(action: &str, args: &[&str]) -> Result<String, DriverError> {
    let output = run_tmux(args)?;
    if !output.status.success() {
        return Err(DriverError::Command {
            program: TMUX,
            action: action.to_string(),
            output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check that tmux is installed and reachable.
pub fn check_tmux() -> Result<String, DriverError> {
    let version = tmux_checked("-V", &["-V"])?;
    debug!(version = %version, "tmux found");
    Ok(version)
}

/// Check if a tmux session exists.
pub fn session_exists(session: &str) -> bool {
    run_tmux(["has-session", "-t", session])
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Create a detached session and return the id of its initial window.
pub fn create_session(session: &str) -> Result<String, DriverError> {
    if session_exists(session) {
        return Err(DriverError::Command {
            program: TMUX,
            action: "new-session".to_string(),
            output: format!(
                "session '{session}' already exists; attach with `tmux attach -t {session}` \
                 or kill it with `tmux kill-session -t {session}`"
            ),
        });
    }

    let window_id = tmux_checked(
        "new-session",
        &[
            "new-session",
            "-d",
            "-s",
            session,
            "-x",
            "220",
            "-y",
            "50",
            "-P",
            "-F",
            "#{window_id}",
        ],
    )?;

    if let Err(e) = tmux_checked("set mouse", &["set", "-t", session, "mouse", "on"]) {
        warn!(session = session, error = %e, "failed to enable tmux mouse mode");
    }

    info!(session = session, "tmux session created");
    Ok(window_id)
}

fn split_args(target: &str, orientation: Orientation) -> [&str; 4] {
    // tmux names the axis of the divider: -v stacks panes, -h places them
    // side by side.
    let flag = match orientation {
        Orientation::Horizontal => "-v",
        Orientation::Vertical => "-h",
    };
    ["split-window", flag, "-t", target]
}

fn relative_pane(window: &str, offset: char) -> String {
    format!("{window}.{offset}")
}

/// Drives one tmux session, one window at a time.
#[derive(Debug)]
pub struct TmuxDriver {
    session: String,
    window: Option<String>,
}

impl TmuxDriver {
    pub fn new(session: &str) -> Self {
        Self {
            session: session_name(session),
            window: None,
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// Target for the window currently being built. Before launch this is
    /// the session, which tmux resolves to its current window.
    fn target(&self) -> &str {
        self.window.as_deref().unwrap_or(&self.session)
    }
}

impl Driver for TmuxDriver {
    fn activate(&mut self) -> Result<(), DriverError> {
        let target = self.target().to_string();
        tmux_checked("select-window", &["select-window", "-t", &target])?;
        Ok(())
    }

    fn split_horizontal(&mut self) -> Result<(), DriverError> {
        tmux_checked(
            "split-window",
            &split_args(self.target(), Orientation::Horizontal),
        )?;
        Ok(())
    }

    fn split_vertical(&mut self) -> Result<(), DriverError> {
        tmux_checked(
            "split-window",
            &split_args(self.target(), Orientation::Vertical),
        )?;
        Ok(())
    }

    fn navigate_previous(&mut self) -> Result<(), DriverError> {
        let target = relative_pane(self.target(), '-');
        tmux_checked("select-pane", &["select-pane", "-t", &target])?;
        Ok(())
    }

    fn navigate_next(&mut self) -> Result<(), DriverError> {
        let target = relative_pane(self.target(), '+');
        tmux_checked("select-pane", &["select-pane", "-t", &target])?;
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), DriverError> {
        let target = self.target().to_string();
        if !text.is_empty() {
            // `-l` sends text literally so punctuation is not read as key names.
            tmux_checked("send-keys", &["send-keys", "-t", &target, "-l", "--", text])?;
        }
        tmux_checked("send-keys Enter", &["send-keys", "-t", &target, "C-m"])?;
        debug!(target = %target, text = text, "sent keys");
        Ok(())
    }
}

impl Backend for TmuxDriver {
    fn launch(&mut self) -> Result<(), DriverError> {
        check_tmux()?;
        let window = create_session(&self.session)?;
        self.window = Some(window);
        Ok(())
    }

    fn open_window(&mut self, name: &str, position: usize) -> Result<(), DriverError> {
        if position == 0 {
            if let Some(window) = self.window.clone() {
                tmux_checked("rename-window", &["rename-window", "-t", &window, name])?;
                return Ok(());
            }
        }

        let session_target = format!("{}:", self.session);
        let window = tmux_checked(
            "new-window",
            &[
                "new-window",
                "-t",
                &session_target,
                "-n",
                name,
                "-P",
                "-F",
                "#{window_id}",
            ],
        )?;
        debug!(window = name, id = %window, "tmux window created");
        self.window = Some(window);
        Ok(())
    }
}
