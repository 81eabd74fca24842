//! Ghostty backend: keystrokes delivered through AppleScript.
//!
//! Ghostty has no scripting API for splits, so every instruction becomes a
//! System Events keystroke aimed at the Ghostty process and run with
//! `osascript -e`. The bindings used are Ghostty's defaults:
//!
//! | instruction        | binding       |
//! |--------------------|---------------|
//! | split horizontal   | Cmd+Shift+D   |
//! | split vertical     | Cmd+D         |
//! | previous split     | Cmd+[         |
//! | next split         | Cmd+]         |
//! | new window         | Cmd+N         |

use std::process::Command;
use std::time::Duration;

use tracing::{debug, info, trace};

use super::{Backend, Driver, DriverError};

const APP_NAME: &str = "Ghostty";
const OSASCRIPT: &str = "osascript";

/// Time Ghostty needs after `open -a` before it accepts keystrokes.
const LAUNCH_WAIT: Duration = Duration::from_millis(1500);
/// Time a freshly opened window needs before it takes input.
const NEW_WINDOW_WAIT: Duration = Duration::from_millis(500);

const KEY_CODE_RETURN: u16 = 36;
const KEY_CODE_LEFT_BRACKET: u16 = 33;
const KEY_CODE_RIGHT_BRACKET: u16 = 30;

const COMMAND: &[&str] = &["command down"];
const COMMAND_SHIFT: &[&str] = &["command down", "shift down"];

#[derive(Debug, Default)]
pub struct GhosttyDriver;

impl GhosttyDriver {
    pub fn new() -> Self {
        Self
    }

    fn keystroke(&self, key: &str, modifiers: &[&str]) -> Result<(), DriverError> {
        run_osascript(&keystroke_script(key, modifiers), "keystroke")
    }

    fn key_code(&self, code: u16, modifiers: &[&str]) -> Result<(), DriverError> {
        run_osascript(&key_code_script(code, modifiers), "key code")
    }
}

impl Driver for GhosttyDriver {
    fn activate(&mut self) -> Result<(), DriverError> {
        run_osascript(&activate_script(), "activate")
    }

    fn split_horizontal(&mut self) -> Result<(), DriverError> {
        self.keystroke("d", COMMAND_SHIFT)
    }

    fn split_vertical(&mut self) -> Result<(), DriverError> {
        self.keystroke("d", COMMAND)
    }

    fn navigate_previous(&mut self) -> Result<(), DriverError> {
        self.key_code(KEY_CODE_LEFT_BRACKET, COMMAND)
    }

    fn navigate_next(&mut self) -> Result<(), DriverError> {
        self.key_code(KEY_CODE_RIGHT_BRACKET, COMMAND)
    }

    fn send_text(&mut self, text: &str) -> Result<(), DriverError> {
        run_osascript(&type_text_script(text), "type text")
    }
}

impl Backend for GhosttyDriver {
    fn launch(&mut self) -> Result<(), DriverError> {
        let output = Command::new("open")
            .args(["-a", APP_NAME])
            .output()
            .map_err(|source| DriverError::Spawn {
                program: "open",
                source,
            })?;

        if !output.status.success() {
            return Err(DriverError::Command {
                program: "open",
                action: format!("-a {APP_NAME}"),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        std::thread::sleep(LAUNCH_WAIT);
        self.activate()?;
        info!("Ghostty launched");
        Ok(())
    }

    fn open_window(&mut self, name: &str, position: usize) -> Result<(), DriverError> {
        if position == 0 {
            return Ok(());
        }
        debug!(window = name, "opening new Ghostty window");
        self.keystroke("n", COMMAND)?;
        std::thread::sleep(NEW_WINDOW_WAIT);
        Ok(())
    }
}

fn run_osascript(script: &str, action: &str) -> Result<(), DriverError> {
    trace!(script = script.trim(), "running AppleScript");

    let output = Command::new(OSASCRIPT)
        .args(["-e", script])
        .output()
        .map_err(|source| DriverError::Spawn {
            program: OSASCRIPT,
            source,
        })?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(DriverError::Command {
            program: OSASCRIPT,
            action: action.to_string(),
            output: combined.trim().to_string(),
        });
    }

    if !output.stdout.is_empty() {
        trace!(output = %String::from_utf8_lossy(&output.stdout).trim(), "AppleScript output");
    }
    Ok(())
}

/// Escape text for use inside an AppleScript string literal.
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn modifier_clause(modifiers: &[&str]) -> String {
    if modifiers.is_empty() {
        String::new()
    } else {
        format!(" using {{{}}}", modifiers.join(", "))
    }
}

fn in_process(body: &str) -> String {
    format!(
        "tell application \"System Events\"\n\ttell process \"{APP_NAME}\"\n{body}\n\tend tell\nend tell"
    )
}

fn activate_script() -> String {
    format!("tell application \"{APP_NAME}\" to activate")
}

fn keystroke_script(key: &str, modifiers: &[&str]) -> String {
    in_process(&format!(
        "\t\tkeystroke \"{}\"{}",
        escape_applescript(key),
        modifier_clause(modifiers)
    ))
}

fn key_code_script(code: u16, modifiers: &[&str]) -> String {
    in_process(&format!("\t\tkey code {code}{}", modifier_clause(modifiers)))
}

fn type_text_script(text: &str) -> String {
    in_process(&format!(
        "\t\tkeystroke \"{}\"\n\t\tkey code {KEY_CODE_RETURN}",
        escape_applescript(text)
    ))
}
