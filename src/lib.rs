//! ghostmux: declarative multi-pane terminal layouts.
//!
//! A config names windows and, for each window, the panes to split off and
//! the commands to start in them. The layout engine turns that into relative
//! split and navigation instructions, and a backend delivers them to Ghostty
//! (AppleScript keystrokes) or tmux.

pub mod cli;
pub mod config;
pub mod driver;
pub mod layout;
pub mod orchestrator;
pub mod paths;
pub mod render;
pub mod session;
pub mod shell_completion;
pub mod window;
