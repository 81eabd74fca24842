use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::driver::BackendKind;

#[derive(Parser, Debug)]
#[command(
    name = "ghostmux",
    about = "Open terminal windows split into declared panes and start their commands",
    version
)]
pub struct Cli {
    /// Name of a config in ~/.ghostmux/ (same as --name)
    pub config_name: Option<String>,

    /// Path to a config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of a config in ~/.ghostmux/
    #[arg(short, long, conflicts_with = "config_name")]
    pub name: Option<String>,

    /// List available configs
    #[arg(short, long)]
    pub list: bool,

    /// Validate the config and print the plan without launching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Terminal to drive
    #[arg(long, value_enum, default_value_t = BackendKind::Ghostty)]
    pub backend: BackendKind,

    /// tmux session name (tmux backend only)
    #[arg(long, default_value = crate::driver::tmux::DEFAULT_SESSION)]
    pub session: String,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<CompletionShell>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Config name from `--name`, else the positional argument unless
    /// `--config` gave a path.
    pub fn requested_name(&self) -> Option<&str> {
        let positional = self
            .config_name
            .as_deref()
            .filter(|_| self.config.is_none());
        self.name.as_deref().or(positional)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
