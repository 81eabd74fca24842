use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use ghostmux::cli::Cli;
use ghostmux::config::Config;
use ghostmux::driver::ghostty::GhosttyDriver;
use ghostmux::driver::tmux::TmuxDriver;
use ghostmux::driver::{Backend, BackendKind};
use ghostmux::orchestrator::WindowOrchestrator;
use ghostmux::{paths, render, session, shell_completion};

fn configs_dir() -> Result<PathBuf> {
    paths::config_dir().context("could not determine home directory for ~/.ghostmux")
}

fn print_available_configs(dir: &Path) -> Result<()> {
    let names = paths::list_configs(dir)?;
    if names.is_empty() {
        println!("No configs found in {}", dir.display());
        println!();
        println!("Create one with:");
        println!("  mkdir -p {}", dir.display());
        println!("  $EDITOR {}/my-project.yml", dir.display());
        return Ok(());
    }

    println!("Available configs:");
    for name in &names {
        println!("  • {name}");
    }
    println!();
    println!("Launch with: ghostmux <config-name>");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "ghostmux=info",
        1 => "ghostmux=debug",
        _ => "ghostmux=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Some(shell) = cli.completions {
        return shell_completion::print(shell);
    }

    let configs_dir = configs_dir()?;
    if cli.list {
        return print_available_configs(&configs_dir);
    }

    let cwd = std::env::current_dir().context("failed to get current directory (was it deleted?)")?;
    let config_path = paths::resolve_config_path(
        cli.requested_name(),
        cli.config.as_deref(),
        &configs_dir,
        &cwd,
    );

    let windows = Config::load(&config_path)?;
    info!(
        config = %config_path.display(),
        windows = windows.len(),
        "loaded config"
    );

    if cli.dry_run {
        if cli.json {
            println!("{}", render::render_plans_json(&windows)?);
        } else {
            println!("✓ Config valid: {}", config_path.display());
            println!();
            print!("{}", render::render_plans_human(&windows));
        }
        return Ok(());
    }

    let orchestrator = WindowOrchestrator::new();
    let mut backend: Box<dyn Backend> = match cli.backend {
        BackendKind::Ghostty => Box::new(GhosttyDriver::new()),
        BackendKind::Tmux => Box::new(TmuxDriver::new(&cli.session)),
    };
    debug!(backend = %cli.backend, "starting backend");

    let summaries = session::run(&windows, backend.as_mut(), &orchestrator)?;
    info!(windows = summaries.len(), "done");

    if cli.backend == BackendKind::Tmux {
        println!(
            "[ghostmux] attach with: tmux attach -t {}",
            ghostmux::driver::tmux::session_name(&cli.session)
        );
    }

    Ok(())
}
