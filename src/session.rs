//! Multi-window runs.
//!
//! Windows share one application instance and its single active-pane
//! cursor, so they are built strictly one after another, in config order.
//! The first failure ends the run; windows already built stay as they are.

use tracing::info;

use crate::driver::{Backend, DriverError};
use crate::orchestrator::{OrchestrateError, RunSummary, WindowOrchestrator};
use crate::window::WindowSpec;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to launch terminal: {0}")]
    Launch(#[source] DriverError),
    #[error("window '{window}': failed to open window: {source}")]
    OpenWindow {
        window: String,
        #[source]
        source: DriverError,
    },
    #[error(transparent)]
    Window(#[from] OrchestrateError),
}

/// Launch the backend, then build every window in order.
pub fn run<B: Backend + ?Sized>(
    windows: &[WindowSpec],
    backend: &mut B,
    orchestrator: &WindowOrchestrator,
) -> Result<Vec<RunSummary>, SessionError> {
    backend.launch().map_err(SessionError::Launch)?;

    let mut summaries = Vec::with_capacity(windows.len());
    for (position, window) in windows.iter().enumerate() {
        info!(
            window = %window.name(),
            position = position + 1,
            total = windows.len(),
            "creating window"
        );
        backend
            .open_window(window.name(), position)
            .map_err(|source| SessionError::OpenWindow {
                window: window.name().to_string(),
                source,
            })?;
        summaries.push(orchestrator.run(window, backend)?);
    }
    Ok(summaries)
}
