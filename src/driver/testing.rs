//! In-memory drivers for exercising the orchestrator without a terminal.

use super::{Backend, Driver, DriverError};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Launch,
    OpenWindow(String),
    Activate,
    SplitHorizontal,
    SplitVertical,
    NavigatePrevious,
    NavigateNext,
    SendText(String),
}

/// Records every call. Optionally fails once `fail_at` calls have succeeded.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    calls: Vec<Call>,
    fail_at: Option<usize>,
}

impl RecordingDriver {
    /// A driver whose call number `index` (0-based) fails.
    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Text sent, in order.
    pub fn sent_text(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SendText(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: Call) -> Result<(), DriverError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(DriverError::Command {
                program: "recording",
                action: format!("{call:?}"),
                output: "injected failure".to_string(),
            });
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Driver for RecordingDriver {
    fn activate(&mut self) -> Result<(), DriverError> {
        self.record(Call::Activate)
    }

    fn split_horizontal(&mut self) -> Result<(), DriverError> {
        self.record(Call::SplitHorizontal)
    }

    fn split_vertical(&mut self) -> Result<(), DriverError> {
        self.record(Call::SplitVertical)
    }

    fn navigate_previous(&mut self) -> Result<(), DriverError> {
        self.record(Call::NavigatePrevious)
    }

    fn navigate_next(&mut self) -> Result<(), DriverError> {
        self.record(Call::NavigateNext)
    }

    fn send_text(&mut self, text: &str) -> Result<(), DriverError> {
        self.record(Call::SendText(text.to_string()))
    }
}

impl Backend for RecordingDriver {
    fn launch(&mut self) -> Result<(), DriverError> {
        self.record(Call::Launch)
    }

    fn open_window(&mut self, name: &str, _position: usize) -> Result<(), DriverError> {
        self.record(Call::OpenWindow(name.to_string()))
    }
}
