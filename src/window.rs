//! Validated window and pane descriptions.
//!
//! A [`WindowSpec`] can only be built through [`WindowSpec::new`], which
//! enforces the invariants the orchestrator relies on: a non-empty name and
//! at least one pane.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::layout::{LayoutKind, UnknownLayout};

/// Rejected window list. Raised before anything is launched.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("config must have at least one window")]
    NoWindows,
    #[error("window {index}: missing name")]
    MissingName { index: usize },
    #[error("window name must not be empty")]
    EmptyName,
    #[error("window '{window}': must have at least one pane")]
    NoPanes { window: String },
    #[error("window '{window}': {source}")]
    UnknownLayout {
        window: String,
        #[source]
        source: UnknownLayout,
    },
}

/// One pane: the commands typed into it and where it should start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneSpec {
    pub commands: Vec<String>,
    pub root: Option<PathBuf>,
    pub focus: bool,
}

impl PaneSpec {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Compact form: a single command.
    pub fn command(command: impl Into<String>) -> Self {
        Self::new([command])
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_focus(mut self) -> Self {
        self.focus = true;
        self
    }
}

/// A window to build: its layout and its panes in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    name: String,
    root: Option<PathBuf>,
    layout: LayoutKind,
    panes: Vec<PaneSpec>,
}

impl WindowSpec {
    pub fn new(
        name: impl Into<String>,
        root: Option<PathBuf>,
        layout: LayoutKind,
        panes: Vec<PaneSpec>,
    ) -> Result<Self, SpecError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SpecError::EmptyName);
        }
        if panes.is_empty() {
            return Err(SpecError::NoPanes { window: name });
        }

        let focused: Vec<usize> = panes
            .iter()
            .enumerate()
            .filter(|(_, pane)| pane.focus)
            .map(|(i, _)| i)
            .collect();
        if focused.len() > 1 {
            warn!(
                window = %name,
                panes = ?focused,
                "several panes set focus; using pane {}",
                focused[0]
            );
        }

        if panes[0].root.is_some() {
            warn!(
                window = %name,
                "pane 0 root is ignored; the origin pane only uses the window root"
            );
        }

        Ok(Self {
            name,
            root,
            layout,
            panes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    pub fn panes(&self) -> &[PaneSpec] {
        &self.panes
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Index of the first pane marked `focus`, if any.
    pub fn focus_pane(&self) -> Option<usize> {
        self.panes.iter().position(|pane| pane.focus)
    }

    /// Directory pane `index` should `cd` into during dispatch.
    ///
    /// The origin pane never gets one: it already sits in the window root
    /// from the initial root change.
    pub fn dispatch_root(&self, index: usize) -> Option<&Path> {
        if index == 0 {
            return None;
        }
        self.panes
            .get(index)
            .and_then(|pane| pane.root.as_deref())
            .or(self.root.as_deref())
    }
}
