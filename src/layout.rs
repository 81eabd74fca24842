//! Layout planning: split sequences and relative navigation.
//!
//! The automation backends only understand "split the active pane" and "move
//! to the previous/next pane". This module turns a layout kind and a pane
//! count into:
//! - the ordered split operations that grow one pane into N, and
//! - the navigation plan that rewinds to the origin pane and walks forward
//!   through every pane exactly once.
//!
//! Nothing here touches a driver. Plans are plain data so they can be
//! rendered for `--dry-run` and tested without a terminal.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Names accepted for [`LayoutKind`] in config files.
pub const LAYOUT_NAMES: [&str; 4] = ["alternating", "tiled", "even-horizontal", "even-vertical"];

/// How a window's panes are arranged as they are split off one another.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Zig-zag: odd panes split horizontally, even panes vertically.
    #[default]
    Alternating,
    /// Front half splits vertically, back half horizontally.
    Tiled,
    /// Every pane stacked top-to-bottom.
    EvenHorizontal,
    /// Every pane side-by-side.
    EvenVertical,
}

impl LayoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Alternating => "alternating",
            LayoutKind::Tiled => "tiled",
            LayoutKind::EvenHorizontal => "even-horizontal",
            LayoutKind::EvenVertical => "even-vertical",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a layout name outside [`LAYOUT_NAMES`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout '{0}' (expected one of: alternating, tiled, even-horizontal, even-vertical)")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutKind {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alternating" => Ok(LayoutKind::Alternating),
            "tiled" => Ok(LayoutKind::Tiled),
            "even-horizontal" => Ok(LayoutKind::EvenHorizontal),
            "even-vertical" => Ok(LayoutKind::EvenVertical),
            other => Err(UnknownLayout(other.to_string())),
        }
    }
}

/// Axis along which the active pane is divided.
///
/// `Horizontal` puts the new pane below the current one, `Vertical` puts it
/// to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => f.write_str("horizontal"),
            Orientation::Vertical => f.write_str("vertical"),
        }
    }
}

/// Orientation policy for one window.
///
/// Pure: the answer depends only on the kind, the window's pane count and
/// the index passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutStrategy {
    kind: LayoutKind,
    total_panes: usize,
}

impl LayoutStrategy {
    pub fn new(kind: LayoutKind, total_panes: usize) -> Self {
        Self { kind, total_panes }
    }

    /// Orientation for creating pane `index` (1-based, `1..total_panes`).
    pub fn next_split(&self, index: usize) -> Orientation {
        match self.kind {
            LayoutKind::Alternating => alternating(index),
            LayoutKind::Tiled => tiled(index, self.total_panes),
            LayoutKind::EvenHorizontal => Orientation::Horizontal,
            LayoutKind::EvenVertical => Orientation::Vertical,
        }
    }
}

fn alternating(index: usize) -> Orientation {
    if index % 2 == 0 {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

fn tiled(index: usize, total_panes: usize) -> Orientation {
    if index <= total_panes / 2 {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

/// One split, creating pane `index` out of the currently active pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOp {
    pub orientation: Orientation,
    pub index: usize,
}

/// Produce the splits that grow one pane into `total_panes`.
///
/// Each split acts on the pane created by the previous one, so the ops come
/// out in strictly increasing index order, `1..total_panes`.
pub fn plan_splits(strategy: &LayoutStrategy, total_panes: usize) -> Vec<SplitOp> {
    (1..total_panes)
        .map(|index| SplitOp {
            orientation: strategy.next_split(index),
            index,
        })
        .collect()
}

/// A relative focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStep {
    Previous,
    Next,
}

/// How to visit every pane once after the splits are done.
///
/// Right after the last split the newest pane is active. The plan rewinds to
/// pane 0 with `rewind`, then dispatches panes in `order`, taking one
/// [`NavigationStep::Next`] before each pane after the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlan {
    pub rewind: Vec<NavigationStep>,
    pub order: Vec<usize>,
}

impl NavigationPlan {
    /// Navigation needed before dispatching pane `index`.
    pub fn approach(&self, index: usize) -> Option<NavigationStep> {
        (index > 0).then_some(NavigationStep::Next)
    }

    /// Steps that return focus from the last pane in `order` to `target`.
    ///
    /// After the forward walk the cursor sits `order.len() - 1` panes past
    /// the origin, so the distance back is a plain offset.
    pub fn return_to(&self, target: usize) -> Vec<NavigationStep> {
        let last = self.order.len().saturating_sub(1);
        vec![NavigationStep::Previous; last.saturating_sub(target)]
    }
}

pub fn plan_navigation(total_panes: usize) -> NavigationPlan {
    NavigationPlan {
        rewind: vec![NavigationStep::Previous; total_panes.saturating_sub(1)],
        order: (0..total_panes).collect(),
    }
}
