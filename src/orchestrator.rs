//! Window orchestrator. Turns one [`WindowSpec`] into driver calls.
//!
//! A run has two halves:
//! 1. [`WindowPlan::build`] lays out every instruction up front: the
//!    optional root change, the splits, the rewind to the origin pane, the
//!    forward walk that dispatches each pane, and the optional focus return.
//!    Building a plan does no I/O.
//! 2. [`WindowOrchestrator::run`] feeds the plan to a [`Driver`] one step at
//!    a time, pausing after each call so the application's UI can settle.
//!
//! The orchestrator never knows which pane is focused. It only knows how
//! many relative moves it has issued, which is enough because every plan
//! starts from a known point: right after the last split the newest pane is
//! active.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::driver::{Driver, DriverError};
use crate::layout::{
    LayoutStrategy, NavigationStep, Orientation, plan_navigation, plan_splits,
};
use crate::window::WindowSpec;

/// Where in a window run a step belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RootChange,
    Splitting,
    Rewinding,
    Dispatching,
    Focusing,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::RootChange => "root-change",
            Stage::Splitting => "splitting",
            Stage::Rewinding => "rewinding",
            Stage::Dispatching => "dispatching",
            Stage::Focusing => "focusing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Activate,
    Split(Orientation),
    NavigatePrevious,
    NavigateNext,
    SendText(String),
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Activate => "activate",
            Instruction::Split(Orientation::Horizontal) => "split-horizontal",
            Instruction::Split(Orientation::Vertical) => "split-vertical",
            Instruction::NavigatePrevious => "navigate-previous",
            Instruction::NavigateNext => "navigate-next",
            Instruction::SendText(_) => "send-text",
        }
    }

    fn navigate(step: NavigationStep) -> Self {
        match step {
            NavigationStep::Previous => Instruction::NavigatePrevious,
            NavigationStep::Next => Instruction::NavigateNext,
        }
    }

    fn apply<D: Driver + ?Sized>(&self, driver: &mut D) -> Result<(), DriverError> {
        match self {
            Instruction::Activate => driver.activate(),
            Instruction::Split(orientation) => driver.split(*orientation),
            Instruction::NavigatePrevious => driver.navigate_previous(),
            Instruction::NavigateNext => driver.navigate_next(),
            Instruction::SendText(text) => driver.send_text(text),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::SendText(text) => write!(f, "send-text {text:?}"),
            other => f.write_str(other.name()),
        }
    }
}

/// What a step is for. Decides how long the application gets to settle
/// after the step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    WindowRoot,
    Clear,
    Split,
    Navigate,
    Activate,
    ChangeDir,
    Command,
}

/// Fixed settle times after each kind of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    window_root: Duration,
    clear: Duration,
    split: Duration,
    navigate: Duration,
    activate: Duration,
    change_dir: Duration,
    command: Duration,
}

impl Settle {
    /// Delays tuned for keystroke automation.
    pub const STANDARD: Settle = Settle {
        window_root: Duration::from_millis(200),
        clear: Duration::from_millis(100),
        split: Duration::from_millis(400),
        navigate: Duration::from_millis(200),
        activate: Duration::from_millis(300),
        change_dir: Duration::from_millis(100),
        command: Duration::from_millis(200),
    };

    pub const NONE: Settle = Settle {
        window_root: Duration::ZERO,
        clear: Duration::ZERO,
        split: Duration::ZERO,
        navigate: Duration::ZERO,
        activate: Duration::ZERO,
        change_dir: Duration::ZERO,
        command: Duration::ZERO,
    };

    pub fn after(&self, pause: Pause) -> Duration {
        match pause {
            Pause::WindowRoot => self.window_root,
            Pause::Clear => self.clear,
            Pause::Split => self.split,
            Pause::Navigate => self.navigate,
            Pause::Activate => self.activate,
            Pause::ChangeDir => self.change_dir,
            Pause::Command => self.command,
        }
    }
}

/// One planned driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 0-based position in the window plan.
    pub position: usize,
    /// Pane the step creates, moves to, or types into.
    pub pane: usize,
    pub stage: Stage,
    pub instruction: Instruction,
    pub pause: Pause,
}

/// Every step needed to build one window, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    window: String,
    pane_count: usize,
    steps: Vec<Step>,
}

impl WindowPlan {
    pub fn build(spec: &WindowSpec) -> Self {
        let total = spec.pane_count();
        let mut plan = PlanBuilder::default();

        if let Some(root) = spec.root() {
            plan.push(
                0,
                Stage::RootChange,
                Instruction::SendText(change_dir(&root.display().to_string())),
                Pause::WindowRoot,
            );
            plan.push(
                0,
                Stage::RootChange,
                Instruction::SendText("clear".to_string()),
                Pause::Clear,
            );
        }

        let strategy = LayoutStrategy::new(spec.layout(), total);
        for op in plan_splits(&strategy, total) {
            plan.push(
                op.index,
                Stage::Splitting,
                Instruction::Split(op.orientation),
                Pause::Split,
            );
        }

        // Panes after the last one with commands get no `cd`, so nothing is
        // typed once the final command has started.
        let last_busy = spec
            .panes()
            .iter()
            .rposition(|pane| !pane.commands.is_empty());

        let navigation = plan_navigation(total);
        for (k, step) in navigation.rewind.iter().enumerate() {
            // After k + 1 moves back from the newest pane.
            plan.push(
                total - 2 - k,
                Stage::Rewinding,
                Instruction::navigate(*step),
                Pause::Navigate,
            );
        }

        for &index in &navigation.order {
            if let Some(step) = navigation.approach(index) {
                plan.push(index, Stage::Dispatching, Instruction::Activate, Pause::Activate);
                plan.push(
                    index,
                    Stage::Dispatching,
                    Instruction::navigate(step),
                    Pause::Navigate,
                );
            }

            let root = spec
                .dispatch_root(index)
                .filter(|_| last_busy.is_some_and(|last| index <= last));
            if let Some(root) = root {
                plan.push(
                    index,
                    Stage::Dispatching,
                    Instruction::SendText(change_dir(&root.display().to_string())),
                    Pause::ChangeDir,
                );
            }

            for command in &spec.panes()[index].commands {
                plan.push(
                    index,
                    Stage::Dispatching,
                    Instruction::SendText(command.clone()),
                    Pause::Command,
                );
            }
        }

        if let Some(focus) = spec.focus_pane() {
            let back = navigation.return_to(focus);
            if !back.is_empty() {
                plan.push(focus, Stage::Focusing, Instruction::Activate, Pause::Activate);
                let last = total - 1;
                for (k, step) in back.iter().enumerate() {
                    plan.push(
                        last - 1 - k,
                        Stage::Focusing,
                        Instruction::navigate(*step),
                        Pause::Navigate,
                    );
                }
            }
        }

        WindowPlan {
            window: spec.name().to_string(),
            pane_count: total,
            steps: plan.steps,
        }
    }

    pub fn window(&self) -> &str {
        &self.window
    }

    pub fn pane_count(&self) -> usize {
        self.pane_count
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.steps.iter().map(|step| &step.instruction)
    }

    fn count(&self, pred: impl Fn(&Instruction) -> bool) -> usize {
        self.instructions().filter(|i| pred(*i)).count()
    }
}

#[derive(Default)]
struct PlanBuilder {
    steps: Vec<Step>,
}

impl PlanBuilder {
    fn push(&mut self, pane: usize, stage: Stage, instruction: Instruction, pause: Pause) {
        self.steps.push(Step {
            position: self.steps.len(),
            pane,
            stage,
            instruction,
            pause,
        });
    }
}

fn change_dir(root: &str) -> String {
    format!("cd {root}")
}

/// A window run that stopped at a failed driver call.
///
/// Splits and commands issued before the failure stay in place.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrateError {
    #[error(
        "window '{window}': {instruction} failed at step {position} ({stage}, pane {pane}): {source}"
    )]
    Driver {
        window: String,
        pane: usize,
        position: usize,
        stage: Stage,
        instruction: &'static str,
        #[source]
        source: DriverError,
    },
}

/// Counts from a completed window run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub window: String,
    pub panes: usize,
    pub splits: usize,
    pub navigations: usize,
    pub texts_sent: usize,
}

/// Executes window plans against a driver.
#[derive(Debug, Clone, Copy)]
pub struct WindowOrchestrator {
    settle: Settle,
}

impl Default for WindowOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowOrchestrator {
    pub fn new() -> Self {
        Self {
            settle: Settle::STANDARD,
        }
    }

    /// Issue steps back to back. For drivers that need no settling.
    pub fn without_settle() -> Self {
        Self {
            settle: Settle::NONE,
        }
    }

    pub fn run<D: Driver + ?Sized>(
        &self,
        spec: &WindowSpec,
        driver: &mut D,
    ) -> Result<RunSummary, OrchestrateError> {
        let plan = WindowPlan::build(spec);
        info!(
            window = %plan.window(),
            panes = plan.pane_count(),
            layout = %spec.layout(),
            steps = plan.steps().len(),
            "building window"
        );
        self.execute(&plan, driver)
    }

    pub fn execute<D: Driver + ?Sized>(
        &self,
        plan: &WindowPlan,
        driver: &mut D,
    ) -> Result<RunSummary, OrchestrateError> {
        let mut stage = None;

        for step in plan.steps() {
            if stage != Some(step.stage) {
                debug!(window = %plan.window(), stage = %step.stage, "entering stage");
                stage = Some(step.stage);
            }
            debug!(
                window = %plan.window(),
                pane = step.pane,
                position = step.position,
                instruction = %step.instruction,
                "step"
            );

            step.instruction
                .apply(driver)
                .map_err(|source| OrchestrateError::Driver {
                    window: plan.window().to_string(),
                    pane: step.pane,
                    position: step.position,
                    stage: step.stage,
                    instruction: step.instruction.name(),
                    source,
                })?;

            let pause = self.settle.after(step.pause);
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }

        let summary = RunSummary {
            window: plan.window().to_string(),
            panes: plan.pane_count(),
            splits: plan.count(|i| matches!(i, Instruction::Split(_))),
            navigations: plan.count(|i| {
                matches!(i, Instruction::NavigatePrevious | Instruction::NavigateNext)
            }),
            texts_sent: plan.count(|i| matches!(i, Instruction::SendText(_))),
        };
        info!(
            window = %summary.window,
            splits = summary.splits,
            navigations = summary.navigations,
            "window complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testing::{Call, RecordingDriver};
    use crate::layout::LayoutKind;
    use crate::window::PaneSpec;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn window(layout: LayoutKind, root: Option<&str>, panes: Vec<PaneSpec>) -> WindowSpec {
        WindowSpec::new("dev", root.map(PathBuf::from), layout, panes).unwrap()
    }

    fn dev_window() -> WindowSpec {
        window(
            LayoutKind::Alternating,
            None,
            vec![
                PaneSpec::command("ls"),
                PaneSpec::command("top"),
                PaneSpec::command("code ."),
            ],
        )
    }

    fn run(spec: &WindowSpec) -> RecordingDriver {
        let mut driver = RecordingDriver::default();
        WindowOrchestrator::without_settle()
            .run(spec, &mut driver)
            .unwrap();
        driver
    }

    #[test]
    fn dev_window_end_to_end() {
        let driver = run(&dev_window());
        assert_eq!(
            driver.calls(),
            &[
                Call::SplitHorizontal,
                Call::SplitVertical,
                Call::NavigatePrevious,
                Call::NavigatePrevious,
                Call::SendText("ls".into()),
                Call::Activate,
                Call::NavigateNext,
                Call::SendText("top".into()),
                Call::Activate,
                Call::NavigateNext,
                Call::SendText("code .".into()),
            ]
        );
        assert_eq!(driver.sent_text().last(), Some(&"code ."));
    }

    #[test]
    fn single_pane_window_only_dispatches() {
        let spec = window(LayoutKind::Tiled, None, vec![PaneSpec::new(["ls", "git status"])]);
        let driver = run(&spec);
        assert_eq!(
            driver.calls(),
            &[
                Call::SendText("ls".into()),
                Call::SendText("git status".into()),
            ]
        );
    }

    #[test]
    fn window_root_changes_origin_once_and_other_panes_on_dispatch() {
        let spec = window(
            LayoutKind::EvenVertical,
            Some("/work"),
            vec![
                PaneSpec::command("ls"),
                PaneSpec::command("make").with_root("/work/build"),
                PaneSpec::new(Vec::<String>::new()),
            ],
        );
        let driver = run(&spec);
        assert_eq!(
            driver.calls(),
            &[
                Call::SendText("cd /work".into()),
                Call::SendText("clear".into()),
                Call::SplitVertical,
                Call::SplitVertical,
                Call::NavigatePrevious,
                Call::NavigatePrevious,
                Call::SendText("ls".into()),
                Call::Activate,
                Call::NavigateNext,
                Call::SendText("cd /work/build".into()),
                Call::SendText("make".into()),
                Call::Activate,
                Call::NavigateNext,
            ]
        );
        let cds = driver
            .sent_text()
            .into_iter()
            .filter(|t| *t == "cd /work")
            .count();
        assert_eq!(cds, 1, "origin pane must not get a second cd");
    }

    #[test]
    fn trailing_pane_without_commands_gets_no_cd() {
        let spec = window(
            LayoutKind::Alternating,
            None,
            vec![
                PaneSpec::command("code ."),
                PaneSpec::new(Vec::<String>::new()).with_root("/b"),
            ],
        );
        let driver = run(&spec);
        assert_eq!(driver.sent_text(), vec!["code ."]);
    }

    #[test]
    fn empty_pane_before_a_busy_one_still_changes_directory() {
        let spec = window(
            LayoutKind::EvenVertical,
            Some("/work"),
            vec![
                PaneSpec::command("ls"),
                PaneSpec::new(Vec::<String>::new()),
                PaneSpec::command("nvim"),
                PaneSpec::new(Vec::<String>::new()).with_root("/logs"),
            ],
        );
        let driver = run(&spec);
        assert_eq!(
            driver.sent_text(),
            vec!["cd /work", "clear", "ls", "cd /work", "cd /work", "nvim"]
        );
    }

    #[test]
    fn window_without_commands_only_changes_origin_root() {
        let spec = window(
            LayoutKind::Tiled,
            Some("/work"),
            vec![PaneSpec::default(), PaneSpec::default()],
        );
        let driver = run(&spec);
        assert_eq!(driver.sent_text(), vec!["cd /work", "clear"]);
    }

    #[test]
    fn pane_root_without_window_root_applies_to_that_pane_only() {
        let spec = window(
            LayoutKind::EvenHorizontal,
            None,
            vec![
                PaneSpec::command("ls"),
                PaneSpec::command("npm start").with_root("/web"),
                PaneSpec::command("htop"),
            ],
        );
        let driver = run(&spec);
        assert_eq!(driver.sent_text(), vec!["ls", "cd /web", "npm start", "htop"]);
    }

    #[test]
    fn focus_pane_gets_focus_back_after_dispatch() {
        let spec = window(
            LayoutKind::Alternating,
            None,
            vec![
                PaneSpec::command("nvim").with_focus(),
                PaneSpec::command("cargo watch"),
                PaneSpec::command("git log"),
            ],
        );
        let plan = WindowPlan::build(&spec);
        let focusing: Vec<_> = plan
            .steps()
            .iter()
            .filter(|s| s.stage == Stage::Focusing)
            .map(|s| (s.pane, s.instruction.clone()))
            .collect();
        assert_eq!(
            focusing,
            vec![
                (0, Instruction::Activate),
                (1, Instruction::NavigatePrevious),
                (0, Instruction::NavigatePrevious),
            ]
        );

        let driver = run(&spec);
        assert_eq!(driver.sent_text().last(), Some(&"git log"));
    }

    #[test]
    fn focus_on_last_pane_adds_nothing() {
        let spec = window(
            LayoutKind::Alternating,
            None,
            vec![PaneSpec::command("ls"), PaneSpec::command("vim").with_focus()],
        );
        let plan = WindowPlan::build(&spec);
        assert!(plan.steps().iter().all(|s| s.stage != Stage::Focusing));
    }

    #[test]
    fn plan_tags_stages_in_order() {
        let spec = window(
            LayoutKind::Tiled,
            Some("/srv"),
            vec![PaneSpec::command("a"), PaneSpec::command("b")],
        );
        let plan = WindowPlan::build(&spec);
        let stages: Vec<Stage> = plan.steps().iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::RootChange,
                Stage::RootChange,
                Stage::Splitting,
                Stage::Rewinding,
                Stage::Dispatching,
                Stage::Dispatching,
                Stage::Dispatching,
                Stage::Dispatching,
                Stage::Dispatching,
            ]
        );
        for (i, step) in plan.steps().iter().enumerate() {
            assert_eq!(step.position, i);
        }
    }

    #[test]
    fn driver_failure_reports_window_pane_and_step() {
        let spec = dev_window();
        // Calls 0-3 are splits and rewinds, 4 is "ls", 5 activates pane 1.
        let mut driver = RecordingDriver::failing_at(6);
        let err = WindowOrchestrator::without_settle()
            .run(&spec, &mut driver)
            .unwrap_err();

        let OrchestrateError::Driver {
            window,
            pane,
            position,
            stage,
            instruction,
            ..
        } = &err;
        assert_eq!(window, "dev");
        assert_eq!(*pane, 1);
        assert_eq!(*position, 6);
        assert_eq!(*stage, Stage::Dispatching);
        assert_eq!(*instruction, "navigate-next");
        assert!(err.to_string().contains("window 'dev'"));
        assert_eq!(driver.calls().len(), 6, "no calls after the failure");
    }

    #[test]
    fn failed_split_leaves_earlier_splits_in_place() {
        let spec = window(
            LayoutKind::EvenVertical,
            None,
            vec![PaneSpec::command("a"), PaneSpec::command("b"), PaneSpec::command("c")],
        );
        let mut driver = RecordingDriver::failing_at(1);
        let err = WindowOrchestrator::without_settle()
            .run(&spec, &mut driver)
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestrateError::Driver {
                stage: Stage::Splitting,
                pane: 2,
                ..
            }
        ));
        assert_eq!(driver.calls(), &[Call::SplitVertical]);
    }

    #[test]
    fn summary_counts_instructions() {
        let mut driver = RecordingDriver::default();
        let summary = WindowOrchestrator::without_settle()
            .run(&dev_window(), &mut driver)
            .unwrap();
        assert_eq!(
            summary,
            RunSummary {
                window: "dev".into(),
                panes: 3,
                splits: 2,
                navigations: 4,
                texts_sent: 3,
            }
        );
    }

    #[test]
    fn standard_settle_matches_step_kinds() {
        let settle = Settle::STANDARD;
        assert_eq!(settle.after(Pause::Split), Duration::from_millis(400));
        assert_eq!(settle.after(Pause::Activate), Duration::from_millis(300));
        assert_eq!(settle.after(Pause::ChangeDir), Duration::from_millis(100));
        assert!(Settle::NONE.after(Pause::Split).is_zero());
    }

    #[test]
    fn instruction_display_quotes_text() {
        assert_eq!(Instruction::SendText("ls -la".into()).to_string(), "send-text \"ls -la\"");
        assert_eq!(
            Instruction::Split(Orientation::Vertical).to_string(),
            "split-vertical"
        );
    }

    fn arb_pane() -> impl Strategy<Value = PaneSpec> {
        (
            proptest::collection::vec("[a-z]{1,6}", 0..3),
            proptest::option::of("/[a-z]{1,6}"),
        )
            .prop_map(|(commands, root)| PaneSpec {
                commands,
                root: root.map(PathBuf::from),
                focus: false,
            })
    }

    fn arb_window() -> impl Strategy<Value = WindowSpec> {
        (
            proptest::sample::select(vec![
                LayoutKind::Alternating,
                LayoutKind::Tiled,
                LayoutKind::EvenHorizontal,
                LayoutKind::EvenVertical,
            ]),
            proptest::option::of("/[a-z]{1,6}"),
            proptest::collection::vec(arb_pane(), 1..8),
        )
            .prop_map(|(layout, root, panes)| {
                WindowSpec::new("w", root.map(PathBuf::from), layout, panes).unwrap()
            })
    }

    proptest! {
        #[test]
        fn last_declared_command_is_sent_last(spec in arb_window()) {
            let driver = run(&spec);
            let expected = spec
                .panes()
                .iter()
                .rev()
                .find_map(|p| p.commands.last())
                .map(String::as_str);
            if let Some(expected) = expected {
                prop_assert_eq!(driver.sent_text().last().copied(), Some(expected));
            }
        }

        #[test]
        fn same_spec_yields_same_calls(spec in arb_window()) {
            let first = run(&spec);
            let second = run(&spec);
            prop_assert_eq!(first.calls(), second.calls());
            prop_assert_eq!(WindowPlan::build(&spec), WindowPlan::build(&spec));
        }

        #[test]
        fn cursor_offset_stays_in_range(spec in arb_window()) {
            let total = spec.pane_count() as isize;
            let plan = WindowPlan::build(&spec);
            // Track the cursor relative to the origin pane; the last split
            // leaves it on the newest pane.
            let mut cursor: isize = 0;
            for step in plan.steps() {
                match step.instruction {
                    Instruction::Split(_) => cursor += 1,
                    Instruction::NavigatePrevious => cursor -= 1,
                    Instruction::NavigateNext => cursor += 1,
                    _ => {}
                }
                prop_assert!((0..total).contains(&cursor));
                prop_assert!(step.pane < spec.pane_count());
                if step.instruction != Instruction::Activate {
                    prop_assert_eq!(step.pane as isize, cursor);
                }
            }
            prop_assert_eq!(cursor, total - 1);
        }
    }
}
