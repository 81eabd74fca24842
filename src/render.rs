//! Dry-run output: the instruction plan for each window, as text or JSON.

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::orchestrator::{Instruction, WindowPlan};
use crate::window::WindowSpec;

pub fn render_plans_human(windows: &[WindowSpec]) -> String {
    let mut output = String::new();
    for (i, window) in windows.iter().enumerate() {
        let plan = WindowPlan::build(window);
        output.push_str(&format!(
            "Window {}: {} ({} pane{}, layout {})\n",
            i + 1,
            window.name(),
            window.pane_count(),
            if window.pane_count() == 1 { "" } else { "s" },
            window.layout()
        ));
        if let Some(root) = window.root() {
            output.push_str(&format!("  root: {}\n", root.display()));
        }
        for step in plan.steps() {
            output.push_str(&format!(
                "  {:>3}  pane {:<3} {:<12} {}\n",
                step.position, step.pane, step.stage, step.instruction
            ));
        }
        output.push('\n');
    }
    output
}

fn step_json(position: usize, pane: usize, stage: &str, instruction: &Instruction) -> Value {
    let mut value = json!({
        "position": position,
        "pane": pane,
        "stage": stage,
        "instruction": instruction.name(),
    });
    if let Instruction::SendText(text) = instruction {
        value["text"] = json!(text);
    }
    value
}

pub fn render_plans_json(windows: &[WindowSpec]) -> Result<String> {
    let payload: Vec<Value> = windows
        .iter()
        .map(|window| {
            let plan = WindowPlan::build(window);
            let steps: Vec<Value> = plan
                .steps()
                .iter()
                .map(|s| step_json(s.position, s.pane, s.stage.as_str(), &s.instruction))
                .collect();
            json!({
                "name": window.name(),
                "root": window.root().map(|r| r.display().to_string()),
                "layout": window.layout(),
                "panes": window.pane_count(),
                "steps": steps,
            })
        })
        .collect();

    serde_json::to_string_pretty(&payload).context("failed to serialize plan to JSON")
}
