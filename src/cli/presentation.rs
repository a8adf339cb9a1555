//! CLI presentation: text tables and JSON for flags and scenario reports.

use crate::cli::scenario::SimulationReport;
use crate::error::RuntimeError;
use crate::properties::{BuildInfo, FeatureFlags};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RuntimeError> {
    serde_json::to_string_pretty(value).map_err(|e| RuntimeError::ConfigError(e.to_string()))
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn or_none(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

pub fn format_flags_text(flags: &FeatureFlags, build: &BuildInfo) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Flag", "Value"]);
    table.add_row(vec!["deploy type".to_string(), flags.deploy_type.as_str().to_string()]);
    table.add_row(vec!["debug".to_string(), yes_no(flags.debug)]);
    table.add_row(vec!["legacy window".to_string(), yes_no(flags.legacy_window)]);
    table.add_row(vec!["fast dev".to_string(), yes_no(flags.fast_dev)]);
    table.add_row(vec!["coverage".to_string(), yes_no(flags.coverage)]);
    table.add_row(vec!["compile js".to_string(), yes_no(flags.compile_js)]);
    table.add_row(vec!["default unit".to_string(), flags.default_unit.clone()]);
    table.add_row(vec![
        "thread stack size".to_string(),
        flags.thread_stack_size.to_string(),
    ]);
    format!("Runtime {}\n\n{}", build, table)
}

pub fn format_flags_json(flags: &FeatureFlags, build: &BuildInfo) -> Result<String, RuntimeError> {
    to_json(&serde_json::json!({
        "build": build,
        "flags": flags,
    }))
}

pub fn format_report_text(report: &SimulationReport) -> String {
    let mut steps = Table::new();
    steps.load_preset(UTF8_BORDERS_ONLY);
    steps.set_header(vec!["#", "Action", "Result"]);
    for step in &report.steps {
        steps.add_row(vec![
            (step.index + 1).to_string(),
            step.action.clone(),
            step.detail.clone(),
        ]);
    }

    let status = &report.status;
    let mut state = Table::new();
    state.load_preset(UTF8_BORDERS_ONLY);
    state.set_header(vec!["State", "Value"]);
    state.add_row(vec!["root".to_string(), or_none(&status.root)]);
    state.add_row(vec!["root ready".to_string(), yes_no(status.root_ready)]);
    state.add_row(vec!["current".to_string(), or_none(&status.current)]);
    state.add_row(vec!["focused".to_string(), or_none(&status.focused)]);
    state.add_row(vec!["stack".to_string(), status.stack.join(" > ")]);
    state.add_row(vec!["transitioning".to_string(), yes_no(status.transitioning)]);
    state.add_row(vec!["restart pending".to_string(), yes_no(status.restart_pending)]);
    state.add_row(vec!["cache evictions".to_string(), report.evictions.to_string()]);
    state.add_row(vec!["events".to_string(), report.events.join(", ")]);

    format!("Steps:\n{}\n\nFinal state:\n{}", steps, state)
}

pub fn format_report_json(report: &SimulationReport) -> Result<String, RuntimeError> {
    to_json(report)
}
