//! CLI domain: parse, route, help, output, and presentation only.
//! Scenario execution lives in `scenario`; everything else delegates to the library.

mod help;
mod output;
mod parse;
mod presentation;
mod route;
mod scenario;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_flags_json, format_flags_text, format_report_json, format_report_text,
};
pub use route::RunContext;
pub use scenario::{Scenario, ScenarioRunner, SimulationReport, Step, StepOutcome};
