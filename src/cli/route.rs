//! CLI route: single route table and run context. Dispatches to the library and presentation.

use crate::app::Application;
use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_flags_json, format_flags_text, format_report_json, format_report_text,
};
use crate::cli::scenario::{Scenario, ScenarioRunner};
use crate::config::{ConfigLoader, RuntimeConfig};
use crate::error::RuntimeError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: workspace and resolved configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: RuntimeConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, RuntimeError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?.validated()?,
            None => RuntimeConfig::load_validated(&workspace_root)?,
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, RuntimeError> {
        let started = Instant::now();
        let result = match command {
            Commands::Flags { json } => self.handle_flags(*json),
            Commands::Simulate { scenario, json } => self.handle_simulate(scenario, *json),
        };
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            elapsed = ?started.elapsed(),
            "Command finished"
        );
        result
    }

    fn handle_flags(&self, json: bool) -> Result<String, RuntimeError> {
        let app = Application::new(&self.config);
        if json {
            format_flags_json(app.flags(), app.build_info())
        } else {
            Ok(format_flags_text(app.flags(), app.build_info()))
        }
    }

    fn handle_simulate(&self, path: &Path, json: bool) -> Result<String, RuntimeError> {
        let scenario = Scenario::load(path)?;
        let report = ScenarioRunner::new(Application::new(&self.config)).run(&scenario)?;
        if json {
            format_report_json(&report)
        } else {
            Ok(format_report_text(&report))
        }
    }
}
