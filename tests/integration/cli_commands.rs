//! CLI route: commands executed through `RunContext`.

use super::test_utils::with_isolated_env;
use surface_runtime::cli::{Commands, RunContext};
use tempfile::TempDir;

const SCENARIO: &str = r#"
[[steps]]
action = "create"
surface = "splash"
kind = "launch"

[[steps]]
action = "create"
surface = "main"
kind = "root"

[[steps]]
action = "root"
surface = "main"

[[steps]]
action = "destroy"
surface = "splash"

[[steps]]
action = "focus"
surface = "main"

[[steps]]
action = "fire"
event = "resumed"
"#;

#[test]
fn test_flags_command_json() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let context = RunContext::new(test_dir.path().to_path_buf(), None).unwrap();
        let output = context.execute(&Commands::Flags { json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["flags"]["deploy_type"], "development");
        assert_eq!(value["flags"]["fast_dev"], true);
        assert_eq!(value["flags"]["thread_stack_size"], 16384);
    });
}

#[test]
fn test_simulate_command_json() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let scenario = test_dir.path().join("startup.toml");
        std::fs::write(&scenario, SCENARIO).unwrap();

        let context = RunContext::new(test_dir.path().to_path_buf(), None).unwrap();
        let output = context
            .execute(&Commands::Simulate {
                scenario,
                json: true,
            })
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(report["status"]["root"], "main");
        assert_eq!(report["status"]["current"], "main");
        assert_eq!(report["status"]["stack"], serde_json::json!(["main"]));
        assert_eq!(report["events"], serde_json::json!(["resumed"]));
        assert_eq!(report["steps"].as_array().unwrap().len(), 6);
    });
}

#[test]
fn test_simulate_command_text() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let scenario = test_dir.path().join("startup.toml");
        std::fs::write(&scenario, SCENARIO).unwrap();

        let context = RunContext::new(test_dir.path().to_path_buf(), None).unwrap();
        let output = context
            .execute(&Commands::Simulate {
                scenario,
                json: false,
            })
            .unwrap();
        assert!(output.starts_with("Steps:"));
        assert!(output.contains("main registered as root"));
        assert!(output.contains("Final state:"));
    });
}

#[test]
fn test_explicit_config_file_is_used() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let config_path = test_dir.path().join("runtime.toml");
        std::fs::write(
            &config_path,
            "deploy_type = \"production\"\n[build]\nversion = \"12.1.0\"\n",
        )
        .unwrap();
        let context =
            RunContext::new(test_dir.path().to_path_buf(), Some(config_path)).unwrap();
        let output = context.execute(&Commands::Flags { json: false }).unwrap();
        assert!(output.starts_with("Runtime 12.1.0 (N/A N/A)"));
        assert!(output.contains("production"));
    });
}

#[test]
fn test_missing_scenario_file_is_an_error() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let context = RunContext::new(test_dir.path().to_path_buf(), None).unwrap();
        let result = context.execute(&Commands::Simulate {
            scenario: test_dir.path().join("missing.toml"),
            json: false,
        });
        assert!(result.is_err());
    });
}
