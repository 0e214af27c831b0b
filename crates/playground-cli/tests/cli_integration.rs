use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const AGENTS: &str = r##"[
  {"id": "a1", "name": "Planner", "role": "Strategy", "color": "#4f7cff", "suggestion": "Break the goal into milestones."},
  {"id": "a2", "name": "Researcher", "role": "Discovery", "color": "#22a06b", "suggestion": "Collect three reference designs."},
  {"id": "a3", "name": "Critic", "role": "Review", "color": "#e5484d", "suggestion": "Question the riskiest assumption."}
]"##;

/// Helper to create a public directory and a config file pointing at it.
fn create_test_config(temp_dir: &TempDir) -> String {
    let public = temp_dir.path().join("public");
    fs::create_dir_all(public.join("data")).unwrap();
    fs::write(public.join("index.html"), "<h1>playground</h1>").unwrap();
    fs::write(public.join("styles.css"), "body {}").unwrap();
    fs::write(public.join("data/agents.json"), AGENTS).unwrap();

    let config_content = r#"name: test-playground
server:
  public_dir: public
agents:
  source: public/data/agents.json
analysis:
  default_latency: 20ms
  latency_overrides:
    a1: 150ms
compare:
  max_slots: 2
logging:
  level: error
"#;

    let config_path = temp_dir.path().join("playground.yaml");
    fs::write(&config_path, config_content).unwrap();

    config_path.to_str().unwrap().to_string()
}

fn playground(config_path: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_playground"))
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env_remove("PLAYGROUND_LOG")
        .env_remove("PORT")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_cli_select_last_selection_wins() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(&config_path, &["select", "a1", "a2"]);
    assert!(
        output.status.success(),
        "select failed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let out = stdout(&output);
    assert!(out.contains("[main] Analyzing Planner..."), "{}", out);
    assert!(out.contains("[main] Analyzing Researcher..."));
    assert!(out.contains("Researcher (Discovery)"));
    // The slower, superseded analysis never renders.
    assert!(!out.contains("Planner (Strategy)"));
    assert!(out.contains("showing: Researcher (a2)"));
    assert!(out.contains("\"committed\":1"));
    assert!(out.contains("\"discarded\":1"));
}

#[test]
fn test_cli_select_with_gap() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    // a2 finishes before a3 is selected, so both commit.
    let output = playground(&config_path, &["select", "a2", "a3", "--gap-ms", "100"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Researcher (Discovery)"));
    assert!(out.contains("showing: Critic (a3)"));
    assert!(out.contains("\"committed\":2"));
}

#[test]
fn test_cli_select_unknown_agent_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(&config_path, &["select", "a9"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("a9"));
}

#[test]
fn test_cli_compare_rejects_third() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(&config_path, &["compare", "a1", "a2", "a3"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[main] warning: You can compare up to 2 agents."));
    assert!(out.contains("slot0: Planner (a1)"));
    assert!(out.contains("slot1: Researcher (a2)"));
}

#[test]
fn test_cli_compare_toggle_off() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(&config_path, &["compare", "a1", "a2", "a1"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("slot0: empty"));
    assert!(out.contains("slot1: Researcher (a2)"));
}

#[test]
fn test_cli_agents_query() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(&config_path, &["agents"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 3);

    let output = playground(&config_path, &["agents", "--query", "REVIEW"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("Critic"));
}

#[test]
fn test_cli_resolve() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(
        &config_path,
        &["resolve", "/", "/styles.css?v=2", "/assets/missing.png", "/../../etc/passwd"],
    );
    assert!(output.status.success());
    let lines: Vec<String> = stdout(&output).lines().map(String::from).collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("/\tfound ") && lines[0].ends_with("index.html"));
    assert!(lines[1].starts_with("/styles.css?v=2\tfound ") && lines[1].ends_with("styles.css"));
    assert!(lines[2].starts_with("/assets/missing.png\tnot-found "));
    assert_eq!(lines[3], "/../../etc/passwd\tforbidden");
}

#[test]
fn test_cli_config_prints_effective_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = create_test_config(&temp_dir);

    let output = playground(&config_path, &["config"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("name: test-playground"));
    assert!(out.contains("max_slots: 2"));
    // Relative paths are anchored at the config file's directory.
    assert!(out.contains(&temp_dir.path().join("public").display().to_string()));
}

#[test]
fn test_cli_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.yaml");
    fs::write(&config_path, "compare:\n  max_slots: 0\n").unwrap();

    let output = playground(config_path.to_str().unwrap(), &["config"]);
    assert!(!output.status.success());
}
