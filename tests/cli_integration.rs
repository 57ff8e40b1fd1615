use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cell-twin"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("cell-twin process should run")
}

fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn parse_metric(stdout: &str, section: &str, label: &str) -> f64 {
    let body = stdout
        .split_once(section)
        .map(|(_, rest)| rest)
        .unwrap_or_else(|| panic!("missing section `{section}` in output: {stdout}"));
    let line = body
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing KPI line `{label}` in output: {stdout}"));
    line.split_once(':')
        .map(|(_, right)| right.trim())
        .and_then(|v| v.split_whitespace().next())
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("invalid KPI format for line `{line}`"))
}

#[test]
fn scenario_files_run_and_report_expected_direction() {
    let reference = run_ok(&["--config", "scenarios/reference.toml"]);
    let saving = run_ok(&["--config", "scenarios/energy_saving.toml"]);
    let offload = run_ok(&["--config", "scenarios/neighbor_offload.toml"]);

    assert_eq!(
        parse_metric(&reference, "== Change vs baseline ==", "Total energy:"),
        0.0
    );
    assert!(parse_metric(&saving, "== Change vs baseline ==", "Total energy:") < 0.0);
    assert!(parse_metric(&offload, "== Change vs baseline ==", "Total traffic:") < 0.0);
    assert!(offload.contains("== Traffic forecast (48 h) =="));
}

#[test]
fn same_seed_gives_same_baseline() {
    let a = run_ok(&["--preset", "reference", "--seed", "7"]);
    let b = run_ok(&["--preset", "reference", "--seed", "7"]);
    assert_eq!(
        parse_metric(&a, "== Baseline ==", "Total energy:"),
        parse_metric(&b, "== Baseline ==", "Total energy:")
    );
}

#[test]
fn station_and_scenario_overrides() {
    let out = run_ok(&[
        "--station",
        "BS-2",
        "--scenario",
        "Neighbor Offload",
        "--fraction",
        "0.25",
    ]);
    assert!(out.starts_with("Station BS-2"));
    assert!(out.contains("== Neighbor Offload (25%) =="));
    assert!(out.contains("== Recommendations =="));
}

#[test]
fn invalid_inputs_exit_nonzero() {
    assert!(!run(&["--preset", "nope"]).status.success());
    assert!(!run(&["--stations", "0"]).status.success());
    assert!(!run(&["--fraction", "0.9", "--scenario", "Energy-Saving Mode"]).status.success());
    assert!(!run(&["--station", "BS-99"]).status.success());
    assert!(!run(&["--config", "a.toml", "--preset", "reference"]).status.success());
}

#[test]
fn export_dir_receives_four_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();
    run_ok(&["--preset", "energy_saving", "--export-dir", path]);

    for name in [
        "BS-1.csv",
        "BS-1_energy_saving.csv",
        "BS-1_forecast.csv",
        "BS-1_recommendations.csv",
    ] {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }
    let series = std::fs::read_to_string(dir.path().join("BS-1.csv")).unwrap();
    assert_eq!(series.lines().count(), 73);
}
