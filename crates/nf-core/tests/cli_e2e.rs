//! End-to-end CLI tests for nf-core.
//!
//! Runs the real binary against snapshot files in a temp dir and checks
//! exit codes and the JSON envelope on stdout.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NOW: i64 = 10_000_000;

/// A Command for the nf-core binary, isolated from the host's config files.
fn nf_core(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nf-core").expect("nf-core binary should exist");
    cmd.env_remove("NF_CONFIG")
        .env_remove("NF_CONFIG_DIR")
        .env_remove("NF_LOG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", home)
        .env("HOME", home);
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn server_snapshot(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "snapshot.json",
        r#"{
            "server.tps": [
                {"timestamp": 9880000, "value": 19.5},
                {"timestamp": 9940000, "value": 18.0},
                {"timestamp": 10000000, "value": 15.0}
            ],
            "server.tick_time": [
                {"timestamp": 9880000, "value": 3.0},
                {"timestamp": 9940000, "value": 12.0},
                {"timestamp": 10000000, "value": 150.0}
            ],
            "entities.types.minecraft.zombie": [{"timestamp": 10000000, "value": 5.0}]
        }"#,
    )
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============================================================================
// analyze
// ============================================================================

mod analyze {
    use super::*;

    #[test]
    fn produces_report_envelope() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        let output = nf_core(dir.path())
            .args(["analyze", "--snapshot"])
            .arg(&snapshot)
            .args(["--now", &NOW.to_string()])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["schema_version"], "1.0.0");
        assert_eq!(json["outcome"], "OK_CLEAN");
        assert!(json["run_id"].as_str().unwrap().starts_with("run-"));
        assert_eq!(json["config"]["using_defaults"], true);
        assert_eq!(json["report"]["distribution"]["status"], "ready");
        assert_eq!(json["report"]["correlation"]["data"]["pair_count"], 3);
    }

    #[test]
    fn empty_snapshot_exits_no_data() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_file(&dir, "empty.json", "{}");

        let output = nf_core(dir.path())
            .args(["analyze", "--snapshot"])
            .arg(&snapshot)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert_eq!(stdout_json(&output)["outcome"], "OK_NO_DATA");
    }

    #[test]
    fn non_object_snapshot_is_snapshot_error() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_file(&dir, "array.json", "[1, 2, 3]");

        nf_core(dir.path())
            .args(["analyze", "--snapshot"])
            .arg(&snapshot)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("ERR_SNAPSHOT"));
    }

    #[test]
    fn unsorted_series_is_snapshot_error() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_file(
            &dir,
            "unsorted.json",
            r#"{"server.tps": [{"timestamp": 2, "value": 1.0}, {"timestamp": 1, "value": 1.0}]}"#,
        );

        nf_core(dir.path())
            .args(["analyze", "--snapshot"])
            .arg(&snapshot)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("server.tps"));
    }

    #[test]
    fn missing_snapshot_is_io_error() {
        let dir = TempDir::new().unwrap();

        nf_core(dir.path())
            .args(["analyze", "--snapshot"])
            .arg(dir.path().join("nope.json"))
            .assert()
            .code(21);
    }

    #[test]
    fn unknown_range_is_args_error() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        nf_core(dir.path())
            .args(["analyze", "--range", "3d", "--snapshot"])
            .arg(&snapshot)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unknown range"));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        nf_core(dir.path())
            .arg("--config")
            .arg(dir.path().join("absent.json"))
            .args(["analyze", "--snapshot"])
            .arg(&snapshot)
            .assert()
            .code(11);
    }

    #[test]
    fn summary_format_is_human_readable() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        nf_core(dir.path())
            .args(["-f", "summary", "analyze", "--snapshot"])
            .arg(&snapshot)
            .args(["--now", &NOW.to_string()])
            .assert()
            .success()
            .stdout(predicate::str::contains("analyze: 3 series, range 1h"))
            .stdout(predicate::str::contains("Correlation: Server Tps vs Server Tick Time"));
    }
}

// ============================================================================
// correlate
// ============================================================================

mod correlate {
    use super::*;

    #[test]
    fn reports_coefficient() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        let output = nf_core(dir.path())
            .args(["correlate", "--x", "server.tps", "--y", "server.tick_time", "--snapshot"])
            .arg(&snapshot)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        let data = &json["correlation"]["data"];
        assert_eq!(data["pair_count"], 3);
        assert!(data["coefficient"].as_f64().unwrap() < 0.0);
    }

    #[test]
    fn unknown_metric_is_no_data() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        let output = nf_core(dir.path())
            .args(["correlate", "--x", "server.tps", "--y", "cpu.process", "--snapshot"])
            .arg(&snapshot)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json = stdout_json(&output);
        assert_eq!(json["correlation"]["status"], "no_data");
    }

    #[test]
    fn non_positive_tolerance_rejected() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        nf_core(dir.path())
            .args(["correlate", "--x", "a", "--y", "b", "--tolerance-ms", "0", "--snapshot"])
            .arg(&snapshot)
            .assert()
            .code(10);
    }
}

// ============================================================================
// watch
// ============================================================================

mod watch {
    use super::*;

    #[test]
    fn emits_one_line_per_tick() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        let output = nf_core(dir.path())
            .args(["watch", "--ticks", "2", "--interval-ms", "250", "--snapshot"])
            .arg(&snapshot)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8(output.stdout).unwrap();
        let lines: Vec<Value> = stdout
            .lines()
            .map(|l| serde_json::from_str(l).expect("each line is JSON"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tick"]["tick_number"], 1);
        assert_eq!(lines[1]["tick"]["tick_number"], 2);
        assert_eq!(lines[1]["tick"]["fresh"], true);
    }

    #[test]
    fn unreadable_source_is_snapshot_error() {
        let dir = TempDir::new().unwrap();

        nf_core(dir.path())
            .args(["watch", "--ticks", "1", "--snapshot"])
            .arg(dir.path().join("nope.json"))
            .assert()
            .code(12);
    }

    #[test]
    fn interval_below_minimum_rejected() {
        let dir = TempDir::new().unwrap();
        let snapshot = server_snapshot(&dir);

        nf_core(dir.path())
            .args(["watch", "--ticks", "1", "--interval-ms", "10", "--snapshot"])
            .arg(&snapshot)
            .assert()
            .code(10);
    }
}

// ============================================================================
// config / version
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn show_uses_defaults_without_file() {
        let dir = TempDir::new().unwrap();

        let output = nf_core(dir.path()).args(["config", "show"]).output().unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["source"]["using_defaults"], true);
        assert_eq!(json["config"]["refresh"]["interval_ms"], 5000);
    }

    #[test]
    fn validate_rejects_bad_file() {
        let dir = TempDir::new().unwrap();
        let config = write_file(
            &dir,
            "analytics.json",
            r#"{"schema_version": "1.0.0", "correlation": {"tolerance_ms": 0}}"#,
        );

        nf_core(dir.path())
            .args(["config", "validate"])
            .arg(&config)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("tolerance_ms"));
    }

    #[test]
    fn validate_accepts_good_file() {
        let dir = TempDir::new().unwrap();
        let config = write_file(
            &dir,
            "analytics.json",
            r#"{"schema_version": "1.0.0", "refresh": {"interval_ms": 1000}}"#,
        );

        nf_core(dir.path())
            .args(["-f", "summary", "config", "validate"])
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("config validate: OK"));
    }

    #[test]
    fn path_reports_env_source() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "analytics.json", r#"{"schema_version": "1.0.0"}"#);

        let output = nf_core(dir.path())
            .env("NF_CONFIG", &config)
            .args(["config", "path"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(stdout_json(&output)["source"]["source"], "environment variable");
    }

    #[test]
    fn version_prints_json() {
        let dir = TempDir::new().unwrap();
        nf_core(dir.path())
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("nf_core_version"));
    }

    #[test]
    fn unknown_command_fails() {
        let dir = TempDir::new().unwrap();
        nf_core(dir.path())
            .arg("nonexistent-command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}
