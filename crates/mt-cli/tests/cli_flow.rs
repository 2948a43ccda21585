//! End-to-end tests driving the `medtrack` binary against a temp database.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

struct Harness {
    home: TempDir,
    config: NamedTempFile,
}

impl Harness {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let db_path = home.path().join("data/medications.db");

        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, r#"database_path = "{}""#, db_path.display()).unwrap();
        config.flush().unwrap();

        Self { home, config }
    }

    fn db_path(&self) -> std::path::PathBuf {
        self.home.path().join("data/medications.db")
    }

    fn run(&self, args: &[&str]) -> Output {
        let output = Command::new(env!("CARGO_BIN_EXE_medtrack"))
            .env("HOME", self.home.path())
            .env_remove("MEDTRACK_DATABASE_PATH")
            .arg("--config")
            .arg(self.config.path())
            .args(args)
            .output()
            .expect("failed to run medtrack");
        assert!(
            output.status.success(),
            "medtrack {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    fn stdout(&self, args: &[&str]) -> String {
        String::from_utf8(self.run(args).stdout).unwrap()
    }
}

fn count_rows(db_path: &Path, table: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_dorothy_scenario_end_to_end() {
    let harness = Harness::new();

    let created = harness.stdout(&["user", "add", "Dorothy Johnson", "--age", "75"]);
    assert_eq!(created.trim(), "Created user Dorothy Johnson (ID: 1)");
    assert!(harness.db_path().exists(), "database directory is created on demand");

    harness.run(&[
        "med", "add", "--user", "1", "Metformin", "500mg", "twice_daily", "--time", "08:00",
        "--time", "20:00",
    ]);
    harness.run(&[
        "med", "add", "--user", "1", "Lisinopril", "10mg", "daily", "--time", "08:00",
    ]);

    harness.run(&["dose", "log", "--user", "1", "Metformin", "08:00", "--taken"]);
    harness.run(&["dose", "log", "--user", "1", "Lisinopril", "08:00", "--taken"]);
    harness.run(&["dose", "log", "--user", "1", "Metformin", "20:00", "--missed"]);
    assert_eq!(count_rows(&harness.db_path(), "dose_logs"), 3);

    let adherence = harness.stdout(&["adherence", "--user", "1", "--days", "1", "--json"]);
    let adherence: serde_json::Value = serde_json::from_str(&adherence).unwrap();
    let rate = adherence["adherence_rate"].as_f64().unwrap();
    assert!((rate - 66.7).abs() < 0.05, "got {rate}");

    let schedule = harness.stdout(&["schedule", "--user", "1", "--json"]);
    let schedule: Vec<serde_json::Value> = serde_json::from_str(&schedule).unwrap();
    let times: Vec<&str> = schedule
        .iter()
        .map(|slot| slot["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["08:00", "08:00", "20:00"]);
}

#[test]
fn test_deactivated_medication_leaves_schedule() {
    let harness = Harness::new();
    harness.run(&["user", "add", "Walter"]);
    harness.run(&[
        "med", "add", "--user", "1", "Warfarin", "5mg", "daily", "--time", "18:00",
    ]);
    harness.run(&["med", "deactivate", "1"]);

    let schedule = harness.stdout(&["schedule", "--user", "1"]);
    assert!(schedule.contains("No doses scheduled."), "got {schedule}");
    assert_eq!(count_rows(&harness.db_path(), "medications"), 1);
}

#[test]
fn test_unvalidated_input_is_accepted() {
    let harness = Harness::new();
    harness.run(&["user", "add", "Walter"]);
    harness.run(&[
        "med", "add", "--user", "1", "Vitamin D", "1000IU", "weekly", "--time", "9:00",
    ]);
    harness.run(&["dose", "log", "--user", "1", "Ibuprofen", "12:00", "--taken"]);

    assert_eq!(count_rows(&harness.db_path(), "medications"), 1);
    assert_eq!(count_rows(&harness.db_path(), "dose_logs"), 1);
}

#[test]
fn test_demo_prints_adherence() {
    let harness = Harness::new();

    let output = harness.stdout(&["demo"]);

    assert!(output.contains("Today's adherence rate: 66.7%"), "got {output}");
    assert!(output.contains("Generated daily schedule with 3 doses"));
}
