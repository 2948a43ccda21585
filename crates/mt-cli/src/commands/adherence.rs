//! Adherence command.
//!
//! The rate is computed by the store over logged doses only. Doses that were
//! scheduled but never logged do not count against the user.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use mt_core::{DEFAULT_ADHERENCE_WINDOW_DAYS, UserId};
use mt_db::Database;

#[derive(Debug, Args)]
pub struct AdherenceArgs {
    /// User ID.
    #[arg(long)]
    pub user: i64,
    /// Trailing window in days, counted by calendar date.
    #[arg(long, default_value_t = DEFAULT_ADHERENCE_WINDOW_DAYS)]
    pub days: u32,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct AdherenceReport<'a> {
    user_id: i64,
    name: &'a str,
    days: u32,
    adherence_rate: f64,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &AdherenceArgs) -> Result<()> {
    let user_id = UserId::new(args.user);
    let Some(user) = db.get_user(user_id)? else {
        bail!("user not found: {}", args.user);
    };
    let rate = db.adherence_rate(user_id, args.days)?;

    if args.json {
        let report = AdherenceReport {
            user_id: args.user,
            name: &user.name,
            days: args.days,
            adherence_rate: rate,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "Adherence for {} over the last {} day(s): {rate:.1}%",
        user.name, args.days
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use mt_core::DoseLog;

    use insta::assert_snapshot;

    fn seeded() -> (tempfile::TempDir, Database) {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();
        let user_id = db.create_user("Dorothy Johnson", Some(75)).unwrap();
        for (name, time, taken) in [
            ("Metformin", "08:00", true),
            ("Lisinopril", "08:00", true),
            ("Metformin", "20:00", false),
        ] {
            db.create_dose_log(user_id, &DoseLog::new(name, time, taken, None))
                .unwrap();
        }
        (temp, db)
    }

    #[test]
    fn adherence_reports_percentage() {
        let (_temp, db) = seeded();
        let args = AdherenceArgs {
            user: 1,
            days: 1,
            json: false,
        };

        let mut output = Vec::new();
        run(&mut output, &db, &args).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Adherence for Dorothy Johnson over the last 1 day(s): 66.7%");
    }

    #[test]
    fn adherence_json() {
        let (_temp, db) = seeded();
        let args = AdherenceArgs {
            user: 1,
            days: 7,
            json: true,
        };

        let mut output = Vec::new();
        run(&mut output, &db, &args).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["user_id"], 1);
        assert_eq!(value["days"], 7);
        let rate = value["adherence_rate"].as_f64().unwrap();
        assert!((rate - 66.7).abs() < 0.05);
    }

    #[test]
    fn adherence_is_zero_for_user_without_logs() {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();
        db.create_user("Walter", None).unwrap();
        let args = AdherenceArgs {
            user: 1,
            days: 7,
            json: false,
        };

        let mut output = Vec::new();
        run(&mut output, &db, &args).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Adherence for Walter over the last 7 day(s): 0.0%");
    }
}
