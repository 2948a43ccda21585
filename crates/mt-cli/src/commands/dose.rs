//! Dose logging command.

use std::io::Write;

use anyhow::Result;
use clap::{ArgGroup, Args};

use mt_core::{DoseLog, UserId};
use mt_db::Database;

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("outcome").required(true).args(["taken", "missed"])))]
pub struct LogDoseArgs {
    /// User who took or missed the dose.
    #[arg(long)]
    pub user: i64,
    /// Medication name as entered when it was added.
    pub medication: String,
    /// Scheduled time of the dose (HH:MM).
    pub scheduled_time: String,
    /// The dose was taken.
    #[arg(long)]
    pub taken: bool,
    /// The dose was missed.
    #[arg(long)]
    pub missed: bool,
    /// Time the dose was actually taken (HH:MM). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Stores a dose log. Unknown medication names are logged and kept.
pub fn log<W: Write>(writer: &mut W, db: &Database, args: &LogDoseArgs) -> Result<()> {
    let user_id = UserId::new(args.user);
    let known = db
        .list_active_medications(user_id)?
        .iter()
        .any(|record| record.medication.name == args.medication);
    if !known {
        tracing::warn!(
            user = %user_id,
            medication = %args.medication,
            "no active medication with this name"
        );
    }

    let dose = DoseLog::new(
        args.medication.as_str(),
        args.scheduled_time.as_str(),
        args.taken,
        args.at.clone(),
    );
    let id = db.create_dose_log(user_id, &dose)?;
    writeln!(writer, "Logged {dose} (ID: {id})")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn args(medication: &str, scheduled_time: &str, taken: bool) -> LogDoseArgs {
        LogDoseArgs {
            user: 1,
            medication: medication.to_string(),
            scheduled_time: scheduled_time.to_string(),
            taken,
            missed: !taken,
            at: None,
        }
    }

    #[test]
    fn log_records_taken_and_missed() {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();

        let mut output = Vec::new();
        log(&mut output, &db, &args("Metformin", "08:00", true)).unwrap();
        log(&mut output, &db, &args("Metformin", "20:00", false)).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Logged Metformin at 08:00: Taken (ID: 1)
        Logged Metformin at 20:00: Missed (ID: 2)
        ");
        assert_eq!(db.list_dose_logs(UserId::new(1)).unwrap().len(), 2);
    }

    #[test]
    fn log_keeps_supplied_actual_time() {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();
        let mut dose = args("Lisinopril", "08:00", true);
        dose.at = Some("08:30".to_string());

        let mut output = Vec::<u8>::new();
        log(&mut output, &db, &dose).unwrap();

        let stored = db.list_dose_logs(UserId::new(1)).unwrap();
        assert_eq!(stored[0].log.actual_time, "08:30");
    }
}
