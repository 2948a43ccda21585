//! Medication commands.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;

use mt_core::{Medication, MedicationId, UserId};
use mt_db::Database;

#[derive(Debug, Args)]
pub struct AddMedicationArgs {
    /// User the medication belongs to.
    #[arg(long)]
    pub user: i64,
    /// Medication name.
    pub name: String,
    /// Strength, e.g. 500mg.
    pub dosage: String,
    /// Frequency tag: daily, `twice_daily` or `three_times_daily`.
    pub frequency: String,
    /// Scheduled time of day as HH:MM. Repeat once per daily dose.
    #[arg(long = "time")]
    pub times: Vec<String>,
}

/// Stores a medication. Inconsistent schedules are logged and kept.
pub fn add<W: Write>(writer: &mut W, db: &Database, args: &AddMedicationArgs) -> Result<()> {
    let medication = Medication::new(
        args.name.as_str(),
        args.dosage.as_str(),
        args.frequency.as_str(),
        args.times.iter().map(String::as_str),
    );
    for issue in medication.issues() {
        tracing::warn!(medication = %medication.name, %issue, "schedule looks inconsistent");
    }

    let id = db.create_medication(UserId::new(args.user), &medication)?;
    writeln!(writer, "Added {medication} (ID: {id})")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, user: i64) -> Result<()> {
    let records = db.list_active_medications(UserId::new(user))?;

    if records.is_empty() {
        writeln!(writer, "No active medications.")?;
        return Ok(());
    }

    for record in &records {
        writeln!(
            writer,
            "[{}] {} ({})",
            record.id, record.medication, record.medication.frequency
        )?;
    }
    Ok(())
}

pub fn deactivate<W: Write>(writer: &mut W, db: &Database, id: i64) -> Result<()> {
    if !db.deactivate_medication(MedicationId::new(id))? {
        bail!("medication not found: {id}");
    }
    writeln!(writer, "Deactivated medication {id}")?;
    Ok(())
}
