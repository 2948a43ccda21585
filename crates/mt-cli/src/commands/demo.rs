//! Demonstration scenario.
//!
//! Walks one user through the store (create, add medications, log doses,
//! adherence) and then repeats the schedule and adherence computation on an
//! in-memory [`User`].

use std::io::Write;

use anyhow::Result;

use mt_core::{DoseLog, Medication, User};
use mt_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    writeln!(writer, "1. Initializing database...")?;
    writeln!(writer, "   Database ready")?;

    writeln!(writer, "2. Creating user...")?;
    let user_id = db.create_user("Dorothy Johnson", Some(75))?;
    writeln!(writer, "   Created user Dorothy Johnson (ID: {user_id})")?;

    writeln!(writer, "3. Adding medications...")?;
    let metformin = Medication::new("Metformin", "500mg", "twice_daily", ["08:00", "20:00"]);
    let lisinopril = Medication::new("Lisinopril", "10mg", "daily", ["08:00"]);
    for medication in [&metformin, &lisinopril] {
        let id = db.create_medication(user_id, medication)?;
        writeln!(writer, "   Added {} (ID: {id})", medication.name)?;
    }

    writeln!(writer, "4. Retrieving user medications...")?;
    let medications = db.list_active_medications(user_id)?;
    writeln!(writer, "   Found {} medications:", medications.len())?;
    for record in &medications {
        writeln!(writer, "      - {}", record.medication)?;
    }

    writeln!(writer, "5. Logging medication doses...")?;
    let doses = [
        ("Metformin", "08:00", true),
        ("Lisinopril", "08:00", true),
        ("Metformin", "20:00", false),
    ];
    for (name, time, taken) in doses {
        db.create_dose_log(user_id, &DoseLog::new(name, time, taken, None))?;
    }
    writeln!(
        writer,
        "   Logged morning doses (taken) and evening Metformin (missed)"
    )?;

    writeln!(writer, "6. Calculating adherence rate...")?;
    let adherence = db.adherence_rate(user_id, 1)?;
    writeln!(writer, "   Today's adherence rate: {adherence:.1}%")?;

    writeln!(writer, "7. Building the in-memory model...")?;
    let mut user = User::new("Dorothy Johnson", Some(75));
    user.add_medication(metformin);
    user.add_medication(lisinopril);

    let schedule = user.todays_schedule();
    writeln!(
        writer,
        "   Generated daily schedule with {} doses:",
        schedule.len()
    )?;
    for slot in &schedule {
        writeln!(
            writer,
            "      - {}: {} - {}",
            slot.time, slot.medication, slot.dosage
        )?;
    }

    for (name, time, taken) in doses {
        user.log_dose(name, time, taken);
    }
    writeln!(
        writer,
        "   In-memory adherence rate: {:.1}%",
        user.adherence_rate(1)
    )?;

    writeln!(writer)?;
    writeln!(writer, "Database location: {}", db.path().display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn demo_runs_full_scenario() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("medications.db");
        let db = Database::open(&db_path).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/medications.db");
        assert_snapshot!(output, @r"
        1. Initializing database...
           Database ready
        2. Creating user...
           Created user Dorothy Johnson (ID: 1)
        3. Adding medications...
           Added Metformin (ID: 1)
           Added Lisinopril (ID: 2)
        4. Retrieving user medications...
           Found 2 medications:
              - Metformin - 500mg at 08:00, 20:00
              - Lisinopril - 10mg at 08:00
        5. Logging medication doses...
           Logged morning doses (taken) and evening Metformin (missed)
        6. Calculating adherence rate...
           Today's adherence rate: 66.7%
        7. Building the in-memory model...
           Generated daily schedule with 3 doses:
              - 08:00: Metformin - 500mg
              - 08:00: Lisinopril - 10mg
              - 20:00: Metformin - 500mg
           In-memory adherence rate: 66.7%

        Database location: [TEMP]/medications.db
        ");
    }
}
