//! Schedule command: today's dose slots for a user.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;

use mt_core::{UserId, load_user};
use mt_db::Database;

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// User ID.
    #[arg(long)]
    pub user: i64,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &ScheduleArgs) -> Result<()> {
    let Some(user) = load_user(db, UserId::new(args.user))? else {
        bail!("user not found: {}", args.user);
    };
    let schedule = user.todays_schedule();

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&schedule)?)?;
        return Ok(());
    }

    writeln!(writer, "Today's schedule for {}:", user.name)?;
    if schedule.is_empty() {
        writeln!(writer, "No doses scheduled.")?;
        return Ok(());
    }
    for slot in &schedule {
        writeln!(
            writer,
            "  {}  {} - {}",
            slot.time, slot.medication, slot.dosage
        )?;
    }
    Ok(())
}
