//! Status command for showing the database location and contents.

use std::io::Write;

use anyhow::Result;

use mt_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let users = db.list_users()?;

    writeln!(writer, "Medication tracker status")?;
    writeln!(writer, "Database: {}", db.path().display())?;
    writeln!(writer, "Users: {}", users.len())?;

    Ok(())
}
