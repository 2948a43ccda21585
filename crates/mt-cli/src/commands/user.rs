//! User commands.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use mt_db::Database;

#[derive(Debug, Args)]
pub struct AddUserArgs {
    /// Full name of the user.
    pub name: String,
    /// Age in years.
    #[arg(long)]
    pub age: Option<u32>,
}

pub fn add<W: Write>(writer: &mut W, db: &Database, args: &AddUserArgs) -> Result<()> {
    let id = db.create_user(&args.name, args.age)?;
    writeln!(writer, "Created user {} (ID: {id})", args.name)?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        writeln!(writer, "No users recorded.")?;
        return Ok(());
    }

    writeln!(writer, "{:<6} {:<24} AGE", "ID", "NAME")?;
    for user in &users {
        let age = user.age.map_or_else(|| "-".to_string(), |age| age.to_string());
        writeln!(writer, "{:<6} {:<24} {age}", user.id.get(), user.name)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn add_reports_new_id() {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();
        let args = AddUserArgs {
            name: "Dorothy Johnson".to_string(),
            age: Some(75),
        };

        let mut output = Vec::new();
        add(&mut output, &db, &args).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Created user Dorothy Johnson (ID: 1)");
        assert_eq!(db.list_users().unwrap()[0].age, Some(75));
    }

    #[test]
    fn list_shows_missing_age_as_dash() {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();
        db.create_user("Dorothy Johnson", Some(75)).unwrap();
        db.create_user("Walter", None).unwrap();

        let mut output = Vec::new();
        list(&mut output, &db).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<Vec<&str>> = output
            .lines()
            .map(|line| line.split("  ").map(str::trim).filter(|s| !s.is_empty()).collect())
            .collect();
        assert_eq!(
            lines,
            vec![
                vec!["ID", "NAME", "AGE"],
                vec!["1", "Dorothy Johnson", "75"],
                vec!["2", "Walter", "-"],
            ]
        );
    }

    #[test]
    fn list_without_users() {
        let temp = tempfile::tempdir().unwrap();
        let db = Database::open(&temp.path().join("medications.db")).unwrap();

        let mut output = Vec::new();
        list(&mut output, &db).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "No users recorded.\n");
    }
}
