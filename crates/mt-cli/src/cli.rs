//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::adherence::AdherenceArgs;
use crate::commands::dose::LogDoseArgs;
use crate::commands::medication::AddMedicationArgs;
use crate::commands::schedule::ScheduleArgs;
use crate::commands::user::AddUserArgs;

/// Medication tracker.
///
/// Records medications, daily dose schedules and taken/missed doses, and
/// reports adherence over a trailing window of days.
#[derive(Debug, Parser)]
#[command(name = "medtrack", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show database location and user count.
    Status,

    /// Run the demonstration scenario against the configured database.
    Demo,

    /// Manage users.
    #[command(subcommand)]
    User(UserAction),

    /// Manage medications.
    #[command(subcommand)]
    Med(MedAction),

    /// Record dose events.
    #[command(subcommand)]
    Dose(DoseAction),

    /// Show today's dose schedule for a user.
    Schedule(ScheduleArgs),

    /// Show a user's adherence rate.
    Adherence(AdherenceArgs),
}

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Add a user.
    Add(AddUserArgs),
    /// List all users.
    List,
}

#[derive(Debug, Subcommand)]
pub enum MedAction {
    /// Add a medication for a user.
    Add(AddMedicationArgs),
    /// List a user's active medications.
    List {
        /// User ID.
        #[arg(long)]
        user: i64,
    },
    /// Stop scheduling a medication. The row and its history are kept.
    Deactivate {
        /// Medication ID.
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum DoseAction {
    /// Record a taken or missed dose.
    Log(LogDoseArgs),
}
