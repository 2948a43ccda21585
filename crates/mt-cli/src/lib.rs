//! Medication tracker CLI library.
//!
//! This crate provides the CLI interface for the medication tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, DoseAction, MedAction, UserAction};
pub use config::Config;
