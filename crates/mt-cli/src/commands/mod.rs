//! CLI subcommand implementations.

pub mod adherence;
pub mod demo;
pub mod dose;
pub mod medication;
pub mod schedule;
pub mod status;
pub mod user;
