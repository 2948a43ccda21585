//! Core domain logic for the medication tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Medications and the dose slots they generate each day
//! - Dose logs recording taken/missed events
//! - Users aggregating both, with schedule and adherence computation
//! - The [`Repository`] seam that storage backends implement

mod dose_log;
mod medication;
pub mod repository;
pub mod types;
mod user;

pub use dose_log::DoseLog;
pub use medication::{DoseSlot, Medication, ScheduleIssue, parse_dose_time};
pub use repository::{DoseLogRecord, MedicationRecord, Repository, UserRecord, load_user};
pub use types::{DoseLogId, Frequency, MedicationId, UserId, ValidationError};
pub use user::{DEFAULT_ADHERENCE_WINDOW_DAYS, User, adherence_percentage};
