//! Users: the aggregate owning medications and dose logs.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dose_log::DoseLog;
use crate::medication::{DoseSlot, Medication};

/// Lookback window used when the caller does not pick one.
pub const DEFAULT_ADHERENCE_WINDOW_DAYS: u32 = 7;

/// A person whose medications are being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: Option<u32>,
    pub medications: Vec<Medication>,
    pub dose_logs: Vec<DoseLog>,
    pub created_date: DateTime<Local>,
}

impl User {
    /// Creates a user with no medications or logs.
    pub fn new(name: impl Into<String>, age: Option<u32>) -> Self {
        Self {
            name: name.into(),
            age,
            medications: Vec::new(),
            dose_logs: Vec::new(),
            created_date: Local::now(),
        }
    }

    pub fn add_medication(&mut self, medication: Medication) {
        self.medications.push(medication);
    }

    /// Every active medication's dose slots, sorted by time.
    ///
    /// Times compare as strings, which matches clock order for zero-padded
    /// `HH:MM`. The sort is stable, so slots at the same time keep the order
    /// in which their medications were added. No date filtering happens.
    pub fn todays_schedule(&self) -> Vec<DoseSlot> {
        let mut schedule: Vec<DoseSlot> = self
            .medications
            .iter()
            .filter(|medication| medication.active)
            .flat_map(Medication::daily_schedule)
            .collect();
        schedule.sort_by(|a, b| a.time.cmp(&b.time));
        schedule
    }

    /// Records a dose event now and returns it.
    ///
    /// The medication name is not checked against the user's medications,
    /// and repeated calls for the same slot produce separate logs.
    pub fn log_dose(
        &mut self,
        medication_name: &str,
        scheduled_time: &str,
        taken: bool,
    ) -> &DoseLog {
        self.log_dose_at(medication_name, scheduled_time, taken, Local::now())
    }

    /// Records a dose event as of `now` and returns it.
    pub fn log_dose_at(
        &mut self,
        medication_name: &str,
        scheduled_time: &str,
        taken: bool,
        now: DateTime<Local>,
    ) -> &DoseLog {
        if !self.has_medication(medication_name) {
            tracing::warn!(
                user = %self.name,
                medication = medication_name,
                "logging dose for a medication the user does not have"
            );
        }

        let index = self.dose_logs.len();
        self.dose_logs.push(DoseLog::at(
            medication_name,
            scheduled_time,
            taken,
            None,
            now,
        ));
        tracing::debug!(
            user = %self.name,
            medication = medication_name,
            scheduled_time,
            taken,
            "dose logged"
        );
        &self.dose_logs[index]
    }

    /// Percentage of logged doses marked taken within the last `days` days.
    pub fn adherence_rate(&self, days: u32) -> f64 {
        self.adherence_rate_on(days, Local::now().date_naive())
    }

    /// Percentage of logged doses marked taken within `days` days of `today`.
    ///
    /// The window compares calendar dates, so yesterday's logs count for a
    /// one-day window whatever their time of day. Only logged events are
    /// counted: doses that were scheduled but never logged do not lower the
    /// rate. Returns `0.0` when nothing falls in the window.
    pub fn adherence_rate_on(&self, days: u32, today: NaiveDate) -> f64 {
        let window = i64::from(days);
        let (taken, total) = self
            .dose_logs
            .iter()
            .filter(|log| (today - log.date).num_days() <= window)
            .fold((0, 0), |(taken, total), log| {
                (taken + usize::from(log.taken), total + 1)
            });
        adherence_percentage(taken, total)
    }

    fn has_medication(&self, name: &str) -> bool {
        self.medications.iter().any(|medication| medication.name == name)
    }
}

/// `taken / total * 100`, or `0.0` when there is nothing to count.
#[allow(clippy::cast_precision_loss)]
pub fn adherence_percentage(taken: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (taken as f64 / total as f64) * 100.0
}
