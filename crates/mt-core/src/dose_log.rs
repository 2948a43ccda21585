//! Dose events: one record per taken or missed dose.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A taken/missed event for a scheduled dose.
///
/// The medication is referenced by name, not by row ID. Renaming a
/// medication leaves its earlier logs pointing at the old name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseLog {
    pub medication_name: String,
    pub scheduled_time: String,
    pub taken: bool,
    /// Wall-clock `HH:MM` when the event was recorded, unless supplied.
    pub actual_time: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<Local>,
}

impl DoseLog {
    /// Records a dose event now.
    ///
    /// `actual_time` defaults to the current local `HH:MM`.
    pub fn new(
        medication_name: impl Into<String>,
        scheduled_time: impl Into<String>,
        taken: bool,
        actual_time: Option<String>,
    ) -> Self {
        Self::at(
            medication_name,
            scheduled_time,
            taken,
            actual_time,
            Local::now(),
        )
    }

    /// Records a dose event as of `now`.
    pub fn at(
        medication_name: impl Into<String>,
        scheduled_time: impl Into<String>,
        taken: bool,
        actual_time: Option<String>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            medication_name: medication_name.into(),
            scheduled_time: scheduled_time.into(),
            taken,
            actual_time: actual_time.unwrap_or_else(|| now.format("%H:%M").to_string()),
            date: now.date_naive(),
            timestamp: now,
        }
    }
}

impl fmt::Display for DoseLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.taken { "Taken" } else { "Missed" };
        write!(
            f,
            "{} at {}: {status}",
            self.medication_name, self.scheduled_time
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn morning() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 8, 5, 0).unwrap()
    }

    #[test]
    fn actual_time_defaults_to_wall_clock() {
        let log = DoseLog::at("Metformin", "08:00", true, None, morning());

        assert_eq!(log.actual_time, "08:05");
        assert_eq!(log.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(log.timestamp, morning());
    }

    #[test]
    fn supplied_actual_time_is_kept() {
        let log = DoseLog::at(
            "Metformin",
            "08:00",
            true,
            Some("07:45".to_string()),
            morning(),
        );
        assert_eq!(log.actual_time, "07:45");
    }

    #[test]
    fn display_shows_status() {
        let taken = DoseLog::at("Metformin", "08:00", true, None, morning());
        let missed = DoseLog::at("Metformin", "20:00", false, None, morning());

        assert_eq!(taken.to_string(), "Metformin at 08:00: Taken");
        assert_eq!(missed.to_string(), "Metformin at 20:00: Missed");
    }
}
