//! Medications and the dose slots they produce.

use std::fmt;

use chrono::{DateTime, Local, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::{Frequency, ValidationError};

/// A medication with its daily dosing times.
///
/// `frequency` is free text from an open vocabulary (`daily`, `twice_daily`,
/// `three_times_daily`). Neither it nor `times` is validated on construction;
/// use [`Medication::issues`] to inspect them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    /// Strength as written on the label, e.g. `500mg`.
    pub dosage: String,
    pub frequency: String,
    /// Scheduled times of day as zero-padded `HH:MM`, one per dose.
    pub times: Vec<String>,
    pub created_date: DateTime<Local>,
    pub active: bool,
}

/// One scheduled administration of a medication.
///
/// `taken` is always `false` when generated; it is not linked to dose logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseSlot {
    pub medication: String,
    pub dosage: String,
    pub time: String,
    pub taken: bool,
}

/// A problem found in a medication's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    /// A scheduled time is not zero-padded `HH:MM`.
    MalformedTime(ValidationError),
    /// The frequency tag is outside the known vocabulary.
    UnknownFrequency(ValidationError),
    /// The number of times does not match the frequency tag.
    TimeCountMismatch {
        frequency: Frequency,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTime(err) | Self::UnknownFrequency(err) => write!(f, "{err}"),
            Self::TimeCountMismatch {
                frequency,
                expected,
                actual,
            } => write!(
                f,
                "{frequency} expects {expected} scheduled time(s), found {actual}"
            ),
        }
    }
}

impl Medication {
    /// Creates an active medication stamped with the current local time.
    pub fn new<T: Into<String>>(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        times: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            times: times.into_iter().map(Into::into).collect(),
            created_date: Local::now(),
            active: true,
        }
    }

    /// Returns one dose slot per configured time, in configured order.
    ///
    /// The `active` flag is not consulted.
    pub fn daily_schedule(&self) -> Vec<DoseSlot> {
        self.times
            .iter()
            .map(|time| DoseSlot {
                medication: self.name.clone(),
                dosage: self.dosage.clone(),
                time: time.clone(),
                taken: false,
            })
            .collect()
    }

    /// Reports configuration problems without rejecting anything.
    pub fn issues(&self) -> Vec<ScheduleIssue> {
        let mut issues: Vec<ScheduleIssue> = self
            .times
            .iter()
            .filter_map(|time| parse_dose_time(time).err())
            .map(ScheduleIssue::MalformedTime)
            .collect();

        match self.frequency.parse::<Frequency>() {
            Ok(frequency) if frequency.doses_per_day() != self.times.len() => {
                issues.push(ScheduleIssue::TimeCountMismatch {
                    frequency,
                    expected: frequency.doses_per_day(),
                    actual: self.times.len(),
                });
            }
            Ok(_) => {}
            Err(err) => issues.push(ScheduleIssue::UnknownFrequency(err)),
        }

        issues
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} at {}", self.name, self.dosage, self.times.join(", "))
    }
}

/// Parses a scheduled time, accepting only zero-padded 24-hour `HH:MM`.
///
/// Schedules sort by string comparison, which is only chronological when
/// every time has this exact shape.
pub fn parse_dose_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .ok()
        .filter(|time| time.format("%H:%M").to_string() == value)
        .ok_or_else(|| ValidationError::InvalidTime {
            value: value.to_string(),
        })
}
