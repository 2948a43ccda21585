//! Core type definitions: row identifiers and the frequency vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
///
/// These are advisory: the tracker accepts unvalidated input and only
/// reports problems (see [`crate::Medication::issues`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The frequency tag is not part of the known vocabulary.
    #[error("unknown frequency: {value}")]
    UnknownFrequency { value: String },

    /// The time string is not a zero-padded 24-hour `HH:MM` value.
    #[error("invalid dose time {value:?}, expected zero-padded HH:MM")]
    InvalidTime { value: String },
}

/// Generates an integer row ID newtype with common trait implementations.
macro_rules! define_row_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row ID.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw row ID.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_row_id!(
    /// Identifier of a stored user row.
    UserId
);

define_row_id!(
    /// Identifier of a stored medication row.
    MedicationId
);

define_row_id!(
    /// Identifier of a stored dose log row.
    DoseLogId
);

/// Known frequency tags.
///
/// Medications keep their frequency as free text; this enum is only used to
/// check whether the configured times line up with the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    TwiceDaily,
    ThreeTimesDaily,
}

impl Frequency {
    /// String representation as stored in the `frequency` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::TwiceDaily => "twice_daily",
            Self::ThreeTimesDaily => "three_times_daily",
        }
    }

    /// Number of scheduled times a medication with this tag should carry.
    #[must_use]
    pub const fn doses_per_day(&self) -> usize {
        match self {
            Self::Daily => 1,
            Self::TwiceDaily => 2,
            Self::ThreeTimesDaily => 3,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "twice_daily" => Ok(Self::TwiceDaily),
            "three_times_daily" => Ok(Self::ThreeTimesDaily),
            _ => Err(ValidationError::UnknownFrequency {
                value: s.to_string(),
            }),
        }
    }
}
