//! The storage seam between the domain model and persistence backends.
//!
//! Domain logic (schedules, adherence) runs on a [`User`] assembled by
//! [`load_user`] from whatever implements [`Repository`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::dose_log::DoseLog;
use crate::medication::Medication;
use crate::types::{DoseLogId, MedicationId, UserId};
use crate::user::User;

/// A stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub age: Option<u32>,
    pub created_date: DateTime<Local>,
}

/// A stored medication row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: MedicationId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub medication: Medication,
}

/// A stored dose log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseLogRecord {
    pub id: DoseLogId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub log: DoseLog,
}

/// Create/read access to users, medications and dose logs.
///
/// Nothing here validates references: medications and logs may point at a
/// user that does not exist, and logs may name a medication that does not.
pub trait Repository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_user(&self, name: &str, age: Option<u32>) -> Result<UserId, Self::Error>;

    fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, Self::Error>;

    fn list_users(&self) -> Result<Vec<UserRecord>, Self::Error>;

    /// Stores a medication for `user_id`. The medication's `active` flag is
    /// ignored; new rows are always active.
    fn create_medication(
        &self,
        user_id: UserId,
        medication: &Medication,
    ) -> Result<MedicationId, Self::Error>;

    /// Active medications for a user, in creation order.
    fn list_active_medications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MedicationRecord>, Self::Error>;

    /// Marks a medication inactive. Returns `false` if no such row exists.
    fn deactivate_medication(&self, id: MedicationId) -> Result<bool, Self::Error>;

    fn create_dose_log(&self, user_id: UserId, log: &DoseLog) -> Result<DoseLogId, Self::Error>;

    /// Dose logs for a user, in creation order.
    fn list_dose_logs(&self, user_id: UserId) -> Result<Vec<DoseLogRecord>, Self::Error>;

    /// Adherence over the trailing `days` days, computed by the backend
    /// against its own clock.
    fn adherence_rate(&self, user_id: UserId, days: u32) -> Result<f64, Self::Error>;
}

/// Assembles the [`User`] aggregate for `user_id`.
///
/// Only active medications are loaded. Returns `None` if the user row is
/// missing.
pub fn load_user<R: Repository + ?Sized>(
    repo: &R,
    user_id: UserId,
) -> Result<Option<User>, R::Error> {
    let Some(record) = repo.get_user(user_id)? else {
        return Ok(None);
    };

    let medications = repo
        .list_active_medications(user_id)?
        .into_iter()
        .map(|record| record.medication)
        .collect();
    let dose_logs = repo
        .list_dose_logs(user_id)?
        .into_iter()
        .map(|record| record.log)
        .collect();

    Ok(Some(User {
        name: record.name,
        age: record.age,
        medications,
        dose_logs,
        created_date: record.created_date,
    }))
}
