use chrono::{DateTime, Duration, Utc};

use crate::domain::time_range::{TimeRange, format_timestamp};
use crate::domain::utils::id::{ResourceId, UserName};
use crate::error::{Error, Result};

/// How far in the past a booking may still start.
pub const PAST_START_GRACE_MINUTES: i64 = 10;

/// A booking as entered by a user, before any checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub user: String,
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub project: String,
}

/// A request that passed [`BookingRequest::validate`] and can be handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub user: UserName,
    pub resource_id: ResourceId,
    pub range: TimeRange,
    pub project: String,
}

impl BookingRequest {
    /// Front-end preconditions of a booking; the writer itself does not repeat them.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidBooking> {
        let user = self.user.trim();
        if user.is_empty() {
            return Err(Error::Validation("a user must be selected".to_string()));
        }

        let resource_id = self.resource_id.trim();
        if resource_id.is_empty() {
            return Err(Error::Validation("a GPU must be selected".to_string()));
        }

        if self.start < now - Duration::minutes(PAST_START_GRACE_MINUTES) {
            return Err(Error::Validation(format!("start time must be in the future (now: {})", format_timestamp(now))));
        }

        let range = TimeRange::new(self.start, self.end)?;

        Ok(ValidBooking { user: UserName::new(user), resource_id: ResourceId::new(resource_id), range, project: self.project.trim().to_string() })
    }
}
