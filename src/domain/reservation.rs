use std::fmt;

use crate::domain::catalog::ResourceClass;
use crate::domain::time_range::TimeRange;
use crate::domain::utils::id::{ReservationId, ResourceId, UserName};

/// One booked time range for one user and project on one GPU unit.
///
/// Created by the writer, never mutated in place, removed only by deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub user: UserName,
    pub resource_id: ResourceId,
    pub resource_class: ResourceClass,
    pub range: TimeRange,
    pub project: String,
}

impl Reservation {
    pub fn conflict_info(&self) -> ConflictInfo {
        ConflictInfo { user: self.user.clone(), project: self.project.clone() }
    }
}

/// A reservation that has not been stored yet and so has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub user: UserName,
    pub resource_id: ResourceId,
    pub resource_class: ResourceClass,
    pub range: TimeRange,
    pub project: String,
}

impl NewReservation {
    pub fn with_id(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            user: self.user,
            resource_id: self.resource_id,
            resource_class: self.resource_class,
            range: self.range,
            project: self.project,
        }
    }
}

/// Owner of an existing reservation that overlaps a requested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictInfo {
    pub user: UserName,
    pub project: String,
}

impl fmt::Display for ConflictInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user, self.project)
    }
}
