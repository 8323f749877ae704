use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ResourceClass;
use crate::domain::reservation::Reservation;
use crate::domain::time_range::{TimeRange, format_timestamp, parse_timestamp};
use crate::domain::utils::id::{ReservationId, ResourceId, UserName};
use crate::error::{Error, Result};

/// Column order of the persisted reservation table.
pub const HEADERS: [&str; 7] = ["Id", "User", "GPU_ID", "GPU_Type", "Start", "End", "Project"];

/// One row of the reservation table as it appears on disk.
///
/// Tables written before reservations had ids lack the `Id` column; those rows get an id
/// assigned when they are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRowDto {
    #[serde(rename = "Id", default)]
    pub id: Option<u64>,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "GPU_ID")]
    pub gpu_id: String,
    #[serde(rename = "GPU_Type")]
    pub gpu_type: String,
    #[serde(rename = "Start")]
    pub start: String,
    #[serde(rename = "End")]
    pub end: String,
    #[serde(rename = "Project", default)]
    pub project: String,
}

impl ReservationRowDto {
    pub fn from_domain(reservation: &Reservation) -> Self {
        ReservationRowDto {
            id: Some(reservation.id.0),
            user: reservation.user.to_string(),
            gpu_id: reservation.resource_id.to_string(),
            gpu_type: reservation.resource_class.to_string(),
            start: format_timestamp(reservation.range.start()),
            end: format_timestamp(reservation.range.end()),
            project: reservation.project.clone(),
        }
    }

    /// Builds the domain record, reading offset-less timestamps in `offset`.
    pub fn into_domain(self, id: ReservationId, offset: FixedOffset) -> Result<Reservation> {
        let start = parse_timestamp(&self.start, offset)?;
        let end = parse_timestamp(&self.end, offset)?;
        let range = TimeRange::new(start, end).map_err(|e| Error::StorageUnavailable(format!("reservation {} has an invalid time range: {}", id, e)))?;

        // Unrecognized class names are kept as the sentinel rather than failing the whole table.
        let resource_class = self.gpu_type.parse::<ResourceClass>().unwrap_or(ResourceClass::Unknown);

        Ok(Reservation {
            id,
            user: UserName::new(self.user),
            resource_id: ResourceId::new(self.gpu_id),
            resource_class,
            range,
            project: self.project,
        })
    }
}
