use thiserror::Error;

use crate::domain::reservation::ConflictInfo;
use crate::domain::utils::id::ReservationId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read or write reservation table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse configuration JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Conflict detected with: {}", format_conflicts(.conflicts))]
    Conflict { conflicts: Vec<ConflictInfo> },

    #[error("Invalid booking request: {0}")]
    Validation(String),

    #[error("Reservation storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("No reservation with id {}", format_ids(.0))]
    UnknownReservation(Vec<ReservationId>),

    #[error("Position {position} is out of range for {len} reservations")]
    InvalidPosition { position: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

fn format_conflicts(conflicts: &[ConflictInfo]) -> String {
    conflicts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

fn format_ids(ids: &[ReservationId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
