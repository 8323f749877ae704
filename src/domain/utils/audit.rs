use crate::domain::reservation::Reservation;

/// Target of the audit trail of every change to the reservation table.
pub const AUDIT_TARGET: &str = "booking_audit";

pub fn record_created(reservation: &Reservation, forced: bool) {
    tracing::info!(
        target: AUDIT_TARGET,
        Command = "Create",
        ReservationId = reservation.id.0,
        User = %reservation.user,
        Resource = %reservation.resource_id,
        ResourceClass = %reservation.resource_class,
        Range = %reservation.range,
        Project = %reservation.project,
        Forced = forced,
    );
}

pub fn record_deleted(removed: &[Reservation]) {
    for reservation in removed {
        tracing::info!(
            target: AUDIT_TARGET,
            Command = "Delete",
            ReservationId = reservation.id.0,
            User = %reservation.user,
            Resource = %reservation.resource_id,
            Range = %reservation.range,
        );
    }
}
