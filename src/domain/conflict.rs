use crate::domain::reservation::{ConflictInfo, Reservation};
use crate::domain::store::ReservationStore;
use crate::domain::time_range::TimeRange;
use crate::domain::utils::id::ResourceId;
use crate::error::Result;

/// Reservations on `resource_id` whose range overlaps `range`, in storage order.
pub fn overlapping<'a>(reservations: &'a [Reservation], resource_id: &'a ResourceId, range: &'a TimeRange) -> impl Iterator<Item = &'a Reservation> + 'a {
    reservations.iter().filter(move |r| &r.resource_id == resource_id && r.range.overlaps(range))
}

/// Owners of the reservations on `resource_id` that overlap `range`.
pub fn find_conflicts(reservations: &[Reservation], resource_id: &ResourceId, range: &TimeRange) -> Vec<ConflictInfo> {
    overlapping(reservations, resource_id, range).map(Reservation::conflict_info).collect()
}

/// Checks candidate bookings against the stored table.
#[derive(Debug, Clone, Copy)]
pub struct ConflictDetector<'a> {
    store: &'a ReservationStore,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(store: &'a ReservationStore) -> Self {
        ConflictDetector { store }
    }

    pub fn find_conflicts(&self, resource_id: &ResourceId, range: &TimeRange) -> Result<Vec<ConflictInfo>> {
        let reservations = self.store.load()?;
        let conflicts = find_conflicts(&reservations, resource_id, range);

        log::debug!("{} conflict(s) for {} in {}.", conflicts.len(), resource_id, range);
        Ok(conflicts)
    }
}
