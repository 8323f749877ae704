use crate::domain::catalog::{Catalog, ResourceClass};
use crate::domain::conflict::find_conflicts;
use crate::domain::reservation::{NewReservation, Reservation};
use crate::domain::store::ReservationStore;
use crate::domain::time_range::TimeRange;
use crate::domain::utils::audit;
use crate::domain::utils::id::{ResourceId, UserName};
use crate::error::{Error, Result};

pub const SUCCESS_MESSAGE: &str = "Reservation successful!";

/// Result of a stored booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub reservation: Reservation,
    pub message: String,

    /// Set when the booking was stored with the conflict check skipped.
    pub forced: bool,
}

/// The only entry point that creates reservations.
#[derive(Debug, Clone, Copy)]
pub struct ReservationWriter<'a> {
    store: &'a ReservationStore,
    catalog: &'a Catalog,
}

impl<'a> ReservationWriter<'a> {
    pub fn new(store: &'a ReservationStore, catalog: &'a Catalog) -> Self {
        ReservationWriter { store, catalog }
    }

    /// Stores a booking of `resource_id` for `range`.
    ///
    /// Unless `force` is set, an overlap with an existing reservation on the same resource
    /// fails with [`Error::Conflict`] and nothing is written. The check and the append happen
    /// under the same store lock. Resource ids missing from the catalog are accepted and
    /// recorded with [`ResourceClass::Unknown`].
    pub fn add(&self, user: UserName, resource_id: ResourceId, range: TimeRange, project: impl Into<String>, force: bool) -> Result<Confirmation> {
        let resource_class = self.catalog.class_of(&resource_id);
        if resource_class == ResourceClass::Unknown {
            log::warn!("Resource '{}' is not in the catalog; recording it with class {}.", resource_id, resource_class);
        }

        let candidate = NewReservation { user, resource_id, resource_class, range, project: project.into() };
        let reservation = self.store.append_checked(candidate.clone(), |existing| {
            if force {
                return Ok(());
            }

            let conflicts = find_conflicts(existing, &candidate.resource_id, &candidate.range);
            if conflicts.is_empty() {
                return Ok(());
            }

            log::info!("Booking of {} in {} by {} rejected: {} conflict(s).", candidate.resource_id, candidate.range, candidate.user, conflicts.len());
            Err(Error::Conflict { conflicts })
        })?;
        audit::record_created(&reservation, force);

        Ok(Confirmation { reservation, message: SUCCESS_MESSAGE.to_string(), forced: force })
    }
}
