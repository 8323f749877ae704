use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};

use crate::domain::catalog::{Catalog, ResourceClass};
use crate::domain::reservation::Reservation;
use crate::domain::time_range::{SECONDS_PER_DAY, TimeRange};

/// Utilization per resource class for one local day, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyReport {
    pub date: NaiveDate,
    pub by_class: BTreeMap<ResourceClass, f64>,
}

impl OccupancyReport {
    /// Percentage for `class`; classes without units report `0.0`.
    pub fn get(&self, class: ResourceClass) -> f64 {
        self.by_class.get(&class).copied().unwrap_or(0.0)
    }
}

/// Time-weighted utilization of the catalog's classes.
///
/// For each class: booked seconds inside the day window, summed over the class's
/// reservations, divided by `units * 86400`, as a percentage capped at 100. Overlapping
/// bookings on one unit both count, hence the cap.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyAggregator<'a> {
    catalog: &'a Catalog,
    display_offset: FixedOffset,
}

impl<'a> OccupancyAggregator<'a> {
    pub fn new(catalog: &'a Catalog, display_offset: FixedOffset) -> Self {
        OccupancyAggregator { catalog, display_offset }
    }

    pub fn occupancy(&self, reservations: &[Reservation], date: NaiveDate) -> OccupancyReport {
        let window = TimeRange::local_day(date, self.display_offset);

        let mut booked_seconds: BTreeMap<ResourceClass, i64> = BTreeMap::new();
        for reservation in reservations {
            if let Some(clipped) = reservation.range.clip_to(&window) {
                *booked_seconds.entry(reservation.resource_class).or_insert(0) += clipped.duration().num_seconds();
            }
        }

        let by_class = self
            .catalog
            .classes()
            .into_iter()
            .map(|(class, units)| {
                let capacity = (units as i64 * SECONDS_PER_DAY) as f64;
                let booked = booked_seconds.get(&class).copied().unwrap_or(0) as f64;
                (class, (booked / capacity * 100.0).min(100.0))
            })
            .collect();

        OccupancyReport { date, by_class }
    }
}
