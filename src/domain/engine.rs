use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};

use crate::domain::calendar::{self, DaySummary, TimetableEntry};
use crate::domain::catalog::{Catalog, Resource};
use crate::domain::clock::{SharedClock, SystemClock};
use crate::domain::conflict::ConflictDetector;
use crate::domain::occupancy::{OccupancyAggregator, OccupancyReport};
use crate::domain::reservation::{ConflictInfo, Reservation};
use crate::domain::store::ReservationStore;
use crate::domain::time_range::TimeRange;
use crate::domain::utils::id::{ReservationId, ResourceId, UserName};
use crate::domain::writer::{Confirmation, ReservationWriter};
use crate::error::Result;
use crate::loader::config::EngineConfig;

/// The data API the dashboard front end calls into.
#[derive(Debug)]
pub struct BookingEngine {
    catalog: Catalog,
    display_offset: FixedOffset,
    store: ReservationStore,
    clock: SharedClock,
}

impl BookingEngine {
    pub fn open(config: EngineConfig) -> Result<Self> {
        BookingEngine::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: SharedClock) -> Result<Self> {
        let store = ReservationStore::open(config.data_file, config.display_offset)?;
        log::info!("Booking engine ready: {} resources, table '{}'.", config.catalog.resources().len(), store.path().display());

        Ok(BookingEngine { catalog: config.catalog, display_offset: config.display_offset, store, clock })
    }

    pub fn resources(&self) -> &[Resource] {
        self.catalog.resources()
    }

    pub fn users(&self) -> &[UserName] {
        self.catalog.users()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Today's date in local display time.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.display_offset).date_naive()
    }

    pub fn list_reservations(&self) -> Result<Vec<Reservation>> {
        self.store.load()
    }

    pub fn check_conflicts(&self, resource_id: &ResourceId, range: &TimeRange) -> Result<Vec<ConflictInfo>> {
        ConflictDetector::new(&self.store).find_conflicts(resource_id, range)
    }

    pub fn create_reservation(&self, user: UserName, resource_id: ResourceId, range: TimeRange, project: impl Into<String>, force: bool) -> Result<Confirmation> {
        ReservationWriter::new(&self.store, &self.catalog).add(user, resource_id, range, project, force)
    }

    pub fn delete_reservations(&self, ids: &BTreeSet<ReservationId>) -> Result<usize> {
        self.store.delete(ids)
    }

    /// Deletes by position in the order of [`list_reservations`](Self::list_reservations).
    ///
    /// Positions go stale as soon as the table changes; prefer
    /// [`delete_reservations`](Self::delete_reservations).
    pub fn delete_by_position(&self, positions: &BTreeSet<usize>) -> Result<usize> {
        self.store.delete_by_position(positions)
    }

    pub fn get_occupancy(&self, date: NaiveDate) -> Result<OccupancyReport> {
        let reservations = self.store.load()?;
        Ok(OccupancyAggregator::new(&self.catalog, self.display_offset).occupancy(&reservations, date))
    }

    pub fn month_overview(&self, year: i32, month: u32) -> Result<Vec<DaySummary>> {
        let reservations = self.store.load()?;
        calendar::month_overview(&reservations, year, month, self.display_offset)
    }

    pub fn day_timetable(&self, date: NaiveDate) -> Result<Vec<TimetableEntry>> {
        let reservations = self.store.load()?;
        Ok(calendar::day_timetable(&reservations, date, self.display_offset))
    }

    /// The whole table for the cancellation view, latest start first.
    pub fn management_listing(&self) -> Result<Vec<Reservation>> {
        Ok(calendar::management_listing(self.store.load()?))
    }

    /// The whole table, or nothing if it cannot be read. For display only.
    pub fn list_reservations_lenient(&self) -> Vec<Reservation> {
        self.store.load_lenient()
    }
}
