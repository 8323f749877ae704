use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::FixedOffset;
use uuid::Uuid;

use crate::api::reservation_row::{HEADERS, ReservationRowDto};
use crate::domain::reservation::{NewReservation, Reservation};
use crate::domain::utils::audit;
use crate::domain::utils::id::ReservationId;
use crate::error::{Error, Result};

/// The persisted, ordered reservation table.
///
/// Every read re-reads the whole file. Every mutation is a full read-modify-write cycle
/// performed under one lock and published by renaming a freshly written temp file over the
/// table, so a reader sees either the old or the new table, never a partial one.
#[derive(Debug)]
pub struct ReservationStore {
    path: PathBuf,

    /// Offset used to interpret stored timestamps that carry none.
    display_offset: FixedOffset,

    write_lock: Mutex<()>,
}

impl ReservationStore {
    /// Opens the table at `path`, creating it (and its directory) empty if it does not exist.
    pub fn open(path: impl Into<PathBuf>, display_offset: FixedOffset) -> Result<Self> {
        let store = ReservationStore { path: path.into(), display_offset, write_lock: Mutex::new(()) };
        store.init()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        self.persist(&[])?;
        log::info!("Initialized empty reservation table at '{}'.", self.path.display());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the full table in on-disk order.
    ///
    /// A table that exists but holds no rows is `Ok(vec![])`. A table that is missing or cannot
    /// be read or parsed is `Err(StorageUnavailable)`; nothing is silently dropped.
    pub fn load(&self) -> Result<Vec<Reservation>> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

        let mut rows = Vec::new();
        for (index, row) in reader.deserialize::<ReservationRowDto>().enumerate() {
            let row = row.map_err(|e| self.unavailable(format!("record {} is malformed: {}", index + 1, e)))?;
            rows.push(row);
        }

        let mut next_id = match rows.iter().filter_map(|row| row.id).max() {
            Some(max) => ReservationId(max).next(),
            None => Some(ReservationId::FIRST),
        };
        let mut seen = HashSet::new();
        let mut reservations = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let id = match row.id {
                Some(raw) if seen.insert(raw) => ReservationId(raw),
                _ => {
                    let assigned = next_id.ok_or_else(|| self.unavailable(format!("no id left for record {}", index + 1)))?;
                    next_id = assigned.next();
                    log::debug!("Assigned id {} to record {} without a usable id.", assigned, index + 1);
                    assigned
                }
            };

            let reservation = row.into_domain(id, self.display_offset).map_err(|e| self.unavailable(format!("record {}: {}", index + 1, e)))?;
            reservations.push(reservation);
        }

        Ok(reservations)
    }

    /// Like [`load`](Self::load), but an unreadable table is logged and reported as empty.
    ///
    /// Only for display paths that would rather render nothing than fail.
    pub fn load_lenient(&self) -> Vec<Reservation> {
        match self.load() {
            Ok(reservations) => reservations,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Reservation table unreadable, showing it as empty");
                Vec::new()
            }
        }
    }

    /// Stores `reservation` at the end of the table under the next free id.
    pub fn append(&self, reservation: NewReservation) -> Result<Reservation> {
        self.append_checked(reservation, |_| Ok(()))
    }

    /// Like [`append`](Self::append), but first runs `check` on the current table under the
    /// write lock; an error from `check` aborts the append.
    pub fn append_checked<F>(&self, reservation: NewReservation, check: F) -> Result<Reservation>
    where
        F: FnOnce(&[Reservation]) -> Result<()>,
    {
        let _guard = self.lock();

        let mut reservations = self.load()?;
        check(&reservations)?;

        let id = match reservations.iter().map(|r| r.id).max() {
            Some(max) => max.next().ok_or_else(|| self.unavailable(format!("no id left after {}", max)))?,
            None => ReservationId::FIRST,
        };
        let reservation = reservation.with_id(id);

        reservations.push(reservation.clone());
        self.persist(&reservations)?;

        Ok(reservation)
    }

    /// Removes the reservations with the given ids and returns how many were removed.
    ///
    /// If any id is not present nothing is removed.
    pub fn delete(&self, ids: &BTreeSet<ReservationId>) -> Result<usize> {
        let _guard = self.lock();

        let reservations = self.load()?;
        let missing: Vec<ReservationId> = ids.iter().filter(|id| !reservations.iter().any(|r| r.id == **id)).copied().collect();
        if !missing.is_empty() {
            return Err(Error::UnknownReservation(missing));
        }

        let (removed, remaining): (Vec<_>, Vec<_>) = reservations.into_iter().partition(|r| ids.contains(&r.id));
        self.commit_removal(&removed, &remaining)
    }

    /// Removes the reservations at the given 0-based positions of the current table order.
    ///
    /// The survivors keep their relative order and are renumbered from 0 on the next load.
    /// If any position is out of range nothing is removed.
    pub fn delete_by_position(&self, positions: &BTreeSet<usize>) -> Result<usize> {
        let _guard = self.lock();

        let reservations = self.load()?;
        if let Some(&position) = positions.iter().find(|&&p| p >= reservations.len()) {
            return Err(Error::InvalidPosition { position, len: reservations.len() });
        }

        let mut removed = Vec::with_capacity(positions.len());
        let mut remaining = Vec::with_capacity(reservations.len().saturating_sub(positions.len()));
        for (position, reservation) in reservations.into_iter().enumerate() {
            if positions.contains(&position) { removed.push(reservation) } else { remaining.push(reservation) }
        }

        self.commit_removal(&removed, &remaining)
    }

    fn commit_removal(&self, removed: &[Reservation], remaining: &[Reservation]) -> Result<usize> {
        if removed.is_empty() {
            return Ok(0);
        }

        self.persist(remaining)?;
        audit::record_deleted(removed);
        log::info!("Deleted {} reservation(s), {} remaining.", removed.len(), remaining.len());

        Ok(removed.len())
    }

    fn persist(&self, reservations: &[Reservation]) -> Result<()> {
        let directory = self.path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let file_name = self.path.file_name().and_then(|n| n.to_str()).unwrap_or("reservations.csv");
        let temp_path = directory.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let written = write_table(&temp_path, reservations).and_then(|()| fs::rename(&temp_path, &self.path).map_err(Error::from));
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        written
    }

    fn unavailable(&self, cause: impl std::fmt::Display) -> Error {
        Error::StorageUnavailable(format!("'{}': {}", self.path.display(), cause))
    }
}

fn write_table(path: &Path, reservations: &[Reservation]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(HEADERS)?;
    for reservation in reservations {
        writer.serialize(ReservationRowDto::from_domain(reservation))?;
    }

    let file = writer.into_inner().map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;
    file.sync_all()?;
    Ok(())
}
