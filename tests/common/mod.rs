#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tempfile::TempDir;

use gpu_booking::domain::catalog::Catalog;
use gpu_booking::domain::clock::FixedClock;
use gpu_booking::domain::engine::BookingEngine;
use gpu_booking::domain::time_range::{TimeRange, local_to_utc, offset_from_hours};
use gpu_booking::domain::utils::id::{ResourceId, UserName};
use gpu_booking::loader::config::EngineConfig;

pub fn kst() -> FixedOffset {
    offset_from_hours(9).unwrap()
}

pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

/// Local (KST) time on a day of March 2025.
pub fn local(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    local_to_utc(march(day).and_hms_opt(hour, minute, 0).unwrap(), kst())
}

/// Local hours `[from, to)` of a day of March 2025.
pub fn hours(day: u32, from: u32, to: u32) -> TimeRange {
    TimeRange::new(local(day, from, 0), local(day, to, 0)).unwrap()
}

/// An engine over an empty table in a fresh temp directory, with the clock frozen at
/// 2025-03-01 08:00 KST.
pub fn engine() -> (TempDir, BookingEngine) {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_at(&dir, "data/reservations.csv");
    (dir, engine)
}

pub fn engine_at(dir: &TempDir, table: &str) -> BookingEngine {
    let config = EngineConfig { data_file: dir.path().join(table), display_offset: kst(), catalog: Catalog::lab_default() };
    BookingEngine::with_clock(config, Arc::new(FixedClock::new(local(1, 8, 0)))).unwrap()
}

pub fn book(engine: &BookingEngine, user: &str, resource: &str, range: TimeRange, force: bool) -> gpu_booking::error::Result<gpu_booking::domain::writer::Confirmation> {
    engine.create_reservation(UserName::new(user), ResourceId::new(resource), range, format!("{}-project", user), force)
}
