use chrono::{Datelike, FixedOffset, NaiveDate, Weekday};

use crate::domain::reservation::Reservation;
use crate::domain::time_range::{TimeRange, decimal_hours_since};
use crate::domain::utils::id::{ReservationId, ResourceId, UserName};
use crate::error::{Error, Result};

/// One cell of the month calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub weekday: Weekday,

    /// Row of the day in a Monday-first month grid, starting at 0.
    pub week_of_month: u32,

    /// Number of reservations overlapping the day.
    pub count: usize,

    /// Distinct users with a reservation that day, in first-seen order.
    pub users: Vec<UserName>,
}

/// One bar of the day timetable: a reservation clipped to the day.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableEntry {
    pub id: ReservationId,
    pub resource_id: ResourceId,
    pub user: UserName,
    pub project: String,

    /// Hours after local midnight, within `[0, 24]`.
    pub start_hour: f64,
    pub end_hour: f64,
}

impl TimetableEntry {
    pub fn duration_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }
}

pub fn month_overview(reservations: &[Reservation], year: i32, month: u32, offset: FixedOffset) -> Result<Vec<DaySummary>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::Validation(format!("{}-{:02} is not a valid month", year, month)))?;
    let lead = first.weekday().num_days_from_monday();

    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| {
            let window = TimeRange::local_day(date, offset);
            let mut count = 0;
            let mut users: Vec<UserName> = Vec::new();

            for reservation in reservations.iter().filter(|r| r.range.overlaps(&window)) {
                count += 1;
                if !users.contains(&reservation.user) {
                    users.push(reservation.user.clone());
                }
            }

            DaySummary { date, weekday: date.weekday(), week_of_month: (date.day() + lead - 1) / 7, count, users }
        })
        .collect();

    Ok(days)
}

pub fn day_timetable(reservations: &[Reservation], date: NaiveDate, offset: FixedOffset) -> Vec<TimetableEntry> {
    let window = TimeRange::local_day(date, offset);

    reservations
        .iter()
        .filter_map(|reservation| {
            let clipped = reservation.range.clip_to(&window)?;
            Some(TimetableEntry {
                id: reservation.id,
                resource_id: reservation.resource_id.clone(),
                user: reservation.user.clone(),
                project: reservation.project.clone(),
                start_hour: decimal_hours_since(window.start(), clipped.start()),
                end_hour: decimal_hours_since(window.start(), clipped.end()),
            })
        })
        .collect()
}

/// All reservations, latest start first. Ties keep storage order.
pub fn management_listing(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
    reservations.sort_by(|a, b| b.range.start().cmp(&a.range.start()));
    reservations
}
