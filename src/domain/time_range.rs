use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, Result};

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Formats accepted for timestamps that carry no offset of their own.
const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Formats accepted for timestamps with an explicit offset but without the RFC 3339 `T`.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// A half-open interval `[start, end)` of absolute instants.
///
/// `start < end` holds for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(Error::Validation(format!("end time ({}) must be after start time ({})", format_timestamp(end), format_timestamp(start))));
        }
        Ok(TimeRange { start, end })
    }

    /// The local calendar day `date` in `offset`, as `[midnight, next midnight)`.
    pub fn local_day(date: NaiveDate, offset: FixedOffset) -> Self {
        let start = local_to_utc(date.and_time(NaiveTime::MIN), offset);
        TimeRange { start, end: start + Duration::days(1) }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap: touching at a boundary does not count.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The part of `self` that lies inside `window`, if any.
    pub fn clip_to(&self, window: &TimeRange) -> Option<TimeRange> {
        if !self.overlaps(window) {
            return None;
        }
        Some(TimeRange { start: self.start.max(window.start), end: self.end.min(window.end) })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", format_timestamp(self.start), format_timestamp(self.end))
    }
}

pub fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let utc_naive = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc_naive)
}

pub fn to_local(time: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    time.with_timezone(&offset)
}

/// Hours elapsed between `day_start` and `time` as a decimal, e.g. 13:30 becomes 13.5.
pub fn decimal_hours_since(day_start: DateTime<Utc>, time: DateTime<Utc>) -> f64 {
    (time - day_start).num_seconds() as f64 / 3600.0
}

pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a stored or user-supplied timestamp.
///
/// RFC 3339 and space-separated timestamps with an explicit offset are taken as given.
/// Timestamps without an offset are read as local time in `offset`.
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(time.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(time) = DateTime::parse_from_str(raw, format) {
            return Ok(time.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(local_to_utc(naive, offset));
        }
    }

    Err(Error::Validation(format!("unrecognized timestamp '{}'", raw)))
}

pub fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return Err(Error::ConfigError(format!("display offset of {} hours is out of range", hours)));
    }
    FixedOffset::east_opt(hours * 3600).ok_or_else(|| Error::ConfigError(format!("display offset of {} hours is out of range", hours)))
}
