mod common;

use chrono::{Duration, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{book, engine, hours, kst, local, march};
use gpu_booking::domain::catalog::{Catalog, ResourceClass};
use gpu_booking::domain::occupancy::OccupancyAggregator;
use gpu_booking::domain::time_range::TimeRange;
use gpu_booking::domain::utils::id::UserName;

fn close_to(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn test_empty_day_is_zero_for_every_class() {
    let (_dir, engine) = engine();

    let report = engine.get_occupancy(march(10)).unwrap();

    assert_eq!(report.date, march(10));
    assert_eq!(report.by_class.keys().copied().collect::<Vec<_>>(), vec![ResourceClass::Rtx4090, ResourceClass::H100]);
    assert!(report.by_class.values().all(|percent| *percent == 0.0));
}

#[test]
fn test_every_unit_booked_all_day_is_full() {
    let (_dir, engine) = engine();
    for (i, server) in ["RTX-Server-0", "RTX-Server-1", "RTX-Server-2", "RTX-Server-3"].iter().enumerate() {
        book(&engine, &format!("user{}", i), server, full_day(10), false).unwrap();
    }

    let report = engine.get_occupancy(march(10)).unwrap();

    assert!(close_to(report.get(ResourceClass::Rtx4090), 100.0));
    assert!(close_to(report.get(ResourceClass::H100), 0.0));
}

#[test]
fn test_every_unit_booked_half_day_is_half() {
    let (_dir, engine) = engine();
    for server in ["RTX-Server-0", "RTX-Server-1", "RTX-Server-2", "RTX-Server-3"] {
        book(&engine, "alice", server, hours(10, 8, 20), false).unwrap();
    }

    let report = engine.get_occupancy(march(10)).unwrap();

    assert!(close_to(report.get(ResourceClass::Rtx4090), 50.0));
}

#[test]
fn test_single_unit_all_day_counts_against_class_capacity() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "RTX-Server-2", full_day(10), false).unwrap();
    book(&engine, "bob", "H100-01", hours(10, 0, 12), false).unwrap();

    let report = engine.get_occupancy(march(10)).unwrap();

    assert!(close_to(report.get(ResourceClass::Rtx4090), 25.0));
    assert!(close_to(report.get(ResourceClass::H100), 25.0));
}

#[test]
fn test_day_boundary_uses_display_time() {
    let (_dir, engine) = engine();
    // 22:00 on the 10th until 04:00 on the 11th, KST.
    let range = TimeRange::new(local(10, 22, 0), local(11, 4, 0)).unwrap();
    book(&engine, "alice", "H100-02", range, false).unwrap();

    let tenth = engine.get_occupancy(march(10)).unwrap();
    let eleventh = engine.get_occupancy(march(11)).unwrap();

    // 2h and 4h of 2 * 24h.
    assert!(close_to(tenth.get(ResourceClass::H100), 2.0 / 48.0 * 100.0));
    assert!(close_to(eleventh.get(ResourceClass::H100), 4.0 / 48.0 * 100.0));
}

#[test]
fn test_occupancy_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(0x4f43_4355);
    let catalog = Catalog::lab_default();
    let aggregator = OccupancyAggregator::new(&catalog, kst());
    let resources = catalog.resources().to_vec();

    for _ in 0..50 {
        let reservations: Vec<_> = (0..rng.random_range(0..40))
            .map(|i| {
                let resource = &resources[rng.random_range(0..resources.len())];
                let start = local(9, 0, 0) + Duration::minutes(rng.random_range(0..3 * 24 * 60));
                let range = TimeRange::new(start, start + Duration::minutes(rng.random_range(1..36 * 60))).unwrap();
                gpu_booking::domain::reservation::Reservation {
                    id: gpu_booking::domain::utils::id::ReservationId(i + 1),
                    user: UserName::new("alice"),
                    resource_id: resource.id.clone(),
                    resource_class: resource.class,
                    range,
                    project: String::new(),
                }
            })
            .collect();

        let report = aggregator.occupancy(&reservations, march(10));
        for (class, percent) in &report.by_class {
            assert!((0.0..=100.0).contains(percent), "{} out of bounds: {}", class, percent);
        }
    }
}

#[test]
fn test_month_overview_counts_bookings_per_day() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "H100-01", hours(10, 9, 12), false).unwrap();
    book(&engine, "bob", "H100-02", hours(10, 13, 15), false).unwrap();
    book(&engine, "alice", "H100-01", hours(10, 14, 16), false).unwrap();
    book(&engine, "carol", "RTX-Server-0", TimeRange::new(local(11, 23, 0), local(12, 1, 0)).unwrap(), false).unwrap();

    let days = engine.month_overview(2025, 3).unwrap();

    assert_eq!(days.len(), 31);
    // 2025-03-01 is a Saturday, so the 10th is a Monday on the third row.
    assert_eq!(days[9].weekday, Weekday::Mon);
    assert_eq!(days[9].week_of_month, 2);
    assert_eq!(days[9].count, 3);
    assert_eq!(days[9].users, vec![UserName::new("alice"), UserName::new("bob")]);
    assert_eq!(days[10].count, 1);
    assert_eq!(days[11].count, 1);
    assert_eq!(days[12].count, 0);
}

#[test]
fn test_month_overview_rejects_invalid_month() {
    let (_dir, engine) = engine();

    assert!(engine.month_overview(2025, 13).is_err());
}

#[test]
fn test_day_timetable_clips_to_the_day() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "H100-01", TimeRange::new(local(9, 20, 0), local(10, 2, 30)).unwrap(), false).unwrap();
    book(&engine, "bob", "RTX-Server-1", hours(10, 9, 11), false).unwrap();
    book(&engine, "carol", "RTX-Server-1", hours(11, 9, 11), false).unwrap();

    let entries = engine.day_timetable(march(10)).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].user, UserName::new("alice"));
    assert!(close_to(entries[0].start_hour, 0.0));
    assert!(close_to(entries[0].end_hour, 2.5));
    assert!(close_to(entries[1].start_hour, 9.0));
    assert!(close_to(entries[1].duration_hours(), 2.0));
    assert_eq!(entries[1].project, "bob-project");
}

fn full_day(day: u32) -> TimeRange {
    TimeRange::local_day(march(day), kst())
}
