mod common;

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{book, engine, hours};
use gpu_booking::domain::catalog::ResourceClass;
use gpu_booking::domain::time_range::TimeRange;
use gpu_booking::domain::utils::id::{ResourceId, UserName};
use gpu_booking::domain::writer::SUCCESS_MESSAGE;
use gpu_booking::error::Error;

#[test]
fn test_overlap_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(0x6770_7573);
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

    let random_range = |rng: &mut StdRng| {
        let start = base + Duration::minutes(rng.random_range(0..2_000));
        TimeRange::new(start, start + Duration::minutes(rng.random_range(1..600))).unwrap()
    };

    for _ in 0..2_000 {
        let a = random_range(&mut rng);
        let b = random_range(&mut rng);

        assert_eq!(a.overlaps(&b), b.overlaps(&a), "asymmetric overlap for {} and {}", a, b);
        assert_eq!(a.overlaps(&b), a.clip_to(&b).is_some());
    }
}

#[test]
fn test_back_to_back_bookings_do_not_conflict() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "RTX-Server-0", hours(10, 9, 10), false).unwrap();

    let conflicts = engine.check_conflicts(&ResourceId::new("RTX-Server-0"), &hours(10, 10, 11)).unwrap();
    assert!(conflicts.is_empty());

    book(&engine, "bob", "RTX-Server-0", hours(10, 10, 11), false).unwrap();
    assert_eq!(engine.list_reservations().unwrap().len(), 2);
}

#[test]
fn test_overlapping_booking_is_rejected_with_owner() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "RTX-Server-0", hours(10, 9, 12), false).unwrap();

    let conflicts = engine.check_conflicts(&ResourceId::new("RTX-Server-0"), &hours(10, 11, 13)).unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].user, UserName::new("alice"));
    assert_eq!(conflicts[0].to_string(), "alice (alice-project)");

    match book(&engine, "bob", "RTX-Server-0", hours(10, 11, 13), false) {
        Err(Error::Conflict { conflicts }) => assert_eq!(conflicts[0].user, UserName::new("alice")),
        other => panic!("expected a conflict, got {:?}", other),
    }
    assert_eq!(engine.list_reservations().unwrap().len(), 1, "rejected booking must not be written");
}

#[test]
fn test_conflict_message_lists_all_owners() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "H100-01", hours(10, 9, 12), false).unwrap();
    book(&engine, "bob", "H100-01", hours(10, 12, 14), false).unwrap();

    let err = book(&engine, "carol", "H100-01", hours(10, 11, 13), false).unwrap_err();

    assert_eq!(err.to_string(), "Conflict detected with: alice (alice-project), bob (bob-project)");
}

#[test]
fn test_other_resources_do_not_conflict() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "H100-01", hours(10, 9, 12), false).unwrap();

    assert!(book(&engine, "bob", "H100-02", hours(10, 9, 12), false).is_ok());
}

#[test]
fn test_force_stores_overlapping_booking() {
    let (_dir, engine) = engine();
    book(&engine, "alice", "RTX-Server-0", hours(10, 9, 12), false).unwrap();

    let confirmation = book(&engine, "bob", "RTX-Server-0", hours(10, 11, 13), true).unwrap();
    assert!(confirmation.forced);
    assert_eq!(confirmation.message, SUCCESS_MESSAGE);

    let conflicts = engine.check_conflicts(&ResourceId::new("RTX-Server-0"), &hours(10, 11, 13)).unwrap();
    let users: Vec<String> = conflicts.iter().map(|c| c.user.to_string()).collect();
    assert_eq!(users, vec!["alice", "bob"]);
}

#[test]
fn test_unknown_resource_is_stored_with_sentinel_class() {
    let (_dir, engine) = engine();

    let confirmation = book(&engine, "alice", "4090-01", hours(10, 9, 12), false).unwrap();
    assert_eq!(confirmation.reservation.resource_class, ResourceClass::Unknown);

    let stored = engine.list_reservations().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].resource_class, ResourceClass::Unknown);
    assert_eq!(stored[0].resource_id, ResourceId::new("4090-01"));
}

#[test]
fn test_catalog_class_is_recorded() {
    let (_dir, engine) = engine();

    let confirmation = book(&engine, "alice", "H100-02", hours(10, 9, 12), false).unwrap();

    assert_eq!(confirmation.reservation.resource_class, ResourceClass::H100);
}
