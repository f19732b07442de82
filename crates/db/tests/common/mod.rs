//! Behaviour every `SlotStore` implementation must share. Each backend's test
//! file runs these checks against its own store.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use medslot_core::{
    errors::SlotError,
    generator::generate_slots,
    models::{
        time_slot::{DateRange, RejectionReason, SlotDraft},
        window::AvailabilityWindow,
    },
};
use medslot_db::SlotStore;
use pretty_assertions::assert_eq;
use uuid::Uuid;

pub fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn drafts(date: &str, start: &str, end: &str, duration: u32) -> Vec<SlotDraft> {
    let window = AvailabilityWindow::parse(date, start, end, duration).unwrap();
    generate_slots(&window).unwrap()
}

pub async fn create_bulk_accepts_all_free_slots<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let branch_id = Uuid::new_v4();

    let outcome = store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-10", "09:00", "10:00", 30))
        .await
        .unwrap();

    assert_eq!(outcome.accepted.len(), 2);
    assert!(outcome.rejected.is_empty());
    assert!(outcome.accepted.iter().all(|slot| !slot.is_booked));
    assert!(outcome.accepted.iter().all(|slot| slot.branch_id == branch_id));
    assert_ne!(outcome.accepted[0].id, outcome.accepted[1].id);
}

pub async fn create_bulk_reports_overlaps<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let branch_id = Uuid::new_v4();

    store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-10", "09:00", "10:00", 30))
        .await
        .unwrap();

    // 09:45-10:45 collides with 09:30-10:00; 10:45-11:45 is free.
    let outcome = store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-10", "09:45", "11:45", 60))
        .await
        .unwrap();

    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].start_time, time(10, 45));
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].slot.start_time, time(9, 45));
    assert_eq!(outcome.rejected[0].reason, RejectionReason::Overlap);

    let listed = store
        .list_by_doctor(doctor_id, DateRange::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    for pair in listed.windows(2) {
        assert!(!pair[0].range().overlaps(&pair[1].range()));
    }
}

pub async fn create_bulk_checks_across_midnight<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let branch_id = Uuid::new_v4();

    store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-11", "00:00", "02:00", 60))
        .await
        .unwrap();

    // 23:30-00:30 on the 10th reaches into the first slot of the 11th.
    let outcome = store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-10", "22:30", "00:30", 60))
        .await
        .unwrap();

    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].start_time, time(22, 30));
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].slot.start_time, time(23, 30));
}

pub async fn other_doctors_do_not_conflict<S: SlotStore>(store: &S) {
    let branch_id = Uuid::new_v4();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    let slots = drafts("2025-10-10", "09:00", "12:00", 60);
    store.create_bulk(first, branch_id, slots.clone()).await.unwrap();
    let outcome = store.create_bulk(second, branch_id, slots).await.unwrap();

    assert_eq!(outcome.accepted.len(), 3);
    assert!(outcome.rejected.is_empty());
}

pub async fn book_and_release<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let outcome = store
        .create_bulk(doctor_id, Uuid::new_v4(), drafts("2025-10-10", "09:00", "09:30", 30))
        .await
        .unwrap();
    let slot_id = outcome.accepted[0].id;

    let booked = store.book(slot_id).await.unwrap();
    assert!(booked.is_booked);

    match store.book(slot_id).await {
        Err(SlotError::AlreadyBooked(id)) => assert_eq!(id, slot_id),
        other => panic!("Expected AlreadyBooked, got: {:?}", other),
    }

    let released = store.release(slot_id).await.unwrap();
    assert!(!released.is_booked);

    // Releasing twice is harmless.
    let released = store.release(slot_id).await.unwrap();
    assert!(!released.is_booked);

    assert!(store.book(slot_id).await.unwrap().is_booked);
}

pub async fn missing_slots_are_not_found<S: SlotStore>(store: &S) {
    let slot_id = Uuid::new_v4();

    assert!(matches!(store.book(slot_id).await, Err(SlotError::NotFound(_))));
    assert!(matches!(store.release(slot_id).await, Err(SlotError::NotFound(_))));
    assert!(matches!(store.delete(slot_id).await, Err(SlotError::NotFound(_))));
    assert!(matches!(store.get(slot_id).await, Err(SlotError::NotFound(_))));
}

pub async fn delete_respects_booking<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let outcome = store
        .create_bulk(doctor_id, Uuid::new_v4(), drafts("2025-10-10", "09:00", "10:00", 30))
        .await
        .unwrap();
    let booked_id = outcome.accepted[0].id;
    let free_id = outcome.accepted[1].id;

    store.book(booked_id).await.unwrap();

    match store.delete(booked_id).await {
        Err(SlotError::SlotBooked(id)) => assert_eq!(id, booked_id),
        other => panic!("Expected SlotBooked, got: {:?}", other),
    }

    store.delete(free_id).await.unwrap();

    let remaining = store
        .list_by_doctor(doctor_id, DateRange::default())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, booked_id);

    // A freed time can be offered again.
    let outcome = store
        .create_bulk(doctor_id, Uuid::new_v4(), drafts("2025-10-10", "09:30", "10:00", 30))
        .await
        .unwrap();
    assert_eq!(outcome.accepted.len(), 1);
}

pub async fn list_is_ordered_and_filtered<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let branch_id = Uuid::new_v4();

    store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-12", "14:00", "15:00", 30))
        .await
        .unwrap();
    store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-10", "09:00", "10:00", 30))
        .await
        .unwrap();
    let outcome = store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-11", "08:00", "09:00", 60))
        .await
        .unwrap();
    store.book(outcome.accepted[0].id).await.unwrap();

    let all = store
        .list_by_doctor(doctor_id, DateRange::default())
        .await
        .unwrap();
    let keys: Vec<(NaiveDate, NaiveTime)> = all.iter().map(|s| (s.date, s.start_time)).collect();
    assert_eq!(
        keys,
        vec![
            (date(10), time(9, 0)),
            (date(10), time(9, 30)),
            (date(11), time(8, 0)),
            (date(12), time(14, 0)),
            (date(12), time(14, 30)),
        ]
    );

    let ranged = store
        .list_by_doctor(
            doctor_id,
            DateRange {
                from: Some(date(11)),
                to: Some(date(12)),
                available_only: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 3);

    let available = store
        .list_by_doctor(
            doctor_id,
            DateRange {
                from: Some(date(11)),
                to: None,
                available_only: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(available.len(), 2);
    assert!(available.iter().all(|slot| slot.date == date(12)));

    assert!(store
        .list_by_doctor(Uuid::new_v4(), DateRange::default())
        .await
        .unwrap()
        .is_empty());
}

pub async fn expire_keeps_booked_slots<S: SlotStore>(store: &S) {
    let doctor_id = Uuid::new_v4();
    let branch_id = Uuid::new_v4();

    let past = store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-01", "09:00", "10:00", 30))
        .await
        .unwrap();
    store
        .create_bulk(doctor_id, branch_id, drafts("2025-10-20", "09:00", "10:00", 30))
        .await
        .unwrap();
    store.book(past.accepted[0].id).await.unwrap();

    store.expire_before(date(2)).await.unwrap();

    let remaining = store
        .list_by_doctor(doctor_id, DateRange::default())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 3);
    assert_eq!(remaining[0].id, past.accepted[0].id);
    assert!(store.get(past.accepted[1].id).await.is_err());
}

pub async fn concurrent_bookings_have_one_winner<S: SlotStore + 'static>(store: Arc<S>) {
    let outcome = store
        .create_bulk(Uuid::new_v4(), Uuid::new_v4(), drafts("2025-10-10", "09:00", "09:30", 30))
        .await
        .unwrap();
    let slot_id = outcome.accepted[0].id;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.book(slot_id).await })
        })
        .collect();

    let mut wins = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(SlotError::AlreadyBooked(_)) => conflicts += 1,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(conflicts, 15);
}

pub async fn concurrent_bulk_creation_never_overlaps<S: SlotStore + 'static>(store: Arc<S>) {
    let doctor_id = Uuid::new_v4();

    // Staggered windows that all collide with one another.
    let windows = ["09:00", "09:10", "09:20", "09:30", "09:40", "09:50"];
    let handles: Vec<_> = windows
        .iter()
        .map(|start| {
            let store = Arc::clone(&store);
            let slots = drafts("2025-10-10", start, "12:00", 30);
            tokio::spawn(async move { store.create_bulk(doctor_id, Uuid::new_v4(), slots).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let listed = store
        .list_by_doctor(doctor_id, DateRange::default())
        .await
        .unwrap();
    assert!(!listed.is_empty());
    for (i, a) in listed.iter().enumerate() {
        for b in &listed[i + 1..] {
            assert!(
                !a.range().overlaps(&b.range()),
                "{:?} overlaps {:?}",
                a.range(),
                b.range()
            );
        }
    }
}
