use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use medslot_core::{
    conflict::{affected_dates, partition_candidates},
    errors::{SlotError, SlotResult},
    models::time_slot::{BulkOutcome, DateRange, SlotDraft, SlotRange, TimeSlot},
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::{SlotStore, log_outcome};

type SlotKey = (Uuid, NaiveDate, NaiveTime, Uuid);

/// Slot store kept in process memory.
///
/// Every mutation runs under one write lock, which serialises bulk creation
/// and booking; listings read a consistent snapshot under the read lock.
#[derive(Default)]
pub struct MemorySlotStore {
    book: RwLock<SlotBook>,
}

#[derive(Default)]
struct SlotBook {
    slots: HashMap<Uuid, TimeSlot>,
    // (doctor, date, start, id), kept in listing order
    by_doctor: BTreeSet<SlotKey>,
}

impl SlotBook {
    fn key(slot: &TimeSlot) -> SlotKey {
        (slot.doctor_id, slot.date, slot.start_time, slot.id)
    }

    fn insert(&mut self, slot: TimeSlot) {
        self.by_doctor.insert(Self::key(&slot));
        self.slots.insert(slot.id, slot);
    }

    fn remove(&mut self, slot_id: Uuid) -> Option<TimeSlot> {
        let slot = self.slots.remove(&slot_id)?;
        self.by_doctor.remove(&Self::key(&slot));
        Some(slot)
    }

    fn between(
        &self,
        doctor_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &TimeSlot> {
        self.by_doctor
            .range((doctor_id, from, NaiveTime::MIN, Uuid::nil())..)
            .take_while(move |(doctor, date, _, _)| *doctor == doctor_id && *date <= to)
            .filter_map(|(_, _, _, id)| self.slots.get(id))
    }

    fn of_doctor(&self, doctor_id: Uuid) -> impl Iterator<Item = &TimeSlot> {
        self.between(doctor_id, NaiveDate::MIN, NaiveDate::MAX)
    }
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn create_bulk(
        &self,
        doctor_id: Uuid,
        branch_id: Uuid,
        candidates: Vec<SlotDraft>,
    ) -> SlotResult<BulkOutcome> {
        debug!(
            "Creating {} candidate slot(s) for doctor {}",
            candidates.len(),
            doctor_id
        );

        let dates = affected_dates(&candidates);
        let (Some(first), Some(last)) = (dates.first().copied(), dates.last().copied()) else {
            return Ok(BulkOutcome::default());
        };

        let mut book = self.book.write().await;

        let existing: Vec<SlotRange> = book
            .between(doctor_id, first, last)
            .map(TimeSlot::range)
            .collect();

        let (accepted, rejected) = partition_candidates(&existing, candidates);

        let created: Vec<TimeSlot> = accepted
            .iter()
            .map(|draft| TimeSlot::from_draft(doctor_id, branch_id, draft))
            .collect();
        for slot in &created {
            book.insert(slot.clone());
        }

        let outcome = BulkOutcome {
            accepted: created,
            rejected,
        };
        log_outcome(doctor_id, &outcome);
        Ok(outcome)
    }

    async fn book(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        debug!("Booking slot {}", slot_id);

        let mut book = self.book.write().await;
        let slot = book
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| SlotError::slot_not_found(slot_id))?;

        if slot.is_booked {
            warn!("Slot {} is already booked", slot_id);
            return Err(SlotError::AlreadyBooked(slot_id));
        }

        slot.is_booked = true;
        Ok(slot.clone())
    }

    async fn release(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        debug!("Releasing slot {}", slot_id);

        let mut book = self.book.write().await;
        let slot = book
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| SlotError::slot_not_found(slot_id))?;

        slot.is_booked = false;
        Ok(slot.clone())
    }

    async fn delete(&self, slot_id: Uuid) -> SlotResult<()> {
        debug!("Deleting slot {}", slot_id);

        let mut book = self.book.write().await;
        let is_booked = book
            .slots
            .get(&slot_id)
            .map(|slot| slot.is_booked)
            .ok_or_else(|| SlotError::slot_not_found(slot_id))?;

        if is_booked {
            return Err(SlotError::SlotBooked(slot_id));
        }

        book.remove(slot_id);
        Ok(())
    }

    async fn get(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        let book = self.book.read().await;
        book.slots
            .get(&slot_id)
            .cloned()
            .ok_or_else(|| SlotError::slot_not_found(slot_id))
    }

    async fn list_by_doctor(&self, doctor_id: Uuid, range: DateRange) -> SlotResult<Vec<TimeSlot>> {
        debug!("Listing slots for doctor {}", doctor_id);

        let book = self.book.read().await;
        Ok(book
            .of_doctor(doctor_id)
            .filter(|slot| range.admits(slot))
            .cloned()
            .collect())
    }

    async fn expire_before(&self, date: NaiveDate) -> SlotResult<u64> {
        let mut book = self.book.write().await;
        let expired: Vec<Uuid> = book
            .slots
            .values()
            .filter(|slot| slot.date < date && slot.is_available())
            .map(|slot| slot.id)
            .collect();

        for slot_id in &expired {
            book.remove(*slot_id);
        }

        if !expired.is_empty() {
            info!("Expired {} unbooked slot(s) dated before {}", expired.len(), date);
        }
        Ok(expired.len() as u64)
    }
}
