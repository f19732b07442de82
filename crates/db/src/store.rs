//! # Slot Store
//!
//! [`SlotStore`] is the boundary the rest of the application uses to create,
//! book, release, delete and list time slots. Two implementations exist:
//! [`PgSlotStore`] persists to PostgreSQL and [`crate::memory::MemorySlotStore`]
//! keeps slots in process memory.
//!
//! ## Bulk creation contract
//!
//! `create_bulk` accepts every candidate that overlaps neither an existing slot
//! of the doctor nor a candidate accepted earlier in the same batch. Accepted
//! candidates are persisted together in one transaction; the others are
//! returned with the reason they were turned away. A partially accepted batch is
//! therefore a successful call.

use async_trait::async_trait;
use chrono::NaiveDate;
use medslot_core::{
    conflict::{affected_dates, partition_candidates},
    errors::{SlotError, SlotResult},
    models::time_slot::{BulkOutcome, DateRange, SlotDraft, SlotRange, TimeSlot},
};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::repositories::time_slot as repo;

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Persists the non-overlapping subset of `candidates` for a doctor.
    async fn create_bulk(
        &self,
        doctor_id: Uuid,
        branch_id: Uuid,
        candidates: Vec<SlotDraft>,
    ) -> SlotResult<BulkOutcome>;

    /// Reserves an available slot.
    ///
    /// Fails with `AlreadyBooked` when the slot is booked, including when a
    /// concurrent call won the race.
    async fn book(&self, slot_id: Uuid) -> SlotResult<TimeSlot>;

    /// Makes a slot available again. Releasing an unbooked slot is a no-op.
    async fn release(&self, slot_id: Uuid) -> SlotResult<TimeSlot>;

    /// Removes an unbooked slot; booked slots fail with `SlotBooked`.
    async fn delete(&self, slot_id: Uuid) -> SlotResult<()>;

    async fn get(&self, slot_id: Uuid) -> SlotResult<TimeSlot>;

    /// A doctor's slots ordered by date and start time.
    async fn list_by_doctor(&self, doctor_id: Uuid, range: DateRange) -> SlotResult<Vec<TimeSlot>>;

    /// Drops unbooked slots dated before `date` and returns how many were removed.
    /// Booked slots are kept as appointment history.
    async fn expire_before(&self, date: NaiveDate) -> SlotResult<u64>;
}

pub(crate) fn log_outcome(doctor_id: Uuid, outcome: &BulkOutcome) {
    if !outcome.rejected.is_empty() {
        warn!(
            "Rejected {} candidate slot(s) for doctor {}",
            outcome.rejected.len(),
            doctor_id
        );
    }
    info!(
        "Created {} slot(s) for doctor {}",
        outcome.accepted.len(),
        doctor_id
    );
}

/// PostgreSQL-backed slot store.
///
/// Bulk creation holds advisory locks on every (doctor, date) pair a batch can
/// touch for the lifetime of its transaction. Booking relies on a conditional
/// row update instead of a lock.
#[derive(Clone)]
pub struct PgSlotStore {
    pool: PgPool,
}

impl PgSlotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn existing_slot(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        repo::get_time_slot_by_id(&self.pool, slot_id)
            .await?
            .map(TimeSlot::from)
            .ok_or_else(|| SlotError::slot_not_found(slot_id))
    }
}

#[async_trait]
impl SlotStore for PgSlotStore {
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

        let mut tx = self.pool.begin().await.map_err(eyre::Report::from)?;

        for date in &dates {
            repo::lock_doctor_date(&mut tx, doctor_id, *date).await?;
        }

        let existing: Vec<SlotRange> = repo::get_time_slots_between(&mut tx, doctor_id, first, last)
            .await?
            .into_iter()
            .map(|row| TimeSlot::from(row).range())
            .collect();

        let (accepted, rejected) = partition_candidates(&existing, candidates);

        let mut created = Vec::with_capacity(accepted.len());
        for draft in &accepted {
            let row = repo::create_time_slot(&mut tx, doctor_id, branch_id, draft).await?;
            created.push(TimeSlot::from(row));
        }

        tx.commit().await.map_err(eyre::Report::from)?;

        let outcome = BulkOutcome {
            accepted: created,
            rejected,
        };
        log_outcome(doctor_id, &outcome);
        Ok(outcome)
    }

    async fn book(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        debug!("Booking slot {}", slot_id);

        if let Some(row) = repo::mark_booked(&self.pool, slot_id).await? {
            return Ok(row.into());
        }

        // Nothing was updated: either the slot is gone or someone holds it.
        let slot = self.existing_slot(slot_id).await?;
        warn!("Slot {} is already booked", slot.id);
        Err(SlotError::AlreadyBooked(slot.id))
    }

    async fn release(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        debug!("Releasing slot {}", slot_id);

        repo::mark_available(&self.pool, slot_id)
            .await?
            .map(TimeSlot::from)
            .ok_or_else(|| SlotError::slot_not_found(slot_id))
    }

    async fn delete(&self, slot_id: Uuid) -> SlotResult<()> {
        debug!("Deleting slot {}", slot_id);

        if repo::delete_unbooked_time_slot(&self.pool, slot_id).await? {
            return Ok(());
        }

        let slot = self.existing_slot(slot_id).await?;
        Err(SlotError::SlotBooked(slot.id))
    }

    async fn get(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        self.existing_slot(slot_id).await
    }

    async fn list_by_doctor(&self, doctor_id: Uuid, range: DateRange) -> SlotResult<Vec<TimeSlot>> {
        debug!("Listing slots for doctor {}", doctor_id);

        let rows = repo::get_time_slots_by_doctor_id(&self.pool, doctor_id, range).await?;
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }

    async fn expire_before(&self, date: NaiveDate) -> SlotResult<u64> {
        let removed = repo::delete_unbooked_time_slots_before(&self.pool, date).await?;
        if removed > 0 {
            info!("Expired {} unbooked slot(s) dated before {}", removed, date);
        }
        Ok(removed)
    }
}
