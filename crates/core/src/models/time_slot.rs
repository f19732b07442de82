use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SlotError;

/// A resolved `[starts_at, ends_at)` interval on the doctor's timeline.
///
/// Slots are stored as a calendar date plus two times of day. An end time that
/// is not after the start time belongs to the following day, which is how a
/// slot ending at midnight (`23:00`-`00:00`) keeps a positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotRange {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl SlotRange {
    /// A next-day end past the last representable date saturates at
    /// `NaiveDateTime::MAX`, so the range never comes out inverted.
    pub fn resolve(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let starts_at = date.and_time(start_time);
        let ends_at = if end_time <= start_time {
            date.checked_add_days(Days::new(1))
                .map_or(NaiveDateTime::MAX, |next| next.and_time(end_time))
        } else {
            date.and_time(end_time)
        };

        Self { starts_at, ends_at }
    }

    /// Half-open intersection test: touching ranges do not overlap.
    pub fn overlaps(&self, other: &SlotRange) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.ends_at - self.starts_at).num_minutes()
    }
}

/// A candidate slot produced by the generator, not yet accepted by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDraft {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SlotDraft {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }

    pub fn range(&self) -> SlotRange {
        SlotRange::resolve(self.date, self.start_time, self.end_time)
    }

    /// False for zero-length drafts and for drafts ending on a day the
    /// calendar cannot represent.
    pub fn is_bookable(&self) -> bool {
        self.start_time != self.end_time
            && (self.start_time < self.end_time || self.date.succ_opt().is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Accepts a draft for a doctor, assigning a fresh id. New slots are never booked.
    pub fn from_draft(doctor_id: Uuid, branch_id: Uuid, draft: &SlotDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            branch_id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            is_booked: false,
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> SlotRange {
        SlotRange::resolve(self.date, self.start_time, self.end_time)
    }

    pub fn is_available(&self) -> bool {
        !self.is_booked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Overlap,
    InvalidRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedSlot {
    pub slot: SlotDraft,
    pub reason: RejectionReason,
}

impl RejectedSlot {
    /// The error a caller that cannot accept partial batches should report.
    pub fn into_error(self) -> SlotError {
        let slot = format!(
            "{} {}-{}",
            self.slot.date, self.slot.start_time, self.slot.end_time
        );
        match self.reason {
            RejectionReason::Overlap => SlotError::Overlap(slot),
            RejectionReason::InvalidRange => {
                SlotError::Validation(format!("Slot {} is not a bookable range", slot))
            }
        }
    }
}

/// Result of a bulk creation: candidates that were persisted and those that were not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub accepted: Vec<TimeSlot>,
    pub rejected: Vec<RejectedSlot>,
}

/// Filter for listing a doctor's slots. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub available_only: bool,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn admits(&self, slot: &TimeSlot) -> bool {
        self.contains(slot.date) && (!self.available_only || slot.is_available())
    }
}
