//! Overlap arbitration shared by every slot store.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::models::time_slot::{RejectedSlot, RejectionReason, SlotDraft, SlotRange};

/// Splits `candidates` into those that fit next to `existing` and those that do not.
///
/// Candidates are checked in order, and each accepted one is taken into account
/// for the ones after it, so a batch can never conflict with itself.
pub fn partition_candidates(
    existing: &[SlotRange],
    candidates: Vec<SlotDraft>,
) -> (Vec<SlotDraft>, Vec<RejectedSlot>) {
    let mut taken: Vec<SlotRange> = existing.to_vec();
    let mut accepted = Vec::with_capacity(candidates.len());
    let mut rejected = Vec::new();

    for candidate in candidates {
        if !candidate.is_bookable() {
            rejected.push(RejectedSlot {
                slot: candidate,
                reason: RejectionReason::InvalidRange,
            });
            continue;
        }

        let range = candidate.range();
        if taken.iter().any(|other| other.overlaps(&range)) {
            rejected.push(RejectedSlot {
                slot: candidate,
                reason: RejectionReason::Overlap,
            });
        } else {
            taken.push(range);
            accepted.push(candidate);
        }
    }

    (accepted, rejected)
}

/// Every date whose slots can intersect a candidate of the batch.
///
/// A slot is dated on the day it starts and lasts at most a day, so only the
/// neighbouring dates need to be consulted (and locked). Returned in ascending
/// order, which is also the order locks must be taken in.
pub fn affected_dates(candidates: &[SlotDraft]) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();
    for candidate in candidates {
        dates.insert(candidate.date);
        if let Some(previous) = candidate.date.checked_sub_days(Days::new(1)) {
            dates.insert(previous);
        }
        if let Some(next) = candidate.date.checked_add_days(Days::new(1)) {
            dates.insert(next);
        }
    }
    dates.into_iter().collect()
}
