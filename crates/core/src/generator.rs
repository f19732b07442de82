//! # Slot Generator
//!
//! Expands an [`AvailabilityWindow`] into contiguous, equally sized slot drafts.
//!
//! The window is measured in seconds from midnight of the window date. When the
//! end time does not come after the start time the window runs overnight and the
//! end moves 24 hours forward. Slots are then cut from the start, one duration at
//! a time, and any trailing remainder shorter than the duration is dropped. A
//! slot starting after midnight is dated on the following day.

use chrono::{Days, NaiveDate, NaiveTime, TimeDelta};

use crate::{
    errors::{SlotError, SlotResult},
    models::{
        time_slot::SlotDraft,
        window::{AvailabilityWindow, seconds_of_day},
    },
};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Generates the ordered slot drafts covering `window`.
///
/// # Errors
///
/// * `SlotError::Validation` - the slot duration is below the minimum
/// * `SlotError::WindowTooShort` - the (possibly overnight) window cannot hold one slot
pub fn generate_slots(window: &AvailabilityWindow) -> SlotResult<Vec<SlotDraft>> {
    window.validate()?;

    let start = seconds_of_day(window.start_time);
    let mut end = seconds_of_day(window.end_time);
    if end <= start {
        end += SECONDS_PER_DAY;
    }

    let duration = i64::from(window.slot_duration_minutes) * 60;
    let available = end - start;
    if available < duration {
        return Err(SlotError::WindowTooShort {
            available_minutes: available / 60,
            requested_minutes: window.slot_duration_minutes,
        });
    }

    let mut slots = Vec::with_capacity((available / duration) as usize);
    let mut cursor = start;
    while cursor + duration <= end {
        let date = date_at(window.date, cursor)?;
        // A slot ending at midnight needs the following day as well.
        date_at(window.date, cursor + duration)?;
        slots.push(SlotDraft::new(
            date,
            time_at(cursor),
            time_at(cursor + duration),
        ));
        cursor += duration;
    }

    Ok(slots)
}

/// Calendar day a cursor falls on, counting whole days past the window date.
fn date_at(base: NaiveDate, seconds: i64) -> SlotResult<NaiveDate> {
    let offset = (seconds / SECONDS_PER_DAY) as u64;
    base.checked_add_days(Days::new(offset)).ok_or_else(|| {
        SlotError::Validation(format!("Date {} is out of the supported range", base))
    })
}

/// Time of day a cursor points at; hours wrap modulo 24.
fn time_at(seconds: i64) -> NaiveTime {
    NaiveTime::MIN + TimeDelta::seconds(seconds.rem_euclid(SECONDS_PER_DAY))
}
