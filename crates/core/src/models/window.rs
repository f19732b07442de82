use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SlotError, SlotResult};

/// Shortest slot a doctor may offer.
pub const MIN_SLOT_DURATION_MINUTES: u32 = 15;

/// Slots are stored as times of day, so one must end before the same clock
/// time comes round again.
pub const MAX_SLOT_DURATION_MINUTES: u32 = 24 * 60 - 1;

/// Raw availability a doctor defines before it is cut into slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
}

impl AvailabilityWindow {
    /// Parses the textual form a caller submits. Every field is checked here so
    /// nothing downstream handles loose strings.
    pub fn parse(
        date: &str,
        start_time: &str,
        end_time: &str,
        slot_duration_minutes: u32,
    ) -> SlotResult<Self> {
        let window = Self {
            date: parse_date(date)?,
            start_time: parse_time_of_day(start_time)?,
            end_time: parse_time_of_day(end_time)?,
            slot_duration_minutes,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> SlotResult<()> {
        if self.slot_duration_minutes < MIN_SLOT_DURATION_MINUTES {
            return Err(SlotError::Validation(format!(
                "Slot duration must be at least {} minutes, got {}",
                MIN_SLOT_DURATION_MINUTES, self.slot_duration_minutes
            )));
        }
        if self.slot_duration_minutes > MAX_SLOT_DURATION_MINUTES {
            return Err(SlotError::Validation(format!(
                "Slot duration must be shorter than a day, got {} minutes",
                self.slot_duration_minutes
            )));
        }
        Ok(())
    }

    /// True when the end time does not come after the start time, so the
    /// window continues into the next day.
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> SlotResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDateFormat(value.to_string()))
}

/// Parses a 24-hour `HH:MM` or `HH:MM:SS` time of day.
///
/// The hour may be written with one or two digits; minutes and seconds always
/// take two. Anything else, including AM/PM suffixes and surrounding
/// whitespace, is rejected rather than coerced.
pub fn parse_time_of_day(value: &str) -> SlotResult<NaiveTime> {
    let invalid = || SlotError::InvalidTimeFormat(value.to_string());

    let parts: Vec<&str> = value.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }

    let hour = parse_component(parts[0], 1..=2).ok_or_else(invalid)?;
    let minute = parse_component(parts[1], 2..=2).ok_or_else(invalid)?;
    let second = match parts.get(2) {
        Some(part) => parse_component(part, 2..=2).ok_or_else(invalid)?,
        None => 0,
    };

    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}

fn parse_component(part: &str, width: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !width.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Seconds elapsed since midnight.
pub fn seconds_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub slot_duration_minutes: u32,
}

impl WindowRequest {
    pub fn parse(&self) -> SlotResult<AvailabilityWindow> {
        AvailabilityWindow::parse(
            &self.date,
            &self.start_time,
            &self.end_time,
            self.slot_duration_minutes,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotsRequest {
    pub branch_id: Uuid,
    #[serde(flatten)]
    pub window: WindowRequest,
}
