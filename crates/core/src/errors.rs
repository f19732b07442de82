use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error(
        "Window too short: {available_minutes} minutes available, {requested_minutes} minutes requested"
    )]
    WindowTooShort {
        available_minutes: i64,
        requested_minutes: u32,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Bulk creation reports overlaps per candidate in `BulkOutcome`; this
    /// variant is what `RejectedSlot::into_error` turns one into.
    #[error("Slot overlaps an existing slot: {0}")]
    Overlap(String),

    #[error("Slot {0} is already booked")]
    AlreadyBooked(Uuid),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Slot {0} is booked and cannot be deleted")]
    SlotBooked(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SlotError {
    pub fn slot_not_found(slot_id: Uuid) -> Self {
        SlotError::NotFound(format!("Slot with ID {} not found", slot_id))
    }
}

pub type SlotResult<T> = Result<T, SlotError>;
