//! # Slot Handlers
//!
//! HTTP entry points for a doctor's time slots. Windows arrive as strings and
//! are parsed once here; everything past this point works with typed values.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use medslot_core::{
    errors::SlotError,
    generator::generate_slots,
    models::{
        time_slot::{BulkOutcome, DateRange, SlotDraft, TimeSlot},
        window::{CreateSlotsRequest, WindowRequest, parse_date},
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for listing a doctor's slots
///
/// Dates are `YYYY-MM-DD` and inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct ListSlotsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub available_only: Option<bool>,
}

impl ListSlotsQuery {
    pub fn into_range(self) -> Result<DateRange, SlotError> {
        let parse = |value: Option<String>| {
            value.as_deref().map(parse_date).transpose()
        };

        let range = DateRange {
            from: parse(self.from)?,
            to: parse(self.to)?,
            available_only: self.available_only.unwrap_or(false),
        };

        if let (Some(from), Some(to)) = (range.from, range.to) {
            if from > to {
                return Err(SlotError::Validation(format!(
                    "Range start {} is after range end {}",
                    from, to
                )));
            }
        }

        Ok(range)
    }
}

/// Cuts a window into slots without storing anything.
///
/// # Endpoint
///
/// ```text
/// POST /api/slots/preview
/// ```
pub async fn preview_slots(
    Json(payload): Json<WindowRequest>,
) -> Result<Json<Vec<SlotDraft>>, AppError> {
    let window = payload.parse()?;
    let drafts = generate_slots(&window)?;

    Ok(Json(drafts))
}

/// Generates slots from an availability window and stores the ones that fit.
///
/// # Endpoint
///
/// ```text
/// POST /api/doctors/:doctor_id/slots
/// ```
///
/// Responds `201 Created` with the accepted slots and, separately, the
/// candidates rejected because they overlap existing availability.
///
/// # Errors
///
/// * `SlotError::InvalidTimeFormat` / `InvalidDateFormat` - malformed window
/// * `SlotError::WindowTooShort` - the window cannot hold a single slot
/// * `SlotError::Validation` - unsupported slot duration
pub async fn create_slots(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<CreateSlotsRequest>,
) -> Result<(StatusCode, Json<BulkOutcome>), AppError> {
    let window = payload.window.parse()?;
    let drafts = generate_slots(&window)?;
    debug!(
        "Generated {} slot(s) for doctor {} on {}",
        drafts.len(),
        doctor_id,
        window.date
    );

    let outcome = state
        .store
        .create_bulk(doctor_id, payload.branch_id, drafts)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let range = query.into_range()?;
    let slots = state.store.list_by_doctor(doctor_id, range).await?;

    Ok(Json(slots))
}

pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    Ok(Json(state.store.get(slot_id).await?))
}

/// Reserves a slot for an appointment. A second booking answers `409 Conflict`.
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    Ok(Json(state.store.book(slot_id).await?))
}

/// Frees a slot after its appointment was cancelled.
pub async fn release_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    Ok(Json(state.store.release(slot_id).await?))
}

pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete(slot_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
