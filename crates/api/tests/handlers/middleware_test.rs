use axum::{body::to_bytes, http::StatusCode};
use medslot_api::middleware::error_handling::{AppError, map_error};
use medslot_core::errors::SlotError;
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

#[rstest]
#[case::bad_time(SlotError::InvalidTimeFormat("25:00".into()), StatusCode::BAD_REQUEST)]
#[case::bad_date(SlotError::InvalidDateFormat("2025-13-01".into()), StatusCode::BAD_REQUEST)]
#[case::too_short(
    SlotError::WindowTooShort { available_minutes: 10, requested_minutes: 15 },
    StatusCode::BAD_REQUEST
)]
#[case::validation(SlotError::Validation("Invalid input".into()), StatusCode::BAD_REQUEST)]
#[case::not_found(SlotError::slot_not_found(Uuid::nil()), StatusCode::NOT_FOUND)]
#[case::overlap(SlotError::Overlap("09:00-09:30".into()), StatusCode::CONFLICT)]
#[case::already_booked(SlotError::AlreadyBooked(Uuid::nil()), StatusCode::CONFLICT)]
#[case::slot_booked(SlotError::SlotBooked(Uuid::nil()), StatusCode::CONFLICT)]
#[case::database(
    SlotError::Database(eyre::eyre!("Database error")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[case::internal(
    SlotError::Internal(Box::new(std::io::Error::other("Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_status_mapping(#[case] error: SlotError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let slot_id = Uuid::new_v4();

    let response = map_error(SlotError::AlreadyBooked(slot_id));
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body["error"],
        format!("Slot {} is already booked", slot_id)
    );
}
