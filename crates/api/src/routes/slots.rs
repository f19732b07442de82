use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots/preview", post(handlers::slots::preview_slots))
        .route(
            "/api/doctors/:doctor_id/slots",
            post(handlers::slots::create_slots).get(handlers::slots::list_slots),
        )
        .route(
            "/api/slots/:slot_id",
            get(handlers::slots::get_slot).delete(handlers::slots::delete_slot),
        )
        .route("/api/slots/:slot_id/book", post(handlers::slots::book_slot))
        .route(
            "/api/slots/:slot_id/release",
            post(handlers::slots::release_slot),
        )
}
