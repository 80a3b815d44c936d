use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use quiktix_booking::CapacityError;
use quiktix_shared::Event;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub seats_booked: u64,
    pub seats_available: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events", get(list_events))
        .route("/v1/events/{id}", get(get_event))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.events.list_events().await.map_err(AppError::upstream)?;
    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetailResponse>, AppError> {
    let event = state
        .events
        .get_event(id)
        .await
        .map_err(AppError::upstream)?
        .ok_or_else(|| AppError::NotFoundError("Event not found.".to_string()))?;

    let snapshot = state
        .submitter
        .checker()
        .snapshot_for(&event)
        .await
        .map_err(|e| match e {
            CapacityError::EventNotFound(_) => AppError::NotFoundError("Event not found.".to_string()),
            CapacityError::Query(msg) => AppError::UpstreamError(msg),
        })?;

    Ok(Json(EventDetailResponse {
        event,
        seats_booked: snapshot.seats_booked,
        seats_available: snapshot.remaining(),
    }))
}
