use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use tracing::info;
use quiktix_booking::{BookingFailure, BookingOutcome};
use quiktix_core::TicketImage;
use quiktix_shared::{Booking, BookingDetail, BookingSummary};

use crate::error::AppError;
use crate::middleware::Identity;
use crate::state::AppState;
use crate::tickets::render_ticket;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub seats: u32,
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub message: String,
    pub booking: Booking,
    pub ticket: Option<TicketImage>,
}

#[derive(Debug, Serialize)]
pub struct BookingDetailResponse {
    pub booking: BookingDetail,
    pub ticket: Option<TicketImage>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events/{id}/bookings", post(create_booking))
        .route("/v1/bookings", get(list_my_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let outcome = state.submitter.submit(identity.user(), event_id, req.seats).await;
    let message = outcome.message();

    match outcome {
        BookingOutcome::Confirmed(booking) => {
            let ticket = render_ticket(&state, &booking.ticket_code());
            Ok((
                StatusCode::CREATED,
                Json(BookingConfirmation { message, booking, ticket }),
            ))
        }
        BookingOutcome::Unauthenticated => Err(AppError::AuthenticationError(message)),
        BookingOutcome::Rejected(failure) => Err(rejection(&failure, message)),
    }
}

fn rejection(failure: &BookingFailure, message: String) -> AppError {
    match failure {
        BookingFailure::InvalidRequest(_) => AppError::ValidationError(message),
        BookingFailure::EventNotFound(_) => AppError::NotFoundError(message),
        BookingFailure::InsufficientCapacity { .. } => AppError::ConflictError(message),
        BookingFailure::RemoteRejected(_) => AppError::BookingRejected(message),
        BookingFailure::QueryFailed(_) | BookingFailure::UnexpectedEmptyResult => {
            AppError::UpstreamError(message)
        }
        BookingFailure::Aborted(err) => err.clone().into(),
    }
}

async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<BookingSummary>>, AppError> {
    let user = identity.require()?;

    let bookings = state
        .bookings
        .list_user_bookings(user.id)
        .await
        .map_err(AppError::upstream)?;

    Ok(Json(bookings))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    let user = identity.require()?;

    // Someone else's booking looks exactly like a missing one
    let booking = state
        .bookings
        .get_booking(id)
        .await
        .map_err(AppError::upstream)?
        .filter(|b| b.user_id == user.id)
        .ok_or_else(|| AppError::NotFoundError("Booking not found.".to_string()))?;

    info!("Serving ticket for booking {}", booking.id);
    let ticket = render_ticket(&state, &booking.id.to_string());

    Ok(Json(BookingDetailResponse { booking, ticket }))
}
