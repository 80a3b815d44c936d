use axum::{
    extract::{Extension, State},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use quiktix_booking::ScanOutcome;
use quiktix_core::{RendererError, TicketImage, TicketRenderer};
use quiktix_shared::Booking;

use crate::error::AppError;
use crate::middleware::Identity;
use crate::state::AppState;

/// Packs the ticket code into a `data:` URL; the client draws the QR image from it.
pub struct DataUrlTicketRenderer;

impl TicketRenderer for DataUrlTicketRenderer {
    fn render(&self, code: &str) -> Result<TicketImage, RendererError> {
        if code.trim().is_empty() {
            return Err(RendererError::EmptyCode);
        }

        Ok(TicketImage {
            content_type: "text/plain".to_string(),
            data_url: format!("data:text/plain;base64,{}", STANDARD.encode(code.as_bytes())),
        })
    }
}

/// Render a confirmed booking's ticket, or `None` if the renderer fails.
/// The booking already exists at this point, so a rendering problem is not fatal.
pub(crate) fn render_ticket(state: &AppState, booking_code: &str) -> Option<TicketImage> {
    match state.renderer.render(booking_code) {
        Ok(ticket) => Some(ticket),
        Err(e) => {
            tracing::error!("Failed to render ticket {}: {}", booking_code, e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    code: String,
}

#[derive(Debug, Serialize)]
struct ScanResponse {
    status: &'static str,
    message: String,
    booking: Option<Booking>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/tickets/validate", post(validate_ticket))
}

async fn validate_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, AppError> {
    identity.require()?;

    let outcome = state.scanner.scan(&req.code).await;
    let message = outcome.message();

    match outcome {
        ScanOutcome::Valid(booking) => Ok(Json(ScanResponse {
            status: "VALID",
            message,
            booking: Some(booking),
        })),
        ScanOutcome::Invalid => Ok(Json(ScanResponse {
            status: "INVALID",
            message,
            booking: None,
        })),
        ScanOutcome::Failed(_) => Err(AppError::UpstreamError(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_code_as_data_url() {
        let ticket = DataUrlTicketRenderer
            .render("6a2f41a3-c54c-4ce8-92d2-0324e1c32e22")
            .unwrap();

        assert_eq!(ticket.content_type, "text/plain");
        assert_eq!(
            ticket.data_url,
            "data:text/plain;base64,NmEyZjQxYTMtYzU0Yy00Y2U4LTkyZDItMDMyNGUxYzMyZTIy"
        );
    }

    #[test]
    fn test_empty_code_is_refused() {
        assert!(matches!(DataUrlTicketRenderer.render("  "), Err(RendererError::EmptyCode)));
    }
}
