use std::sync::Arc;
use uuid::Uuid;
use tracing::{info, warn};
use quiktix_core::TicketValidation;
use quiktix_shared::Booking;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Valid(Booking),
    /// Unknown code, or a ticket that was already used
    Invalid,
    Failed(String),
}

impl ScanOutcome {
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::Valid(_) => "Ticket valid! Entry allowed".to_string(),
            ScanOutcome::Invalid => "Invalid or already used ticket".to_string(),
            ScanOutcome::Failed(msg) => format!("Error: {}", msg),
        }
    }
}

/// Door check for scanned ticket codes
#[derive(Clone)]
pub struct TicketScanner {
    validation: Arc<dyn TicketValidation>,
}

impl TicketScanner {
    pub fn new(validation: Arc<dyn TicketValidation>) -> Self {
        Self { validation }
    }

    pub async fn scan(&self, code: &str) -> ScanOutcome {
        // Codes that are not booking ids never reach the backend
        let Ok(booking_id) = Uuid::parse_str(code.trim()) else {
            warn!("Rejected malformed ticket code: {:?}", code);
            return ScanOutcome::Invalid;
        };

        match self.validation.validate_booking(booking_id).await {
            Ok(bookings) => match bookings.into_iter().next() {
                Some(booking) => {
                    info!("Ticket {} admitted ({} seats)", booking.id, booking.seats_booked);
                    ScanOutcome::Valid(booking)
                }
                None => ScanOutcome::Invalid,
            },
            Err(err) => ScanOutcome::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quiktix_shared::BookingStatus;
    use quiktix_store::memory::MemoryStore;

    fn confirmed_booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            seats_booked: 2,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ticket_admits_once() {
        let store = Arc::new(MemoryStore::new());
        let booking = confirmed_booking();
        store.insert_booking(booking.clone());
        let scanner = TicketScanner::new(store.clone());

        let code = format!("  {}\n", booking.id);
        assert_eq!(scanner.scan(&code).await, ScanOutcome::Valid(booking.clone()));
        assert_eq!(scanner.scan(&code).await, ScanOutcome::Invalid);
    }

    #[tokio::test]
    async fn test_malformed_code_skips_backend() {
        let store = Arc::new(MemoryStore::new());
        let scanner = TicketScanner::new(store.clone());

        assert_eq!(scanner.scan("not-a-ticket").await, ScanOutcome::Invalid);
        assert_eq!(store.validate_calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_error_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store.fail_validation_with("connection reset");
        let scanner = TicketScanner::new(store.clone());

        let outcome = scanner.scan(&Uuid::new_v4().to_string()).await;
        assert_eq!(outcome, ScanOutcome::Failed("connection reset".to_string()));
        assert_eq!(outcome.message(), "Error: connection reset");
    }
}
