use async_trait::async_trait;
use uuid::Uuid;
use quiktix_shared::{BookedSeats, Booking, BookingDetail, BookingSummary, Event, SeatCount};

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to events
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// `Ok(None)` when the event does not exist.
    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>>;

    /// All events, soonest first
    async fn list_events(&self) -> StoreResult<Vec<Event>>;
}

/// Read access to bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Seat counts of every booking that counts toward the event's demand.
    /// Cancelled bookings are left out by the query.
    async fn list_event_bookings(&self, event_id: Uuid) -> StoreResult<Vec<BookedSeats>>;

    async fn list_user_bookings(&self, user_id: Uuid) -> StoreResult<Vec<BookingSummary>>;

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<BookingDetail>>;
}

/// The authoritative booking operation.
///
/// Implementations are expected to check capacity and insert atomically on the
/// server side. Nothing on this side of the trait can make that guarantee.
#[async_trait]
pub trait BookingOperation: Send + Sync {
    async fn create_booking(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        seats: SeatCount,
    ) -> StoreResult<Vec<Booking>>;
}

/// Ticket check-in at the door
#[async_trait]
pub trait TicketValidation: Send + Sync {
    /// Returns the matching booking when the ticket is valid and not yet used,
    /// an empty collection otherwise.
    async fn validate_booking(&self, booking_id: Uuid) -> StoreResult<Vec<Booking>>;
}
