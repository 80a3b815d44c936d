pub mod event;
pub mod booking;
pub mod capacity;

pub use event::{Event, EventInfo};
pub use booking::{
    BookedSeats, Booking, BookingDetail, BookingRequest, BookingStatus, BookingSummary, SeatCount,
};
pub use capacity::CapacitySnapshot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Seat count must be at least 1")]
    ZeroSeats,
    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
}
