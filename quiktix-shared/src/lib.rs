pub mod models;

pub use models::{
    BookedSeats, Booking, BookingDetail, BookingRequest, BookingStatus, BookingSummary,
    CapacitySnapshot, Event, EventInfo, ModelError, SeatCount,
};
