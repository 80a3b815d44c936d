use uuid::Uuid;
use quiktix_shared::Booking;
use crate::attempt::AttemptError;

/// Why an attempt ended without a booking.
///
/// `Display` gives the bare reason; remote and query messages pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingFailure {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("insufficient capacity")]
    InsufficientCapacity { remaining: u32, requested: u32 },
    /// Capacity read failed because there is no such event
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),
    #[error("{0}")]
    QueryFailed(String),
    #[error("{0}")]
    RemoteRejected(String),
    #[error("booking operation returned no booking")]
    UnexpectedEmptyResult,
    #[error("attempt aborted: {0}")]
    Aborted(AttemptError),
}

impl BookingFailure {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Terminal result of a booking attempt
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Confirmed(Booking),
    Unauthenticated,
    Rejected(BookingFailure),
}

impl BookingOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed(_))
    }

    pub fn booking(&self) -> Option<&Booking> {
        match self {
            BookingOutcome::Confirmed(booking) => Some(booking),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&BookingFailure> {
        match self {
            BookingOutcome::Rejected(failure) => Some(failure),
            _ => None,
        }
    }

    /// Short text to show the user
    pub fn message(&self) -> String {
        match self {
            BookingOutcome::Confirmed(_) => "Booking successful!".to_string(),
            BookingOutcome::Unauthenticated => "You must be logged in to book.".to_string(),
            BookingOutcome::Rejected(failure) => match failure {
                BookingFailure::InsufficientCapacity { remaining: 0, .. } => {
                    "Not enough seats available. This event is sold out.".to_string()
                }
                BookingFailure::InsufficientCapacity { remaining, .. } => {
                    format!("Not enough seats available. Only {} left.", remaining)
                }
                BookingFailure::RemoteRejected(msg) => format!("Booking failed: {}", msg),
                BookingFailure::UnexpectedEmptyResult => {
                    "Booking failed: no booking was returned.".to_string()
                }
                BookingFailure::Aborted(_) => "Booking failed. Please try again.".to_string(),
                BookingFailure::EventNotFound(_) => failure.reason(),
                BookingFailure::InvalidRequest(msg) | BookingFailure::QueryFailed(msg) => msg.clone(),
            },
        }
    }
}
