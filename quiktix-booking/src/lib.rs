pub mod capacity;
pub mod attempt;
pub mod outcome;
pub mod submitter;
pub mod scanner;

pub use capacity::{AvailabilityResult, CapacityError, EventCapacityChecker};
pub use attempt::{AttemptError, AttemptState, BookingAttempt};
pub use outcome::{BookingFailure, BookingOutcome};
pub use submitter::BookingSubmitter;
pub use scanner::{ScanOutcome, TicketScanner};
