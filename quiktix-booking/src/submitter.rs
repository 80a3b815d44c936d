use std::sync::Arc;
use uuid::Uuid;
use tracing::{debug, error, info, warn};
use quiktix_core::{AuthenticatedUser, BookingOperation};
use quiktix_shared::BookingRequest;

use crate::attempt::{AttemptError, AttemptState, BookingAttempt};
use crate::capacity::{AvailabilityResult, EventCapacityChecker};
use crate::outcome::{BookingFailure, BookingOutcome};

/// Runs a booking attempt: capacity pre-check, then the remote booking call.
///
/// No retries and no deduplication. Two identical submissions create two bookings.
#[derive(Clone)]
pub struct BookingSubmitter {
    checker: EventCapacityChecker,
    operation: Arc<dyn BookingOperation>,
}

impl BookingSubmitter {
    pub fn new(checker: EventCapacityChecker, operation: Arc<dyn BookingOperation>) -> Self {
        Self { checker, operation }
    }

    pub fn checker(&self) -> &EventCapacityChecker {
        &self.checker
    }

    /// Run a fresh attempt to completion.
    pub async fn submit(
        &self,
        identity: Option<&AuthenticatedUser>,
        event_id: Uuid,
        seats: u32,
    ) -> BookingOutcome {
        let mut attempt = BookingAttempt::new();

        let result = self.run(&mut attempt, identity, event_id, seats).await;
        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Booking attempt {} aborted: {}", attempt.id(), err);
                BookingOutcome::Rejected(BookingFailure::Aborted(err))
            }
        }
    }

    /// Drive `attempt` from `Idle` to a terminal state.
    ///
    /// Fails only if `attempt` has already been used.
    pub async fn run(
        &self,
        attempt: &mut BookingAttempt,
        identity: Option<&AuthenticatedUser>,
        event_id: Uuid,
        seats: u32,
    ) -> Result<BookingOutcome, AttemptError> {
        if attempt.state() != AttemptState::Idle {
            return Err(AttemptError::InvalidTransition {
                from: attempt.state(),
                to: AttemptState::CheckingCapacity,
            });
        }

        let Some(user) = identity else {
            attempt.advance(AttemptState::Rejected)?;
            warn!("Booking attempt {} for event {} has no identity", attempt.id(), event_id);
            return Ok(BookingOutcome::Unauthenticated);
        };

        let request = match BookingRequest::new(event_id, user.id, seats) {
            Ok(request) => request,
            Err(err) => {
                return reject(attempt, BookingFailure::InvalidRequest(err.to_string()));
            }
        };

        // 1. Advisory capacity check
        attempt.advance(AttemptState::CheckingCapacity)?;
        match self.checker.check_availability(request.event_id, request.seats).await {
            AvailabilityResult::Available { remaining } => {
                debug!(
                    "Event {} can take {} seats ({} left after)",
                    request.event_id, request.seats, remaining
                );
            }
            AvailabilityResult::InsufficientCapacity { remaining, requested } => {
                return reject(
                    attempt,
                    BookingFailure::InsufficientCapacity { remaining, requested },
                );
            }
            AvailabilityResult::EventNotFound(id) => {
                return reject(attempt, BookingFailure::EventNotFound(id));
            }
            AvailabilityResult::QueryFailed(msg) => {
                return reject(attempt, BookingFailure::QueryFailed(msg));
            }
        }

        // 2. Authoritative booking call
        attempt.advance(AttemptState::SubmittingBooking)?;
        let created = match self
            .operation
            .create_booking(request.user_id, request.event_id, request.seats)
            .await
        {
            Ok(created) => created,
            Err(err) => {
                return reject(attempt, BookingFailure::RemoteRejected(err.to_string()));
            }
        };

        // 3. First returned row is the booking
        match created.into_iter().next() {
            Some(booking) => {
                attempt.advance(AttemptState::Confirmed)?;
                info!(
                    "Booking confirmed: {} ({} seats for event {})",
                    booking.id, booking.seats_booked, booking.event_id
                );
                Ok(BookingOutcome::Confirmed(booking))
            }
            None => reject(attempt, BookingFailure::UnexpectedEmptyResult),
        }
    }
}

fn reject(
    attempt: &mut BookingAttempt,
    failure: BookingFailure,
) -> Result<BookingOutcome, AttemptError> {
    attempt.advance(AttemptState::Rejected)?;
    warn!("Booking attempt {} rejected: {}", attempt.id(), failure);
    Ok(BookingOutcome::Rejected(failure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quiktix_shared::Event;
    use quiktix_store::memory::MemoryStore;

    fn setup(total_seats: u32) -> (Arc<MemoryStore>, BookingSubmitter, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let event = Event {
            id: Uuid::new_v4(),
            title: "Standup Special".to_string(),
            description: "One night only".to_string(),
            event_date: Utc::now(),
            price: 250.0,
            total_seats,
            location: Some("Main Hall".to_string()),
        };
        store.insert_event(event.clone());

        let checker = EventCapacityChecker::new(store.clone(), store.clone());
        let submitter = BookingSubmitter::new(checker, store.clone());
        (store, submitter, event.id)
    }

    #[tokio::test]
    async fn test_attempt_history_on_success() {
        let (_store, submitter, event_id) = setup(10);
        let user = AuthenticatedUser::new(Uuid::new_v4());
        let mut attempt = BookingAttempt::new();

        let outcome = submitter.run(&mut attempt, Some(&user), event_id, 2).await.unwrap();

        assert!(outcome.is_confirmed());
        assert_eq!(
            attempt.history(),
            &[
                AttemptState::Idle,
                AttemptState::CheckingCapacity,
                AttemptState::SubmittingBooking,
                AttemptState::Confirmed,
            ]
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_goes_straight_to_rejected() {
        let (_store, submitter, event_id) = setup(10);
        let mut attempt = BookingAttempt::new();

        let outcome = submitter.run(&mut attempt, None, event_id, 2).await.unwrap();

        assert_eq!(outcome, BookingOutcome::Unauthenticated);
        assert_eq!(attempt.history(), &[AttemptState::Idle, AttemptState::Rejected]);
    }

    #[tokio::test]
    async fn test_used_attempt_cannot_run_again() {
        let (store, submitter, event_id) = setup(10);
        let user = AuthenticatedUser::new(Uuid::new_v4());
        let mut attempt = BookingAttempt::new();

        submitter.run(&mut attempt, Some(&user), event_id, 1).await.unwrap();
        let err = submitter.run(&mut attempt, Some(&user), event_id, 1).await.unwrap_err();

        assert_eq!(
            err,
            AttemptError::InvalidTransition {
                from: AttemptState::Confirmed,
                to: AttemptState::CheckingCapacity,
            }
        );
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_seats_is_rejected_before_any_call() {
        let (store, submitter, event_id) = setup(10);
        let user = AuthenticatedUser::new(Uuid::new_v4());

        let outcome = submitter.submit(Some(&user), event_id, 0).await;

        assert_eq!(
            outcome,
            BookingOutcome::Rejected(BookingFailure::InvalidRequest(
                "Seat count must be at least 1".to_string()
            ))
        );
        assert_eq!(store.read_calls(), 0);
        assert_eq!(store.create_calls(), 0);
    }
}
