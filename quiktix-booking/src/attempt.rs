use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};

/// Where a single booking attempt currently stands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptState {
    Idle,
    CheckingCapacity,
    SubmittingBooking,
    Rejected,
    Confirmed,
}

impl AttemptState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AttemptState::Rejected | AttemptState::Confirmed)
    }

    /// `Idle -> Rejected` covers precondition failures (no identity, bad seat count).
    pub fn can_transition_to(self, next: AttemptState) -> bool {
        use AttemptState::*;

        matches!(
            (self, next),
            (Idle, CheckingCapacity)
                | (Idle, Rejected)
                | (CheckingCapacity, SubmittingBooking)
                | (CheckingCapacity, Rejected)
                | (SubmittingBooking, Confirmed)
                | (SubmittingBooking, Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptError {
    #[error("Invalid attempt transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: AttemptState,
        to: AttemptState,
    },
}

/// One user-initiated pass through the booking flow.
///
/// Attempts are single use. Once terminal, retrying means starting a new one.
#[derive(Debug, Clone)]
pub struct BookingAttempt {
    id: Uuid,
    state: AttemptState,
    history: Vec<AttemptState>,
    started_at: DateTime<Utc>,
}

impl BookingAttempt {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: AttemptState::Idle,
            history: vec![AttemptState::Idle],
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`
    pub fn history(&self) -> &[AttemptState] {
        &self.history
    }

    pub fn advance(&mut self, next: AttemptState) -> Result<(), AttemptError> {
        if !self.state.can_transition_to(next) {
            return Err(AttemptError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Booking attempt {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        self.history.push(next);

        if next.is_terminal() {
            tracing::info!(
                "Booking attempt {} finished as {:?} after {}ms",
                self.id,
                next,
                self.elapsed().num_milliseconds()
            );
        }
        Ok(())
    }

    /// Time since the attempt was created
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }
}

impl Default for BookingAttempt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_lifecycle() {
        let mut attempt = BookingAttempt::new();
        assert_eq!(attempt.state(), AttemptState::Idle);

        attempt.advance(AttemptState::CheckingCapacity).unwrap();
        attempt.advance(AttemptState::SubmittingBooking).unwrap();
        attempt.advance(AttemptState::Confirmed).unwrap();

        assert!(attempt.state().is_terminal());
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

    #[test]
    fn test_terminal_states_are_final() {
        let mut attempt = BookingAttempt::new();
        attempt.advance(AttemptState::CheckingCapacity).unwrap();
        attempt.advance(AttemptState::Rejected).unwrap();

        let err = attempt.advance(AttemptState::CheckingCapacity).unwrap_err();
        assert_eq!(
            err,
            AttemptError::InvalidTransition {
                from: AttemptState::Rejected,
                to: AttemptState::CheckingCapacity,
            }
        );
        assert_eq!(attempt.state(), AttemptState::Rejected);
    }

    #[test]
    fn test_cannot_skip_capacity_check() {
        let mut attempt = BookingAttempt::new();
        assert!(attempt.advance(AttemptState::SubmittingBooking).is_err());
        assert!(attempt.advance(AttemptState::Confirmed).is_err());
        assert_eq!(attempt.history(), &[AttemptState::Idle]);
    }

    #[test]
    fn test_elapsed_is_measured_from_creation() {
        let mut attempt = BookingAttempt::new();
        attempt.advance(AttemptState::Rejected).unwrap();

        assert!(attempt.elapsed() >= Duration::zero());
        assert!(attempt.elapsed() < Duration::seconds(5));
    }

    #[test]
    fn test_attempts_have_distinct_ids() {
        assert_ne!(BookingAttempt::new().id(), BookingAttempt::new().id());
    }
}
