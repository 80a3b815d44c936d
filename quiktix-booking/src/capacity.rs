use std::sync::Arc;
use uuid::Uuid;
use tracing::debug;
use quiktix_core::{BookingRepository, EventRepository};
use quiktix_shared::{CapacitySnapshot, Event, SeatCount};

/// Result of comparing a seat request against current demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityResult {
    /// `remaining` is what would be left after the requested seats are taken.
    Available { remaining: u32 },
    /// `remaining` is what is left right now.
    InsufficientCapacity { remaining: u32, requested: u32 },
    /// The capacity read could not complete because the event does not exist.
    EventNotFound(Uuid),
    QueryFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),
    #[error("{0}")]
    Query(String),
}

/// Client-side estimate of remaining seats.
///
/// Advisory only: the read is not atomic with the booking call that follows it,
/// so two clients can both see room for the last seat.
#[derive(Clone)]
pub struct EventCapacityChecker {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl EventCapacityChecker {
    pub fn new(events: Arc<dyn EventRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { events, bookings }
    }

    /// Read the event's capacity and the seats booked against it.
    pub async fn snapshot(&self, event_id: Uuid) -> Result<CapacitySnapshot, CapacityError> {
        let event = self
            .events
            .get_event(event_id)
            .await
            .map_err(|e| CapacityError::Query(e.to_string()))?
            .ok_or(CapacityError::EventNotFound(event_id))?;

        self.snapshot_for(&event).await
    }

    /// Like `snapshot`, for an event the caller has already loaded.
    ///
    /// Every row the booking query returns is counted, `PENDING` included.
    pub async fn snapshot_for(&self, event: &Event) -> Result<CapacitySnapshot, CapacityError> {
        let rows = self
            .bookings
            .list_event_bookings(event.id)
            .await
            .map_err(|e| CapacityError::Query(e.to_string()))?;

        let seats_booked: u64 = rows.iter().map(|row| u64::from(row.seats_booked)).sum();

        Ok(CapacitySnapshot::new(event.id, event.total_seats, seats_booked))
    }

    pub async fn check_availability(
        &self,
        event_id: Uuid,
        requested_seats: SeatCount,
    ) -> AvailabilityResult {
        match self.snapshot(event_id).await {
            Ok(snapshot) => {
                let result = Self::evaluate(&snapshot, requested_seats);
                debug!(
                    "Capacity check for event {}: booked {}/{}, requested {} -> {:?}",
                    event_id, snapshot.seats_booked, snapshot.total_seats, requested_seats, result
                );
                result
            }
            Err(CapacityError::EventNotFound(id)) => AvailabilityResult::EventNotFound(id),
            Err(CapacityError::Query(msg)) => AvailabilityResult::QueryFailed(msg),
        }
    }

    /// Compare a request against an already-taken snapshot
    pub fn evaluate(snapshot: &CapacitySnapshot, requested_seats: SeatCount) -> AvailabilityResult {
        let requested = requested_seats.get();

        if snapshot.can_fit(requested) {
            AvailabilityResult::Available {
                remaining: snapshot.remaining() - requested,
            }
        } else {
            AvailabilityResult::InsufficientCapacity {
                remaining: snapshot.remaining(),
                requested,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quiktix_shared::{Booking, BookingStatus};
    use quiktix_store::memory::MemoryStore;

    fn seats(n: u32) -> SeatCount {
        SeatCount::new(n).unwrap()
    }

    fn event(total_seats: u32) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Jazz Night".to_string(),
            description: "Live quartet".to_string(),
            event_date: Utc::now(),
            price: 499.0,
            total_seats,
            location: None,
        }
    }

    fn booking(event_id: Uuid, seats_booked: u32, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id,
            seats_booked,
            status,
            created_at: Utc::now(),
        }
    }

    fn checker(store: &Arc<MemoryStore>) -> EventCapacityChecker {
        EventCapacityChecker::new(store.clone(), store.clone())
    }

    #[test]
    fn test_evaluate_boundaries() {
        let event_id = Uuid::new_v4();

        for booked in 0..=10u64 {
            let snapshot = CapacitySnapshot::new(event_id, 10, booked);
            let free = 10 - booked as u32;

            for requested in 1..=12u32 {
                let result = EventCapacityChecker::evaluate(&snapshot, seats(requested));
                if requested <= free {
                    assert_eq!(result, AvailabilityResult::Available { remaining: free - requested });
                } else {
                    assert_eq!(
                        result,
                        AvailabilityResult::InsufficientCapacity { remaining: free, requested }
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_zero_bookings_is_zero_demand() {
        let store = Arc::new(MemoryStore::new());
        let event = event(10);
        store.insert_event(event.clone());

        let result = checker(&store).check_availability(event.id, seats(3)).await;
        assert_eq!(result, AvailabilityResult::Available { remaining: 7 });
    }

    #[tokio::test]
    async fn test_request_larger_than_event() {
        let store = Arc::new(MemoryStore::new());
        let event = event(4);
        store.insert_event(event.clone());

        let result = checker(&store).check_availability(event.id, seats(5)).await;
        assert_eq!(
            result,
            AvailabilityResult::InsufficientCapacity { remaining: 4, requested: 5 }
        );
    }

    #[tokio::test]
    async fn test_pending_bookings_count_toward_demand() {
        let store = Arc::new(MemoryStore::new());
        let event = event(10);
        store.insert_event(event.clone());
        store.insert_booking(booking(event.id, 6, BookingStatus::Confirmed));
        store.insert_booking(booking(event.id, 3, BookingStatus::Pending));

        let snapshot = checker(&store).snapshot(event.id).await.unwrap();
        assert_eq!(snapshot.seats_booked, 9);
        assert_eq!(snapshot.remaining(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_for_loaded_event_reads_bookings_only() {
        let store = Arc::new(MemoryStore::new());
        let event = event(8);
        store.insert_event(event.clone());
        store.insert_booking(booking(event.id, 5, BookingStatus::Confirmed));

        let snapshot = checker(&store).snapshot_for(&event).await.unwrap();
        assert_eq!(snapshot.remaining(), 3);
        assert_eq!(store.read_calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_event_is_reported_apart_from_query_errors() {
        let store = Arc::new(MemoryStore::new());
        let missing = Uuid::new_v4();

        let result = checker(&store).check_availability(missing, seats(1)).await;
        assert_eq!(result, AvailabilityResult::EventNotFound(missing));
    }

    #[tokio::test]
    async fn test_query_error_is_surfaced_verbatim() {
        let store = Arc::new(MemoryStore::new());
        let event = event(10);
        store.insert_event(event.clone());
        store.fail_queries_with("permission denied for table bookings");

        let result = checker(&store).check_availability(event.id, seats(1)).await;
        assert_eq!(
            result,
            AvailabilityResult::QueryFailed("permission denied for table bookings".to_string())
        );
    }
}
