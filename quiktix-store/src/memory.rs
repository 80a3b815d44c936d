use async_trait::async_trait;
use uuid::Uuid;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use quiktix_core::{
    BookingOperation, BookingRepository, EventRepository, StoreResult, TicketValidation,
};
use quiktix_shared::{
    BookedSeats, Booking, BookingDetail, BookingStatus, BookingSummary, Event, EventInfo, SeatCount,
};

#[derive(Default)]
struct State {
    events: HashMap<Uuid, Event>,
    bookings: Vec<Booking>,
    checked_in: HashSet<Uuid>,
    query_error: Option<String>,
    booking_error: Option<String>,
    validation_error: Option<String>,
    empty_create_result: bool,
    competing_seats: Option<u32>,
}

/// In-process stand-in for the hosted backend.
///
/// `create_booking` checks capacity and inserts under one lock, the way the
/// `createBooking` stored function does. Calls are counted so tests can assert
/// which collaborators were reached.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    read_calls: AtomicUsize,
    create_calls: AtomicUsize,
    validate_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_event(&self, event: Event) {
        self.lock().events.insert(event.id, event);
    }

    pub fn insert_booking(&self, booking: Booking) {
        self.lock().bookings.push(booking);
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Every read fails with `message` until cleared
    pub fn fail_queries_with(&self, message: impl Into<String>) {
        self.lock().query_error = Some(message.into());
    }

    pub fn fail_bookings_with(&self, message: impl Into<String>) {
        self.lock().booking_error = Some(message.into());
    }

    pub fn fail_validation_with(&self, message: impl Into<String>) {
        self.lock().validation_error = Some(message.into());
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.query_error = None;
        state.booking_error = None;
        state.validation_error = None;
        state.empty_create_result = false;
    }

    /// `create_booking` reports success without returning a row
    pub fn return_empty_bookings(&self, enabled: bool) {
        self.lock().empty_create_result = enabled;
    }

    /// Another customer grabs `seats` just before the next `create_booking` runs
    pub fn book_before_next_create(&self, seats: u32) {
        self.lock().competing_seats = Some(seats);
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    fn begin_read(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if let Some(message) = state.query_error.clone() {
            return Err(message.into());
        }
        Ok(state)
    }
}

fn seats_taken(state: &State, event_id: Uuid) -> u64 {
    state
        .bookings
        .iter()
        .filter(|b| b.event_id == event_id && b.status != BookingStatus::Cancelled)
        .map(|b| u64::from(b.seats_booked))
        .sum()
}

fn detail_for(state: &State, booking: &Booking) -> BookingDetail {
    BookingDetail {
        id: booking.id,
        user_id: booking.user_id,
        seats_booked: booking.seats_booked,
        status: booking.status,
        created_at: booking.created_at,
        event: state.events.get(&booking.event_id).map(EventInfo::from),
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let state = self.begin_read()?;
        Ok(state.events.get(&id).cloned())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let state = self.begin_read()?;
        let mut events: Vec<Event> = state.events.values().cloned().collect();
        events.sort_by_key(|e| e.event_date);
        Ok(events)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn list_event_bookings(&self, event_id: Uuid) -> StoreResult<Vec<BookedSeats>> {
        let state = self.begin_read()?;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.event_id == event_id && b.status != BookingStatus::Cancelled)
            .map(|b| BookedSeats { seats_booked: b.seats_booked })
            .collect())
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> StoreResult<Vec<BookingSummary>> {
        let state = self.begin_read()?;
        let mut summaries: Vec<BookingSummary> = state
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| detail_for(&state, b).summary())
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<BookingDetail>> {
        let state = self.begin_read()?;
        Ok(state
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| detail_for(&state, b)))
    }
}

#[async_trait]
impl BookingOperation for MemoryStore {
    async fn create_booking(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        seats: SeatCount,
    ) -> StoreResult<Vec<Booking>> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();

        if let Some(message) = &state.booking_error {
            return Err(message.clone().into());
        }

        let total_seats = state
            .events
            .get(&event_id)
            .map(|e| e.total_seats)
            .ok_or("Event not found")?;

        if let Some(competing) = state.competing_seats.take() {
            state.bookings.push(Booking {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                event_id,
                seats_booked: competing,
                status: BookingStatus::Confirmed,
                created_at: Utc::now(),
            });
        }

        if seats_taken(&state, event_id) + u64::from(seats.get()) > u64::from(total_seats) {
            return Err("Not enough seats available".into());
        }

        if state.empty_create_result {
            return Ok(Vec::new());
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id,
            event_id,
            seats_booked: seats.get(),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };
        state.bookings.push(booking.clone());

        Ok(vec![booking])
    }
}

#[async_trait]
impl TicketValidation for MemoryStore {
    async fn validate_booking(&self, booking_id: Uuid) -> StoreResult<Vec<Booking>> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();

        if let Some(message) = &state.validation_error {
            return Err(message.clone().into());
        }

        let Some(booking) = state
            .bookings
            .iter()
            .find(|b| b.id == booking_id && b.status == BookingStatus::Confirmed)
            .cloned()
        else {
            return Ok(Vec::new());
        };

        if !state.checked_in.insert(booking_id) {
            return Ok(Vec::new());
        }

        Ok(vec![booking])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(total_seats: u32) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Indie Film Fest".to_string(),
            description: "Shorts and features".to_string(),
            event_date: Utc::now(),
            price: 150.0,
            total_seats,
            location: Some("Cinema 2".to_string()),
        }
    }

    fn seats(n: u32) -> SeatCount {
        SeatCount::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_create_booking_enforces_capacity() {
        let store = MemoryStore::new();
        let event = event(3);
        store.insert_event(event.clone());
        let user = Uuid::new_v4();

        let first = store.create_booking(user, event.id, seats(2)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].status, BookingStatus::Confirmed);

        let err = store.create_booking(user, event.id, seats(2)).await.unwrap_err();
        assert_eq!(err.to_string(), "Not enough seats available");
        assert_eq!(store.create_calls(), 2);
        assert_eq!(store.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_bookings_are_not_listed_for_capacity() {
        let store = MemoryStore::new();
        let event = event(10);
        store.insert_event(event.clone());
        store.insert_booking(Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: event.id,
            seats_booked: 4,
            status: BookingStatus::Cancelled,
            created_at: Utc::now(),
        });

        let rows = store.list_event_bookings(event.id).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(store.read_calls(), 1);
    }

    #[tokio::test]
    async fn test_user_bookings_carry_event_title() {
        let store = MemoryStore::new();
        let event = event(10);
        store.insert_event(event.clone());
        let user = Uuid::new_v4();
        let created = store.create_booking(user, event.id, seats(1)).await.unwrap();

        let mine = store.list_user_bookings(user).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, created[0].id);
        assert_eq!(mine[0].event_title, "Indie Film Fest");

        assert!(store.list_user_bookings(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_can_be_cleared() {
        let store = MemoryStore::new();
        store.fail_queries_with("boom");
        assert!(store.list_events().await.is_err());

        store.clear_failures();
        assert!(store.list_events().await.unwrap().is_empty());
    }
}
