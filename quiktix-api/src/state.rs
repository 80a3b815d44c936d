use std::sync::Arc;
use quiktix_booking::{BookingSubmitter, EventCapacityChecker, TicketScanner};
use quiktix_core::{
    BookingOperation, BookingRepository, EventRepository, IdentityResolver, TicketRenderer,
    TicketValidation,
};
use quiktix_store::{DbClient, PgBookingRepository, PgEventRepository};

use crate::tickets::DataUrlTicketRenderer;

/// The backend collaborators the API talks to
#[derive(Clone)]
pub struct Backend {
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub operation: Arc<dyn BookingOperation>,
    pub validation: Arc<dyn TicketValidation>,
}

impl Backend {
    pub fn postgres(db: &DbClient) -> Self {
        let bookings = Arc::new(PgBookingRepository::new(db.pool.clone()));
        Self {
            events: Arc::new(PgEventRepository::new(db.pool.clone())),
            bookings: bookings.clone(),
            operation: bookings.clone(),
            validation: bookings,
        }
    }

    /// One store serving every role, e.g. `MemoryStore`
    pub fn single<S>(store: Arc<S>) -> Self
    where
        S: EventRepository + BookingRepository + BookingOperation + TicketValidation + 'static,
    {
        Self {
            events: store.clone(),
            bookings: store.clone(),
            operation: store.clone(),
            validation: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub submitter: BookingSubmitter,
    pub scanner: TicketScanner,
    pub renderer: Arc<dyn TicketRenderer>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(backend: Backend, identity: Arc<dyn IdentityResolver>) -> Self {
        let checker = EventCapacityChecker::new(backend.events.clone(), backend.bookings.clone());

        Self {
            events: backend.events,
            bookings: backend.bookings,
            submitter: BookingSubmitter::new(checker, backend.operation),
            scanner: TicketScanner::new(backend.validation),
            renderer: Arc::new(DataUrlTicketRenderer),
            identity,
        }
    }
}
