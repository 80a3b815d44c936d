pub mod repository;
pub mod identity;
pub mod ticket;

pub use identity::{AuthenticatedUser, IdentityResolver};
pub use repository::{
    BookingOperation, BookingRepository, EventRepository, StoreError, StoreResult,
    TicketValidation,
};
pub use ticket::{RendererError, TicketImage, TicketRenderer};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Identity verification failed: {0}")]
    IdentityError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
