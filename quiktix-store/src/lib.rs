pub mod app_config;
pub mod database;
pub mod event_repo;
pub mod booking_repo;
pub mod memory;

pub use database::DbClient;
pub use event_repo::PgEventRepository;
pub use booking_repo::PgBookingRepository;
pub use memory::MemoryStore;
