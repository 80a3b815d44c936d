use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;
use chrono::{DateTime, Utc};
use quiktix_core::{EventRepository, StoreResult};
use quiktix_shared::Event;

use crate::database::store_error;

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_COLUMNS: &str = r#"
    id,
    title,
    description,
    "eventDate" AS event_date,
    price::float8 AS price,
    "totalSeats" AS total_seats,
    location
"#;

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    event_date: DateTime<Utc>,
    price: f64,
    total_seats: i32,
    location: Option<String>,
}

impl EventRow {
    fn into_event(self) -> StoreResult<Event> {
        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            event_date: self.event_date,
            price: self.price,
            total_seats: u32::try_from(self.total_seats)?,
            location: self.location,
        })
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);

        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.map(EventRow::into_event).transpose()
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let sql = format!(r#"SELECT {} FROM events ORDER BY "eventDate" ASC"#, EVENT_COLUMNS);

        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.into_iter().map(EventRow::into_event).collect()
    }
}
