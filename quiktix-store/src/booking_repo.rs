use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use quiktix_core::{BookingOperation, BookingRepository, StoreResult, TicketValidation};
use quiktix_shared::{
    BookedSeats, Booking, BookingDetail, BookingStatus, BookingSummary, EventInfo, SeatCount,
};

use crate::database::store_error;

/// Bookings table plus the `createBooking` / `validateBooking` stored functions
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = r#"
    id,
    "userId" AS user_id,
    "eventId" AS event_id,
    "seatsBooked" AS seats_booked,
    status::text AS status,
    "createdAt" AS created_at
"#;

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    event_id: Uuid,
    seats_booked: i32,
    status: String,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> StoreResult<Booking> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            event_id: self.event_id,
            seats_booked: u32::try_from(self.seats_booked)?,
            status: self.status.parse::<BookingStatus>()?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SeatsRow {
    seats_booked: i32,
}

#[derive(sqlx::FromRow)]
struct BookingDetailRow {
    id: Uuid,
    user_id: Uuid,
    seats_booked: i32,
    status: String,
    created_at: DateTime<Utc>,
    event_title: Option<String>,
    event_date: Option<DateTime<Utc>>,
    event_location: Option<String>,
}

impl BookingDetailRow {
    fn into_detail(self) -> StoreResult<BookingDetail> {
        Ok(BookingDetail {
            id: self.id,
            user_id: self.user_id,
            seats_booked: u32::try_from(self.seats_booked)?,
            status: self.status.parse::<BookingStatus>()?,
            created_at: self.created_at,
            event: Some(EventInfo {
                title: self.event_title,
                event_date: self.event_date,
                location: self.event_location,
            }),
        })
    }
}

const DETAIL_QUERY: &str = r#"
    SELECT
        b.id,
        b."userId" AS user_id,
        b."seatsBooked" AS seats_booked,
        b.status::text AS status,
        b."createdAt" AS created_at,
        e.title AS event_title,
        e."eventDate" AS event_date,
        e.location AS event_location
    FROM bookings b
    INNER JOIN events e ON e.id = b."eventId"
"#;

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn list_event_bookings(&self, event_id: Uuid) -> StoreResult<Vec<BookedSeats>> {
        let rows = sqlx::query_as::<_, SeatsRow>(
            r#"
            SELECT "seatsBooked" AS seats_booked
            FROM bookings
            WHERE "eventId" = $1 AND status::text <> 'CANCELLED'
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter()
            .map(|row| -> StoreResult<BookedSeats> {
                Ok(BookedSeats {
                    seats_booked: u32::try_from(row.seats_booked)?,
                })
            })
            .collect()
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> StoreResult<Vec<BookingSummary>> {
        let sql = format!(r#"{} WHERE b."userId" = $1 ORDER BY b."createdAt" DESC"#, DETAIL_QUERY);

        let rows = sqlx::query_as::<_, BookingDetailRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.into_iter()
            .map(|row| row.into_detail().map(|detail| detail.summary()))
            .collect()
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<BookingDetail>> {
        let sql = format!("{} WHERE b.id = $1", DETAIL_QUERY);

        let row = sqlx::query_as::<_, BookingDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.map(BookingDetailRow::into_detail).transpose()
    }
}

#[async_trait]
impl BookingOperation for PgBookingRepository {
    async fn create_booking(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        seats: SeatCount,
    ) -> StoreResult<Vec<Booking>> {
        let sql = format!(
            r#"SELECT {} FROM "createBooking"(puserid => $1, peventid => $2, pseats => $3)"#,
            BOOKING_COLUMNS
        );

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(user_id)
            .bind(event_id)
            .bind(i32::try_from(seats.get())?)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        debug!("createBooking returned {} rows for event {}", rows.len(), event_id);
        rows.into_iter().map(BookingRow::into_booking).collect()
    }
}

#[async_trait]
impl TicketValidation for PgBookingRepository {
    async fn validate_booking(&self, booking_id: Uuid) -> StoreResult<Vec<Booking>> {
        let sql = format!(
            r#"SELECT {} FROM "validateBooking"(pbookingid => $1)"#,
            BOOKING_COLUMNS
        );

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        info!("validateBooking({}) matched {} rows", booking_id, rows.len());
        rows.into_iter().map(BookingRow::into_booking).collect()
    }
}
