use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::{EventInfo, ModelError};

/// Booking status as stored by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Pending => "PENDING",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "PENDING" => Ok(BookingStatus::Pending),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// A number of seats, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SeatCount(u32);

impl SeatCount {
    pub fn new(seats: u32) -> Result<Self, ModelError> {
        if seats == 0 {
            return Err(ModelError::ZeroSeats);
        }
        Ok(Self(seats))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SeatCount {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeatCount> for u32 {
    fn from(count: SeatCount) -> Self {
        count.0
    }
}

impl fmt::Display for SeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One attempt's worth of input: who wants how many seats for which event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub seats: SeatCount,
}

impl BookingRequest {
    pub fn new(event_id: Uuid, user_id: Uuid, seats: u32) -> Result<Self, ModelError> {
        Ok(Self {
            event_id,
            user_id,
            seats: SeatCount::new(seats)?,
        })
    }
}

/// A booking as returned by the booking operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub seats_booked: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Payload encoded into the scannable ticket
    pub fn ticket_code(&self) -> String {
        self.id.to_string()
    }
}

/// The seat column of an event's booking rows; all the capacity check reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookedSeats {
    pub seats_booked: u32,
}

/// Dashboard row: a user's booking with the event title resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: Uuid,
    pub event_title: String,
    pub seats_booked: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Ticket page view of a single booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seats_booked: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event: Option<EventInfo>,
}

impl BookingDetail {
    pub fn summary(&self) -> BookingSummary {
        BookingSummary {
            id: self.id,
            event_title: self
                .event
                .as_ref()
                .map(|e| e.display_title().to_string())
                .unwrap_or_else(|| EventInfo::UNKNOWN_TITLE.to_string()),
            seats_booked: self.seats_booked,
            status: self.status,
            created_at: self.created_at,
        }
    }
}
