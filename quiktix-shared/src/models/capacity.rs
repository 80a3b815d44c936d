use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Demand for an event as observed at `taken_at`.
///
/// The snapshot can be stale as soon as it is read: nothing stops another
/// booking from landing between this read and a booking call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySnapshot {
    pub event_id: Uuid,
    pub total_seats: u32,
    pub seats_booked: u64,
    pub taken_at: DateTime<Utc>,
}

impl CapacitySnapshot {
    pub fn new(event_id: Uuid, total_seats: u32, seats_booked: u64) -> Self {
        Self {
            event_id,
            total_seats,
            seats_booked,
            taken_at: Utc::now(),
        }
    }

    /// Seats still free, floored at zero when the event is already oversold.
    pub fn remaining(&self) -> u32 {
        u64::from(self.total_seats).saturating_sub(self.seats_booked) as u32
    }

    pub fn can_fit(&self, requested: u32) -> bool {
        self.seats_booked + u64::from(requested) <= u64::from(self.total_seats)
    }
}
