use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// A ticketed event. Owned by the backing store; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub price: f64,
    pub total_seats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Event columns joined onto a booking for ticket and dashboard views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub title: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl EventInfo {
    pub const UNKNOWN_TITLE: &'static str = "Unknown Event";

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(Self::UNKNOWN_TITLE)
    }
}

impl From<&Event> for EventInfo {
    fn from(event: &Event) -> Self {
        Self {
            title: Some(event.title.clone()),
            event_date: Some(event.event_date),
            location: event.location.clone(),
        }
    }
}
