use serde::{Deserialize, Serialize};

/// Rendered ticket payload handed to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketImage {
    pub content_type: String,
    pub data_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Ticket code is empty")]
    EmptyCode,
    #[error("Rendering failed: {0}")]
    Failed(String),
}

/// Turns a ticket code into something scannable. Only called for confirmed bookings.
pub trait TicketRenderer: Send + Sync {
    fn render(&self, code: &str) -> Result<TicketImage, RendererError>;
}
