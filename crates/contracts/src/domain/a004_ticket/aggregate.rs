use crate::shared::entity_id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TICKETS_FIELD: &str = "tickets";
pub const MESSAGES_FIELD: &str = "messages";

/// Обращение в поддержку
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: EntityId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_id: Option<EntityId>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Сообщение в чате тикета
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: EntityId,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}
