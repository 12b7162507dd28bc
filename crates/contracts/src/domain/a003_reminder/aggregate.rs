use crate::shared::entity_id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REMINDERS_FIELD: &str = "reminders";
pub const NOTIFICATIONS_FIELD: &str = "notifications";

/// Напоминание пользователю (звонок, встреча)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client_id: Option<EntityId>,
    #[serde(default)]
    pub remind_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: bool,
}

/// Системное уведомление (колокольчик в шапке)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
