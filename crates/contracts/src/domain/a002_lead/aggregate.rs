use crate::shared::entity_id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const LEADS_FIELD: &str = "leads";

/// Лид (потенциальный клиент)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<EntityId>,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Параметры списка лидов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadsQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub stage: Option<String>,
}

impl Default for LeadsQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 100,
            search: String::new(),
            stage: None,
        }
    }
}
