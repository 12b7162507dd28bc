use crate::shared::entity_id::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TODOS_FIELD: &str = "todos";

/// Задача из списка дел на дашборде
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: EntityId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}
