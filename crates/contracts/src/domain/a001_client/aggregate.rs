use crate::shared::entity_id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Поле ответа `/api/clients`, в котором лежит коллекция
pub const CLIENTS_FIELD: &str = "clients";

/// Клиент CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Метки, назначенные массовой операцией
    #[serde(default)]
    pub labels: Vec<String>,
    /// Значения пользовательских полей: customId -> значение
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Параметры списка клиентов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub sort_by: String,
    pub sort_desc: bool,
}

impl Default for ClientsQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 100,
            search: String::new(),
            sort_by: "created_at".to_string(),
            sort_desc: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::extract_collection;

    #[test]
    fn test_client_defaults_for_sparse_payload() {
        let raw = serde_json::json!({ "clients": [{ "id": 5, "name": "ООО Ромашка" }] });
        let clients: Vec<Client> = extract_collection(&raw, CLIENTS_FIELD);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].id, EntityId::Int(5));
        assert!(clients[0].labels.is_empty());
        assert!(clients[0].created_at.is_none());
    }
}
