use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity_id::EntityId;

/// Тело запроса массовой операции (удаление, назначение метки, экспорт)
///
/// В режиме "выбрать все" передаётся не список id, а список исключений
/// `non_ids` вместе с активными фильтрами: сервер сам пересчитывает
/// множество "все" по тем же фильтрам.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    #[serde(default)]
    pub select_all: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_ids: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub filters: Map<String, Value>,
}

impl BulkActionRequest {
    pub fn explicit(ids: Vec<EntityId>) -> Self {
        Self {
            select_all: false,
            ids,
            ..Default::default()
        }
    }

    pub fn all_except(non_ids: Vec<EntityId>, filters: Map<String, Value>) -> Self {
        Self {
            select_all: true,
            ids: Vec::new(),
            non_ids,
            filters,
        }
    }

    /// Нечего отправлять: явный режим без выбранных строк
    pub fn is_noop(&self) -> bool {
        !self.select_all && self.ids.is_empty()
    }
}

/// Назначение метки выбранным строкам
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignLabelRequest {
    pub label_id: EntityId,
    #[serde(flatten)]
    pub target: BulkActionRequest,
}

/// Ответ сервера на массовую операцию
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkActionResponse {
    #[serde(default)]
    pub affected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_request_serialization() {
        let req = BulkActionRequest::explicit(vec![EntityId::Int(1), EntityId::Int(2)]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "select_all": false, "ids": [1, 2] }));
    }

    #[test]
    fn test_all_except_request_carries_filters() {
        let mut filters = Map::new();
        filters.insert("status".into(), Value::String("active".into()));
        let req = BulkActionRequest::all_except(vec![EntityId::from("a")], filters);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "select_all": true,
                "non_ids": ["a"],
                "filters": { "status": "active" }
            })
        );
        assert!(!req.is_noop());
    }

    #[test]
    fn test_empty_explicit_is_noop() {
        assert!(BulkActionRequest::explicit(vec![]).is_noop());
    }
}
