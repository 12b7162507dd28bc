use serde::de::DeserializeOwned;
use serde_json::Value;

/// Имя поля с общим количеством строк у пагинированных коллекций
pub const TOTAL_COUNT_FIELD: &str = "total_count";

/// Извлекает коллекцию из ответа вида `{ "<field>": [...] }`
///
/// Отсутствующее поле, `null` или элементы неверной формы дают пустой
/// список: потребитель никогда не получает "нет коллекции".
pub fn extract_collection<T: DeserializeOwned>(raw: &Value, field: &str) -> Vec<T> {
    match raw.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Длина коллекции без десериализации элементов
pub fn collection_len(raw: &Value, field: &str) -> usize {
    raw.get(field)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// `total_count` ответа; если поле не пришло, берётся длина коллекции
pub fn extract_total_count(raw: &Value, field: &str) -> usize {
    raw.get(TOTAL_COUNT_FIELD)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_else(|| collection_len(raw, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_is_empty() {
        let raw = json!({ "other": [1, 2] });
        let items: Vec<i64> = extract_collection(&raw, "clients");
        assert!(items.is_empty());
        let raw = json!({ "clients": null });
        let items: Vec<i64> = extract_collection(&raw, "clients");
        assert!(items.is_empty());
    }

    #[test]
    fn test_total_count_fallback() {
        let raw = json!({ "clients": [1, 2, 3] });
        assert_eq!(extract_total_count(&raw, "clients"), 3);
        let raw = json!({ "clients": [1], "total_count": 250 });
        assert_eq!(extract_total_count(&raw, "clients"), 250);
    }

    #[test]
    fn test_total_count_ignores_negative() {
        let raw = json!({ "clients": [1, 2], "total_count": -5 });
        let total: usize = extract_total_count(&raw, "clients");
        assert_eq!(total, 2);
    }
}
