use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор строки любой коллекции (клиент, лид, тикет...)
///
/// Сервер отдаёт как числовые, так и строковые id, поэтому значение
/// сериализуется без тега. Структура не предполагается, только сравнение.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl EntityId {
    pub fn as_string(&self) -> String {
        match self {
            EntityId::Int(v) => v.to_string(),
            EntityId::Str(v) => v.clone(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(v) => write!(f, "{}", v),
            EntityId::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Int(value)
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        EntityId::Int(value as i64)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Str(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialize() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[1, "abc", 42]"#).unwrap();
        assert_eq!(
            ids,
            vec![EntityId::Int(1), EntityId::from("abc"), EntityId::Int(42)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::from(7).to_string(), "7");
        assert_eq!(EntityId::from("c-12").to_string(), "c-12");
    }

    #[test]
    fn test_int_and_str_are_distinct() {
        assert_ne!(EntityId::Int(1), EntityId::from("1"));
    }
}
