//! Фильтры по пользовательским (динамическим) полям сущностей
//!
//! Форма `query` зависит от типа поля, поэтому фильтр описан как
//! tagged union по `field_type`. Пустой payload означает "фильтр не задан",
//! слот поля при этом остаётся в списке.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Тип пользовательского поля
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Boolean,
    #[serde(rename = "number")]
    NumberRange,
    MultiChoice,
}

/// Выбор в булевом фильтре ("true" / "false")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolChoice {
    True,
    False,
}

impl BoolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolChoice::True => "true",
            BoolChoice::False => "false",
        }
    }
}

impl From<bool> for BoolChoice {
    fn from(value: bool) -> Self {
        if value {
            BoolChoice::True
        } else {
            BoolChoice::False
        }
    }
}

/// Границы числового диапазона. Пустая строка = граница не задана.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberBounds {
    #[serde(default)]
    pub gt: String,
    #[serde(default)]
    pub lt: String,
}

/// Значение фильтра, форма зависит от типа поля
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field_type", rename_all = "snake_case")]
pub enum FilterQuery {
    Text {
        #[serde(default)]
        query: String,
    },
    Boolean {
        #[serde(default)]
        query: Option<BoolChoice>,
    },
    #[serde(rename = "number")]
    NumberRange {
        #[serde(default)]
        query: NumberBounds,
    },
    MultiChoice {
        /// Значения, которые должны присутствовать
        #[serde(default)]
        query: Vec<String>,
        /// Значения, которые должны отсутствовать
        #[serde(default, rename = "nonQuery", alias = "non_query")]
        non_query: Vec<String>,
    },
}

impl FilterQuery {
    /// Пустой (неактивный) фильтр для типа поля
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FilterQuery::Text { query: String::new() },
            FieldType::Boolean => FilterQuery::Boolean { query: None },
            FieldType::NumberRange => FilterQuery::NumberRange {
                query: NumberBounds::default(),
            },
            FieldType::MultiChoice => FilterQuery::MultiChoice {
                query: Vec::new(),
                non_query: Vec::new(),
            },
        }
    }

    pub fn text(query: impl Into<String>) -> Self {
        FilterQuery::Text { query: query.into() }
    }

    pub fn boolean(value: bool) -> Self {
        FilterQuery::Boolean {
            query: Some(value.into()),
        }
    }

    pub fn number_range(gt: impl Into<String>, lt: impl Into<String>) -> Self {
        FilterQuery::NumberRange {
            query: NumberBounds {
                gt: gt.into(),
                lt: lt.into(),
            },
        }
    }

    pub fn multi_choice(query: Vec<String>, non_query: Vec<String>) -> Self {
        FilterQuery::MultiChoice { query, non_query }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FilterQuery::Text { .. } => FieldType::Text,
            FilterQuery::Boolean { .. } => FieldType::Boolean,
            FilterQuery::NumberRange { .. } => FieldType::NumberRange,
            FilterQuery::MultiChoice { .. } => FieldType::MultiChoice,
        }
    }

    /// Участвует ли фильтр в запросе
    pub fn is_active(&self) -> bool {
        match self {
            FilterQuery::Text { query } => !query.is_empty(),
            FilterQuery::Boolean { query } => query.is_some(),
            FilterQuery::NumberRange { query } => !query.gt.is_empty() || !query.lt.is_empty(),
            FilterQuery::MultiChoice { query, non_query } => {
                !query.is_empty() || !non_query.is_empty()
            }
        }
    }

    /// Нормализованное значение для запроса; `None` для неактивного фильтра
    pub fn request_value(&self) -> Option<Value> {
        if !self.is_active() {
            return None;
        }
        let value = match self {
            FilterQuery::Text { query } => Value::String(query.clone()),
            FilterQuery::Boolean { query } => {
                Value::String(query.map(|c| c.as_str()).unwrap_or_default().to_string())
            }
            FilterQuery::NumberRange { query } => {
                let mut bounds = Map::new();
                if !query.gt.is_empty() {
                    bounds.insert("gt".into(), Value::String(query.gt.clone()));
                }
                if !query.lt.is_empty() {
                    bounds.insert("lt".into(), Value::String(query.lt.clone()));
                }
                Value::Object(bounds)
            }
            FilterQuery::MultiChoice { query, non_query } => {
                let mut choice = Map::new();
                if !query.is_empty() {
                    choice.insert("query".into(), strings(query));
                }
                if !non_query.is_empty() {
                    choice.insert("nonQuery".into(), strings(non_query));
                }
                Value::Object(choice)
            }
        };
        Some(value)
    }
}

fn strings(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

/// Фильтр по одному полю
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    #[serde(rename = "customId", alias = "custom_id")]
    pub field_id: String,
    #[serde(flatten)]
    pub query: FilterQuery,
}

impl FilterDescriptor {
    pub fn new(field_id: impl Into<String>, query: FilterQuery) -> Self {
        Self {
            field_id: field_id.into(),
            query,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.query.field_type()
    }

    pub fn is_active(&self) -> bool {
        self.query.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_range_activity() {
        assert!(!FilterQuery::number_range("", "").is_active());
        assert!(FilterQuery::number_range("5", "").is_active());
        assert!(FilterQuery::number_range("", "10").is_active());
    }

    #[test]
    fn test_multi_choice_exclusion_only_is_active() {
        let q = FilterQuery::multi_choice(vec![], vec!["x".into()]);
        assert!(q.is_active());
        assert!(!FilterQuery::empty(FieldType::MultiChoice).is_active());
    }

    #[test]
    fn test_boolean_false_is_active() {
        assert!(FilterQuery::boolean(false).is_active());
        assert!(!FilterQuery::empty(FieldType::Boolean).is_active());
    }

    #[test]
    fn test_descriptor_wire_format() {
        let raw = r#"{"customId":"cf_7","field_type":"number","query":{"gt":"5","lt":""}}"#;
        let d: FilterDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(d.field_id, "cf_7");
        assert_eq!(d.field_type(), FieldType::NumberRange);
        assert!(d.is_active());

        let raw = r#"{"customId":"tags","field_type":"multi_choice","query":[],"nonQuery":["x"]}"#;
        let d: FilterDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(d.query, FilterQuery::multi_choice(vec![], vec!["x".into()]));
    }

    #[test]
    fn test_request_value_omits_empty_bounds() {
        let v = FilterQuery::number_range("", "100").request_value().unwrap();
        assert_eq!(v, serde_json::json!({ "lt": "100" }));
        assert_eq!(FilterQuery::text("").request_value(), None);
        assert_eq!(
            FilterQuery::boolean(true).request_value(),
            Some(serde_json::json!("true"))
        );
    }
}
