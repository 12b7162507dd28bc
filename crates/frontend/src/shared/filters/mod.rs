//! Состояние фильтров по пользовательским полям списка
//!
//! Список дескрипторов хранится в порядке добавления. Повторная установка
//! фильтра поля заменяет его запрос на месте, сброс оставляет слот поля
//! с пустым запросом.

pub mod hook;

use contracts::shared::filters::{FieldType, FilterDescriptor, FilterQuery};
use serde_json::{Map, Value};

use crate::shared::swr::QueryParams;

pub use hook::{use_custom_filters, CustomFiltersHandle};

/// Имя параметра GET-запроса с активными фильтрами (JSON)
pub const CUSTOM_FILTERS_PARAM: &str = "custom_filters";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFilters {
    descriptors: Vec<FilterDescriptor>,
}

impl CustomFilters {
    pub fn new(descriptors: Vec<FilterDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Пустые слоты для известных полей
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, FieldType)>) -> Self {
        Self {
            descriptors: fields
                .into_iter()
                .map(|(id, field_type)| FilterDescriptor::new(id, FilterQuery::empty(field_type)))
                .collect(),
        }
    }

    pub fn descriptors(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, field_id: &str) -> Option<&FilterDescriptor> {
        self.descriptors.iter().find(|d| d.field_id == field_id)
    }

    /// Установить фильтр поля (найти по id или добавить в конец)
    pub fn set_field_filter(&mut self, field_id: &str, query: FilterQuery) {
        match self.descriptors.iter_mut().find(|d| d.field_id == field_id) {
            Some(descriptor) => descriptor.query = query,
            None => self.descriptors.push(FilterDescriptor::new(field_id, query)),
        }
    }

    /// Сбросить запрос поля, сохранив слот
    pub fn clear_field_filter(&mut self, field_id: &str) {
        if let Some(descriptor) = self.descriptors.iter_mut().find(|d| d.field_id == field_id) {
            descriptor.query = FilterQuery::empty(descriptor.field_type());
        }
    }

    pub fn clear_all(&mut self) {
        for descriptor in &mut self.descriptors {
            descriptor.query = FilterQuery::empty(descriptor.field_type());
        }
    }

    pub fn is_any_active(&self) -> bool {
        is_any_active(&self.descriptors)
    }

    /// Для бейджа на панели фильтров
    pub fn active_count(&self) -> usize {
        self.descriptors.iter().filter(|d| d.is_active()).count()
    }

    pub fn to_request_params(&self) -> Map<String, Value> {
        to_request_params(&self.descriptors)
    }

    /// Активные фильтры одним JSON-параметром; без параметра, если фильтров нет
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if self.is_any_active() {
            let json = Value::Object(self.to_request_params()).to_string();
            params.insert(CUSTOM_FILTERS_PARAM, json);
        }
        params
    }
}

pub fn is_any_active(descriptors: &[FilterDescriptor]) -> bool {
    descriptors.iter().any(FilterDescriptor::is_active)
}

/// field id -> нормализованное значение; неактивные поля не попадают в запрос
pub fn to_request_params(descriptors: &[FilterDescriptor]) -> Map<String, Value> {
    descriptors
        .iter()
        .filter_map(|d| d.query.request_value().map(|v| (d.field_id.clone(), v)))
        .collect()
}
