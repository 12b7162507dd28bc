use contracts::shared::filters::FilterQuery;
use leptos::prelude::*;
use serde_json::{Map, Value};

use super::CustomFilters;
use crate::shared::swr::QueryParams;

/// Реактивное состояние фильтров списка
#[derive(Clone, Copy)]
pub struct CustomFiltersHandle {
    state: RwSignal<CustomFilters>,
}

pub fn use_custom_filters(initial: CustomFilters) -> CustomFiltersHandle {
    CustomFiltersHandle {
        state: RwSignal::new(initial),
    }
}

impl CustomFiltersHandle {
    pub fn set_field_filter(&self, field_id: &str, query: FilterQuery) {
        self.state.update(|f| f.set_field_filter(field_id, query));
    }

    pub fn clear_field_filter(&self, field_id: &str) {
        self.state.update(|f| f.clear_field_filter(field_id));
    }

    pub fn clear_all(&self) {
        self.state.update(|f| f.clear_all());
    }

    pub fn is_any_active(&self) -> bool {
        self.state.with(|f| f.is_any_active())
    }

    pub fn active_count(&self) -> usize {
        self.state.with(|f| f.active_count())
    }

    pub fn request_params(&self) -> Map<String, Value> {
        self.state.with(|f| f.to_request_params())
    }

    pub fn query_params(&self) -> QueryParams {
        self.state.with(|f| f.to_query_params())
    }

    pub fn get(&self) -> CustomFilters {
        self.state.get()
    }
}
