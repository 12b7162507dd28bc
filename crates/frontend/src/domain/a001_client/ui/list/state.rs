use contracts::domain::a001_client::aggregate::ClientsQuery;
use leptos::prelude::*;
use serde_json::{Map, Value};

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [50, 100, 200, 400];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientListState {
    pub query: ClientsQuery,
}

impl ClientListState {
    /// Новый поиск всегда открывает первую страницу
    pub fn set_search(&mut self, search: String) {
        if self.query.search != search {
            self.query.search = search;
            self.query.page = 0;
        }
    }

    pub fn toggle_sort(&mut self, field: &str) {
        if self.query.sort_by == field {
            self.query.sort_desc = !self.query.sort_desc;
        } else {
            self.query.sort_by = field.to_string();
            self.query.sort_desc = false;
        }
        self.query.page = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size.max(1);
        self.query.page = 0;
    }

    pub fn go_to_page(&mut self, page: usize, total_count: usize) {
        let last = total_pages(total_count, self.query.page_size).saturating_sub(1);
        self.query.page = page.min(last);
    }
}

pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Фильтры массовой операции в режиме "выбрать все": поиск входит в
/// область выборки наравне с пользовательскими фильтрами
pub fn bulk_filters(mut filters: Map<String, Value>, search: &str) -> Map<String, Value> {
    let search = search.trim();
    if !search.is_empty() {
        filters.insert("search".to_string(), Value::String(search.to_string()));
    }
    filters
}

// Состояние живёт в scope компонента и освобождается при размонтировании
pub fn create_state() -> RwSignal<ClientListState> {
    RwSignal::new(ClientListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_resets_page() {
        let mut state = ClientListState::default();
        state.query.page = 3;
        state.set_search("acme".into());
        assert_eq!(state.query.page, 0);

        state.query.page = 2;
        state.set_search("acme".into());
        assert_eq!(state.query.page, 2);
    }

    #[test]
    fn test_toggle_sort_flips_direction_on_same_field() {
        let mut state = ClientListState::default();
        state.toggle_sort("name");
        assert_eq!(state.query.sort_by, "name");
        assert!(!state.query.sort_desc);
        state.toggle_sort("name");
        assert!(state.query.sort_desc);
    }

    #[test]
    fn test_go_to_page_is_clamped() {
        let mut state = ClientListState::default();
        state.set_page_size(50);
        state.go_to_page(10, 120);
        assert_eq!(state.query.page, 2);
        state.go_to_page(10, 0);
        assert_eq!(state.query.page, 0);
    }

    #[test]
    fn test_bulk_filters_adds_trimmed_search() {
        let filters = bulk_filters(Map::new(), "  acme ");
        assert_eq!(filters.get("search"), Some(&Value::String("acme".into())));
        assert!(bulk_filters(Map::new(), " ").is_empty());
    }
}
