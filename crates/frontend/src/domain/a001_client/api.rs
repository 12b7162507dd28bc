use contracts::domain::a001_client::aggregate::{Client, ClientsQuery, CLIENTS_FIELD};
use contracts::shared::bulk_action::{AssignLabelRequest, BulkActionRequest, BulkActionResponse};
use contracts::shared::entity_id::EntityId;
use leptos::prelude::*;

use crate::shared::filters::CustomFiltersHandle;
use crate::shared::swr::{
    invalidate_matching, post_json, use_resource, CollectionField, FetchError, Key, Page,
    QueryParams, ResourceHandle, SwrOptions,
};

pub const CLIENTS_PATH: &str = "/api/clients";
pub const CLIENT_IDS_PATH: &str = "/api/clients/ids";

pub const CLIENTS: CollectionField<Client> = CollectionField::new(CLIENTS_FIELD);
/// `{ "ids": [...] }` - все id под текущими фильтрами, для режима "выбрать все"
pub const CLIENT_IDS: CollectionField<EntityId> = CollectionField::new("ids");

/// Параметры, которые определяют состав коллекции (без пагинации и сортировки)
fn scope_params(search: &str, filters: QueryParams) -> QueryParams {
    let search = search.trim();
    let search = (!search.is_empty()).then(|| search.to_string());
    let mut params = QueryParams::new().with("search", search);
    params.extend(filters);
    params
}

pub fn clients_key(query: &ClientsQuery, filters: QueryParams) -> Key {
    let params = scope_params(&query.search, filters)
        .with("page", query.page)
        .with("page_size", query.page_size)
        .with("sort_by", query.sort_by.as_str())
        .with("sort_desc", query.sort_desc);
    Key::with_params(CLIENTS_PATH, params)
}

pub fn client_ids_key(search: &str, filters: QueryParams) -> Key {
    Key::with_params(CLIENT_IDS_PATH, scope_params(search, filters))
}

/// Страница клиентов. `None` в `query` отключает загрузку.
pub fn use_get_clients(
    query: Signal<Option<ClientsQuery>>,
    filters: CustomFiltersHandle,
) -> ResourceHandle<Page<Client>> {
    let key = Signal::derive(move || {
        let params = filters.query_params();
        query.with(|q| q.as_ref().map(|q| clients_key(q, params)))
    });
    use_resource(
        key,
        SwrOptions::default().with_focus_revalidation(),
        move |state| CLIENTS.view(state),
    )
}

/// Все id клиентов под поиском и фильтрами
pub fn use_get_client_ids(
    search: Signal<String>,
    filters: CustomFiltersHandle,
) -> ResourceHandle<Page<EntityId>> {
    let key = Signal::derive(move || {
        let params = filters.query_params();
        Some(search.with(|s| client_ids_key(s, params)))
    });
    use_resource(key, SwrOptions::default(), move |state| CLIENT_IDS.view(state))
}

/// Удалить выбранных клиентов
pub async fn delete_clients(request: &BulkActionRequest) -> Result<BulkActionResponse, FetchError> {
    log::info!(
        "delete clients: select_all={} ids={} non_ids={}",
        request.select_all,
        request.ids.len(),
        request.non_ids.len()
    );
    let response = post_json(&format!("{}/bulk-delete", CLIENTS_PATH), request).await?;
    invalidate_matching(CLIENTS_PATH);
    Ok(response)
}

/// Назначить метку выбранным клиентам
pub async fn assign_label(request: &AssignLabelRequest) -> Result<BulkActionResponse, FetchError> {
    let response = post_json(&format!("{}/assign-label", CLIENTS_PATH), request).await?;
    invalidate_matching(CLIENTS_PATH);
    Ok(response)
}
