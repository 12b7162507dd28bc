use contracts::domain::a002_lead::aggregate::{Lead, LeadsQuery, LEADS_FIELD};
use leptos::prelude::*;

use crate::shared::filters::CustomFiltersHandle;
use crate::shared::swr::{
    use_resource, CollectionField, Key, Page, QueryParams, ResourceHandle, SwrOptions,
};

pub const LEADS_PATH: &str = "/api/leads";

pub const LEADS: CollectionField<Lead> = CollectionField::new(LEADS_FIELD);

pub fn leads_key(query: &LeadsQuery, filters: QueryParams) -> Key {
    let search = query.search.trim();
    let mut params = QueryParams::new()
        .with("page", query.page)
        .with("page_size", query.page_size)
        .with("search", (!search.is_empty()).then(|| search.to_string()))
        .with("stage", query.stage.clone());
    params.extend(filters);
    Key::with_params(LEADS_PATH, params)
}

pub fn use_get_leads(
    query: Signal<Option<LeadsQuery>>,
    filters: CustomFiltersHandle,
) -> ResourceHandle<Page<Lead>> {
    let key = Signal::derive(move || {
        let params = filters.query_params();
        query.with(|q| q.as_ref().map(|q| leads_key(q, params)))
    });
    use_resource(key, SwrOptions::default(), move |state| LEADS.view(state))
}
