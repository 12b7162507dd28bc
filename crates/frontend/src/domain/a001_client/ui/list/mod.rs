pub mod state;

use self::state::{bulk_filters, create_state, total_pages, PAGE_SIZE_OPTIONS};
use crate::domain::a001_client::api::{
    assign_label, delete_clients, use_get_client_ids, use_get_clients,
};
use crate::shared::components::table::{TableCellCheckbox, TableHeaderCheckbox};
use crate::shared::components::{FilterPanel, SelectionBar};
use crate::shared::filters::{use_custom_filters, CustomFilters};
use crate::shared::icons::icon;
use crate::shared::list_utils::{get_sort_indicator, SearchInput};
use crate::shared::notify::use_notices;
use crate::shared::selection::{use_selection, CapacityExceeded};
use contracts::domain::a001_client::aggregate::Client;
use contracts::shared::bulk_action::AssignLabelRequest;
use contracts::shared::entity_id::EntityId;
use contracts::shared::filters::FieldType;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Пользовательские поля, доступные для фильтрации списка клиентов
const CLIENT_FILTER_FIELDS: [(&str, FieldType); 4] = [
    ("city", FieldType::Text),
    ("is_vip", FieldType::Boolean),
    ("deal_amount", FieldType::NumberRange),
    ("segments", FieldType::MultiChoice),
];

const CLIENT_FILTER_LABELS: [(&str, &str); 4] = [
    ("city", "Город"),
    ("is_vip", "VIP"),
    ("deal_amount", "Сумма сделок"),
    ("segments", "Сегменты"),
];

#[component]
pub fn ClientList() -> impl IntoView {
    let notices = use_notices();
    let state = create_state();
    let filters = use_custom_filters(CustomFilters::from_fields(CLIENT_FILTER_FIELDS));
    let label_input = RwSignal::new(String::new());
    let is_busy = RwSignal::new(false);

    let search = Signal::derive(move || state.with(|s| s.query.search.clone()));
    let clients = use_get_clients(Signal::derive(move || Some(state.get().query)), filters);
    let client_ids = use_get_client_ids(search, filters);

    let all_ids = Signal::derive(move || client_ids.data().map(|p| p.items).unwrap_or_default());
    let on_overflow = Callback::new(move |exceeded: CapacityExceeded| {
        if let Some(notices) = notices {
            notices.warning(exceeded.to_string());
        }
    });
    let selection = use_selection(all_ids, Some(on_overflow));

    // Смена области выборки (поиск, фильтры) сбрасывает выбор и страницу
    Effect::new(move |prev: Option<(String, String)>| {
        let scope = (search.get(), filters.query_params().to_query_string());
        if prev.as_ref().is_some_and(|p| *p != scope) {
            selection.deselect_all();
            state.update(|s| s.query.page = 0);
        }
        scope
    });

    let rows = Signal::derive(move || clients.data().map(|p| p.items).unwrap_or_default());
    let total_count = Signal::derive(move || {
        clients.data().map(|p| p.total_count).unwrap_or(0)
    });
    let page_ids = Signal::derive(move || {
        rows.with(|r| r.iter().map(|c| c.id.clone()).collect::<Vec<EntityId>>())
    });

    let bulk_target = move || {
        let scope = bulk_filters(filters.request_params(), &search.get_untracked());
        selection.model().to_bulk_request(scope)
    };

    let delete_selected = move |_| {
        let request = bulk_target();
        if request.is_noop() || is_busy.get_untracked() {
            return;
        }
        is_busy.set(true);
        spawn_local(async move {
            match delete_clients(&request).await {
                Ok(response) => {
                    selection.deselect_all();
                    if let Some(n) = notices {
                        n.info(format!("Удалено клиентов: {}", response.affected));
                    }
                }
                Err(e) => {
                    if let Some(n) = notices {
                        n.error(format!("Не удалось удалить: {}", e));
                    }
                }
            }
            is_busy.set(false);
        });
    };

    let assign_selected = move |_| {
        let label = label_input.get_untracked().trim().to_string();
        let target = bulk_target();
        if label.is_empty() || target.is_noop() || is_busy.get_untracked() {
            return;
        }
        let request = AssignLabelRequest {
            label_id: EntityId::from(label),
            target,
        };
        is_busy.set(true);
        spawn_local(async move {
            match assign_label(&request).await {
                Ok(response) => {
                    label_input.set(String::new());
                    if let Some(n) = notices {
                        n.info(format!("Метка назначена: {}", response.affected));
                    }
                }
                Err(e) => {
                    if let Some(n) = notices {
                        n.error(format!("Не удалось назначить метку: {}", e));
                    }
                }
            }
            is_busy.set(false);
        });
    };

    let sort_header = move |field: &'static str, title: &'static str| {
        view! {
            <TableHeaderCell resizable=false>
                <div class="table__sortable-header" on:click=move |_| state.update(|s| s.toggle_sort(field))>
                    {title}
                    <span class="sort-indicator">
                        {move || state.with(|s| get_sort_indicator(&s.query.sort_by, field, !s.query.sort_desc))}
                    </span>
                </div>
            </TableHeaderCell>
        }
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("clients")}
                    <h1 class="page__title">"Клиенты"</h1>
                    <span class="badge badge--primary">{move || total_count.get().to_string()}</span>
                </div>
                <div class="page__header-right">
                    <SearchInput
                        value=search
                        on_change=Callback::new(move |text: String| state.update(|s| s.set_search(text)))
                        placeholder="Имя, email, телефон..."
                    />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            clients.mutate();
                            client_ids.mutate();
                        }
                        disabled=Signal::derive(move || clients.is_validating())
                    >
                        {icon("refresh")}
                        " Обновить"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <FilterPanel filters=filters labels=CLIENT_FILTER_LABELS.to_vec() />

                <SelectionBar selection=selection total_count=total_count>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=delete_selected
                        disabled=Signal::derive(move || is_busy.get())
                    >
                        {icon("trash")}
                        " Удалить"
                    </Button>
                    <input
                        type="text"
                        class="selection-bar__input"
                        placeholder="Метка"
                        prop:value=move || label_input.get()
                        on:input=move |ev| label_input.set(event_target_value(&ev))
                    />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=assign_selected
                        disabled=Signal::derive(move || is_busy.get() || label_input.get().trim().is_empty())
                    >
                        {icon("tag")}
                        " Назначить"
                    </Button>
                </SelectionBar>

                {move || clients.error().map(|err| view! {
                    <div class="alert alert--error">{err}</div>
                })}

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCheckbox selection=selection page_ids=page_ids />
                                {sort_header("name", "Имя")}
                                {sort_header("email", "Email")}
                                <TableHeaderCell resizable=false>"Телефон"</TableHeaderCell>
                                {sort_header("status", "Статус")}
                                <TableHeaderCell resizable=false>"Метки"</TableHeaderCell>
                                {sort_header("created_at", "Создан")}
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|client: &Client| client.id.clone()
                                children=move |client: Client| {
                                    let created = client
                                        .created_at
                                        .map(|d| d.format("%d.%m.%Y").to_string())
                                        .unwrap_or_default();
                                    view! {
                                        <TableRow>
                                            <TableCellCheckbox selection=selection item_id=client.id.clone() />
                                            <TableCell><TableCellLayout truncate=true>{client.name.clone()}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout truncate=true>{client.email.clone().unwrap_or_default()}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{client.phone.clone().unwrap_or_default()}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{client.status.clone().unwrap_or_default()}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout truncate=true>{client.labels.join(", ")}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{created}</TableCellLayout></TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>

                    <Show when=move || clients.is_loading()>
                        <div class="table__placeholder">"Загрузка..."</div>
                    </Show>
                    <Show when=move || clients.empty() && clients.error().is_none()>
                        <div class="table__placeholder">"Клиенты не найдены"</div>
                    </Show>
                </div>

                <div class="pagination-controls">
                    <button
                        class="pagination-btn"
                        disabled=move || state.with(|s| s.query.page == 0)
                        on:click=move |_| state.update(|s| {
                            let page = s.query.page.saturating_sub(1);
                            s.go_to_page(page, total_count.get_untracked());
                        })
                    >
                        "‹"
                    </button>
                    <span class="pagination-info">
                        {move || {
                            let page = state.with(|s| s.query.page);
                            let pages = state.with(|s| total_pages(total_count.get(), s.query.page_size)).max(1);
                            format!("{} / {} ({})", page + 1, pages, total_count.get())
                        }}
                    </span>
                    <button
                        class="pagination-btn"
                        disabled=move || {
                            let pages = state.with(|s| total_pages(total_count.get(), s.query.page_size));
                            state.with(|s| s.query.page + 1 >= pages)
                        }
                        on:click=move |_| state.update(|s| {
                            let page = s.query.page + 1;
                            s.go_to_page(page, total_count.get_untracked());
                        })
                    >
                        "›"
                    </button>
                    <select
                        class="pagination-size"
                        prop:value=move || state.with(|s| s.query.page_size.to_string())
                        on:change=move |ev| {
                            if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                                state.update(|s| s.set_page_size(size));
                            }
                        }
                    >
                        {PAGE_SIZE_OPTIONS
                            .iter()
                            .map(|size| view! { <option value=size.to_string()>{size.to_string()}</option> })
                            .collect_view()}
                    </select>
                </div>
            </div>
        </div>
    }
}
