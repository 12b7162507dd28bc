use crate::domain::a002_lead::api::use_get_leads;
use crate::shared::filters::{use_custom_filters, CustomFilters};
use crate::shared::components::FilterPanel;
use crate::shared::list_utils::SearchInput;
use contracts::domain::a002_lead::aggregate::{Lead, LeadsQuery};
use contracts::shared::filters::FieldType;
use leptos::prelude::*;
use thaw::*;

const LEAD_STAGES: [(&str, &str); 4] = [
    ("new", "Новый"),
    ("qualified", "Квалифицирован"),
    ("won", "Выигран"),
    ("lost", "Потерян"),
];

fn stage_title(stage: Option<&str>) -> String {
    stage
        .map(|s| {
            LEAD_STAGES
                .iter()
                .find(|(id, _)| *id == s)
                .map(|(_, title)| title.to_string())
                .unwrap_or_else(|| s.to_string())
        })
        .unwrap_or_default()
}

#[component]
pub fn LeadList() -> impl IntoView {
    let query = RwSignal::new(LeadsQuery::default());
    let filters = use_custom_filters(CustomFilters::from_fields([
        ("source", FieldType::MultiChoice),
        ("budget", FieldType::NumberRange),
    ]));
    let leads = use_get_leads(Signal::derive(move || Some(query.get())), filters);
    let rows = Signal::derive(move || leads.data().map(|p| p.items).unwrap_or_default());

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Лиды"</h1>
                    <span class="badge badge--primary">
                        {move || leads.data().map(|p| p.total_count).unwrap_or(0).to_string()}
                    </span>
                </div>
                <div class="page__header-right">
                    <select
                        class="filter-panel__input"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            query.update(|q| {
                                q.stage = (!value.is_empty()).then_some(value);
                                q.page = 0;
                            });
                        }
                    >
                        <option value="">"Все стадии"</option>
                        {LEAD_STAGES
                            .iter()
                            .map(|(id, title)| view! { <option value=*id>{*title}</option> })
                            .collect_view()}
                    </select>
                    <SearchInput
                        value=Signal::derive(move || query.with(|q| q.search.clone()))
                        on_change=Callback::new(move |text: String| query.update(|q| {
                            q.search = text;
                            q.page = 0;
                        }))
                    />
                </div>
            </div>

            <div class="page__content">
                <FilterPanel filters=filters labels=vec![("source", "Источник"), ("budget", "Бюджет")] />

                {move || leads.error().map(|err| view! { <div class="alert alert--error">{err}</div> })}

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell resizable=false>"Имя"</TableHeaderCell>
                            <TableHeaderCell resizable=false>"Источник"</TableHeaderCell>
                            <TableHeaderCell resizable=false>"Стадия"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || rows.get()
                            key=|lead: &Lead| lead.id.clone()
                            children=move |lead: Lead| view! {
                                <TableRow>
                                    <TableCell><TableCellLayout truncate=true>{lead.name.clone()}</TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout>{lead.source.clone().unwrap_or_default()}</TableCellLayout></TableCell>
                                    <TableCell><TableCellLayout>{stage_title(lead.stage.as_deref())}</TableCellLayout></TableCell>
                                </TableRow>
                            }
                        />
                    </TableBody>
                </Table>

                <Show when=move || leads.empty()>
                    <div class="table__placeholder">"Лидов нет"</div>
                </Show>
            </div>
        </div>
    }
}
