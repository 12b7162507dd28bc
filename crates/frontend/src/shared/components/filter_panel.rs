use contracts::shared::filters::{BoolChoice, FieldType, FilterDescriptor, FilterQuery};
use leptos::prelude::*;

use crate::shared::filters::CustomFiltersHandle;
use crate::shared::icons::icon;

/// Подпись поля фильтра: (field_id, заголовок)
pub type FieldLabel = (&'static str, &'static str);

/// Сворачиваемая панель пользовательских фильтров списка.
///
/// Редактор строится по типу поля; активные фильтры выводятся чипами
/// с кнопкой сброса.
#[component]
pub fn FilterPanel(
    filters: CustomFiltersHandle,
    #[prop(optional)] labels: Vec<FieldLabel>,
) -> impl IntoView {
    let is_expanded = RwSignal::new(false);
    let labels = StoredValue::new(labels);
    let label_of = move |field_id: &str| -> String {
        labels.with_value(|l| {
            l.iter()
                .find(|(id, _)| *id == field_id)
                .map(|(_, label)| label.to_string())
                .unwrap_or_else(|| field_id.to_string())
        })
    };

    let descriptors = move || filters.get().descriptors().to_vec();
    let active = move || {
        descriptors()
            .into_iter()
            .filter(|d| d.is_active())
            .collect::<Vec<_>>()
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div
                    class="filter-panel-header__left"
                    on:click=move |_| is_expanded.update(|e| *e = !*e)
                >
                    {icon("filter")}
                    <span class="filter-panel__title">"Фильтры"</span>
                    <Show when=move || filters.is_any_active()>
                        <span class="badge badge--primary">{move || filters.active_count()}</span>
                    </Show>
                </div>
                <Show when=move || filters.is_any_active()>
                    <button class="button button--ghost" on:click=move |_| filters.clear_all()>
                        "Сбросить все"
                    </button>
                </Show>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">
                    <For
                        each=descriptors
                        key=|d| d.field_id.clone()
                        children=move |d: FilterDescriptor| {
                            let title = label_of(&d.field_id);
                            view! {
                                <div class="filter-panel__field">
                                    <label class="filter-panel__label">{title}</label>
                                    <FilterEditor filters=filters field_id=d.field_id.clone() field_type=d.field_type() />
                                </div>
                            }
                        }
                    />
                </div>
            </div>

            <div class="filter-panel__tags">
                <For
                    each=active
                    key=|d| format!("{}:{:?}", d.field_id, d.query)
                    children=move |d: FilterDescriptor| {
                        let field_id = d.field_id.clone();
                        let label = format!("{}: {}", label_of(&d.field_id), describe(&d.query));
                        view! {
                            <FilterTag
                                label=label
                                on_remove=Callback::new(move |_| filters.clear_field_filter(&field_id))
                            />
                        }
                    }
                />
            </div>
        </div>
    }
}

/// Редактор значения одного фильтра
#[component]
fn FilterEditor(
    filters: CustomFiltersHandle,
    field_id: String,
    field_type: FieldType,
) -> impl IntoView {
    let field_id = StoredValue::new(field_id);
    let current = move || {
        field_id.with_value(|id| {
            filters
                .get()
                .get(id)
                .map(|d| d.query.clone())
                .unwrap_or_else(|| FilterQuery::empty(field_type))
        })
    };
    let set = move |query: FilterQuery| {
        field_id.with_value(|id| filters.set_field_filter(id, query))
    };

    match field_type {
        FieldType::Text => view! {
            <input
                type="text"
                class="filter-panel__input"
                prop:value=move || match current() {
                    FilterQuery::Text { query } => query,
                    _ => String::new(),
                }
                on:change=move |ev| set(FilterQuery::text(event_target_value(&ev).trim()))
            />
        }
        .into_any(),
        FieldType::Boolean => view! {
            <select
                class="filter-panel__input"
                prop:value=move || match current() {
                    FilterQuery::Boolean { query: Some(choice) } => choice.as_str().to_string(),
                    _ => String::new(),
                }
                on:change=move |ev| {
                    let query = match event_target_value(&ev).as_str() {
                        "true" => FilterQuery::boolean(true),
                        "false" => FilterQuery::boolean(false),
                        _ => FilterQuery::empty(FieldType::Boolean),
                    };
                    set(query);
                }
            >
                <option value="">"Все"</option>
                <option value="true">"Да"</option>
                <option value="false">"Нет"</option>
            </select>
        }
        .into_any(),
        FieldType::NumberRange => {
            let bounds = move || match current() {
                FilterQuery::NumberRange { query } => query,
                _ => Default::default(),
            };
            view! {
                <div class="filter-panel__range">
                    <input
                        type="number"
                        class="filter-panel__input"
                        placeholder="от"
                        prop:value=move || bounds().gt
                        on:change=move |ev| {
                            let lt = bounds().lt;
                            set(FilterQuery::number_range(event_target_value(&ev).trim(), lt));
                        }
                    />
                    <input
                        type="number"
                        class="filter-panel__input"
                        placeholder="до"
                        prop:value=move || bounds().lt
                        on:change=move |ev| {
                            let gt = bounds().gt;
                            set(FilterQuery::number_range(gt, event_target_value(&ev).trim()));
                        }
                    />
                </div>
            }
            .into_any()
        }
        FieldType::MultiChoice => {
            let lists = move || match current() {
                FilterQuery::MultiChoice { query, non_query } => (query, non_query),
                _ => (Vec::new(), Vec::new()),
            };
            view! {
                <div class="filter-panel__range">
                    <input
                        type="text"
                        class="filter-panel__input"
                        placeholder="содержит (через запятую)"
                        prop:value=move || lists().0.join(", ")
                        on:change=move |ev| {
                            let (_, non_query) = lists();
                            set(FilterQuery::multi_choice(split_choices(&event_target_value(&ev)), non_query));
                        }
                    />
                    <input
                        type="text"
                        class="filter-panel__input"
                        placeholder="не содержит"
                        prop:value=move || lists().1.join(", ")
                        on:change=move |ev| {
                            let (query, _) = lists();
                            set(FilterQuery::multi_choice(query, split_choices(&event_target_value(&ev))));
                        }
                    />
                </div>
            }
            .into_any()
        }
    }
}

/// FilterTag - чип активного фильтра
#[component]
pub fn FilterTag(
    #[prop(into)] label: String,
    on_remove: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}

fn split_choices(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Короткое описание значения для чипа
fn describe(query: &FilterQuery) -> String {
    match query {
        FilterQuery::Text { query } => format!("\"{}\"", query),
        FilterQuery::Boolean { query } => match query {
            Some(BoolChoice::True) => "да".to_string(),
            Some(BoolChoice::False) => "нет".to_string(),
            None => String::new(),
        },
        FilterQuery::NumberRange { query } => match (query.gt.is_empty(), query.lt.is_empty()) {
            (false, false) => format!("{} … {}", query.gt, query.lt),
            (false, true) => format!("> {}", query.gt),
            (true, false) => format!("< {}", query.lt),
            (true, true) => String::new(),
        },
        FilterQuery::MultiChoice { query, non_query } => {
            let mut parts = Vec::new();
            if !query.is_empty() {
                parts.push(query.join(", "));
            }
            if !non_query.is_empty() {
                parts.push(format!("кроме {}", non_query.join(", ")));
            }
            parts.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_choices_drops_blanks() {
        assert_eq!(split_choices(" vip, , new ,"), vec!["vip", "new"]);
        assert!(split_choices("  ").is_empty());
    }

    #[test]
    fn test_describe_number_range() {
        assert_eq!(describe(&FilterQuery::number_range("10", "")), "> 10");
        assert_eq!(describe(&FilterQuery::number_range("", "5")), "< 5");
        assert_eq!(describe(&FilterQuery::number_range("1", "5")), "1 … 5");
    }

    #[test]
    fn test_describe_multi_choice() {
        let q = FilterQuery::multi_choice(vec!["a".into()], vec!["b".into(), "c".into()]);
        assert_eq!(describe(&q), "a; кроме b, c");
        assert_eq!(describe(&FilterQuery::boolean(false)), "нет");
    }
}
