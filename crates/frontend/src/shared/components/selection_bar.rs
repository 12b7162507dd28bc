use contracts::shared::entity_id::EntityId;
use leptos::prelude::*;

use crate::shared::selection::SelectionHandle;

/// Панель массового выбора над таблицей.
///
/// Показывает число выбранных записей с учётом режима "выбраны все",
/// предлагает выбрать всю коллекцию под фильтрами. `children`:
/// кнопки массовых действий, видны только при непустом выборе.
/// "Выбрать все" имеет смысл, пока режим не включён и коллекция не пуста
fn offers_select_all(all_selected_mode: bool, total_count: usize) -> bool {
    !all_selected_mode && total_count > 0
}

#[component]
pub fn SelectionBar(
    selection: SelectionHandle<EntityId>,

    /// Всего записей под текущими фильтрами
    #[prop(into)]
    total_count: Signal<usize>,

    children: ChildrenFn,
) -> impl IntoView {
    let selected = move || selection.selected_count(total_count.get());
    let children = StoredValue::new(children);

    view! {
        <div class="selection-bar">
            <span class="selection-bar__count">
                {move || format!("Выбрано: {} из {}", selected(), total_count.get())}
            </span>
            <Show when=move || offers_select_all(selection.is_all_selected_mode(), total_count.get())>
                <button class="button button--ghost" on:click=move |_| selection.select_all()>
                    {move || format!("Выбрать все {}", total_count.get())}
                </button>
            </Show>
            <Show when=move || { selected() > 0 }>
                <button class="button button--ghost" on:click=move |_| selection.deselect_all()>
                    "Снять выбор"
                </button>
                <div class="selection-bar__actions">
                    {children.with_value(|c| c())}
                </div>
            </Show>
        </div>
    }
}
