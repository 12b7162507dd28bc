//! Чекбокс выбора одной строки таблицы

use contracts::shared::entity_id::EntityId;
use leptos::prelude::*;
use thaw::*;

use crate::shared::selection::SelectionHandle;

/// Клик не всплывает до строки, чтобы не открывать карточку записи.
#[component]
pub fn TableCellCheckbox(
    selection: SelectionHandle<EntityId>,
    item_id: EntityId,
) -> impl IntoView {
    let id_for_checked = item_id.clone();

    view! {
        <TableCell class="fixed-checkbox-column" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || selection.is_selected(&id_for_checked)
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    selection.toggle(item_id.clone(), checked);
                }
            />
        </TableCell>
    }
}
