//! Чекбокс в заголовке таблицы: выбор/снятие всех строк текущей страницы
//!
//! ```rust,ignore
//! <TableHeaderCheckbox
//!     selection=selection
//!     page_ids=Signal::derive(move || rows.get().iter().map(|r| r.id.clone()).collect())
//! />
//! ```

use contracts::shared::entity_id::EntityId;
use leptos::prelude::event_target_checked;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;

use crate::shared::selection::{CheckState, SelectionHandle};

/// Три состояния считаются по модели выбора, так что режим
/// "выбраны все" отображается корректно и для строк вне загруженных данных.
#[component]
pub fn TableHeaderCheckbox(
    selection: SelectionHandle<EntityId>,

    /// Id строк текущей страницы
    #[prop(into)]
    page_ids: Signal<Vec<EntityId>>,
) -> impl IntoView {
    let check_state = Signal::derive(move || page_ids.with(|ids| selection.page_check_state(ids)));

    let checkbox_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        let state = check_state.get();
        if let Some(input) = checkbox_ref.get() {
            if let Some(input_el) = input.dyn_ref::<web_sys::HtmlInputElement>() {
                input_el.set_indeterminate(state == CheckState::Indeterminate);
            }
        }
    });

    view! {
        <TableHeaderCell resizable=false class="fixed-checkbox-column">
            <input
                node_ref=checkbox_ref
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || check_state.get() == CheckState::Checked
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    selection.toggle_page(page_ids.get_untracked(), checked);
                }
            />
        </TableHeaderCell>
    }
}
