/// Утилиты для списков: поиск с debounce, индикаторы сортировки
use leptos::prelude::*;

use crate::shared::debounce::{use_debounced, SEARCH_DEBOUNCE_MS};

/// Компонент поиска с debounce и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Применённое значение (для подсветки активного фильтра)
    #[prop(into)]
    value: Signal<String>,
    /// Вызывается после паузы ввода или при очистке
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск...".to_string()
    } else {
        placeholder
    };

    // Локальное состояние input (до debounce)
    let input_value = RwSignal::new(value.get_untracked());
    let debounced = use_debounced(input_value.into(), SEARCH_DEBOUNCE_MS);
    let last_emitted = StoredValue::new(value.get_untracked());

    let emit = move |text: String| {
        if last_emitted.get_value() != text {
            last_emitted.set_value(text.clone());
            on_change.run(text);
        }
    };

    Effect::new(move |_| {
        emit(debounced.get());
    });

    let is_filter_active = move || !value.get().trim().is_empty();

    let clear_filter = move |_| {
        input_value.set(String::new());
        debounced.reset(String::new());
        emit(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class=move || if is_filter_active() { "search-input__field search-input__field--active" } else { "search-input__field" }
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| input_value.set(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Очистить">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending { " ▲" } else { " ▼" }
    } else {
        " ⇅"
    }
}
