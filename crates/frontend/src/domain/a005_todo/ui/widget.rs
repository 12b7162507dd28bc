use crate::domain::a005_todo::api::{complete_todo, use_get_todo_list};
use crate::shared::notify::use_notices;
use contracts::domain::a005_todo::aggregate::Todo;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Список дел на дашборде
#[component]
pub fn TodoWidget() -> impl IntoView {
    let todos = use_get_todo_list();
    let notices = use_notices();
    let items = Signal::derive(move || todos.data().map(|p| p.items).unwrap_or_default());

    let complete = move |todo: Todo| {
        spawn_local(async move {
            if let Err(e) = complete_todo(todo.id).await {
                if let Some(n) = notices {
                    n.error(format!("Не удалось обновить задачу: {}", e));
                }
            }
        });
    };

    view! {
        <div class="card">
            <h3 class="card__title">"Задачи"</h3>
            <Show when=move || todos.is_loading()>
                <div class="card__empty">"Загрузка..."</div>
            </Show>
            <Show when=move || todos.empty() && !todos.is_loading()>
                <div class="card__empty">"Задач нет"</div>
            </Show>
            <ul class="card__list">
                <For
                    each=move || items.get()
                    key=|t: &Todo| (t.id.clone(), t.is_done)
                    children=move |todo: Todo| {
                        let is_done = todo.is_done;
                        let due = todo
                            .due_date
                            .map(|d| d.format("%d.%m.%Y").to_string())
                            .unwrap_or_default();
                        let text = todo.text.clone();
                        view! {
                            <li class=if is_done { "todo todo--done" } else { "todo" }>
                                <input
                                    type="checkbox"
                                    prop:checked=is_done
                                    disabled=is_done
                                    on:change=move |_| complete(todo.clone())
                                />
                                " "{text}
                                <span class="card__muted">" "{due}</span>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}
