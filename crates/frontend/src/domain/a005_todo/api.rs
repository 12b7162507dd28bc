use contracts::domain::a005_todo::aggregate::{Todo, TODOS_FIELD};
use contracts::shared::entity_id::EntityId;
use leptos::prelude::*;
use serde_json::Value;

use crate::shared::swr::{
    global_cache, invalidate_matching, post_json, use_resource, CollectionField, FetchError, Key,
    Page, ResourceHandle, SwrOptions,
};

pub const TODOS_PATH: &str = "/api/todos";

pub const TODOS: CollectionField<Todo> = CollectionField::new(TODOS_FIELD);

/// Список дел дашборда. Ошибка загрузки показывается уведомлением.
pub fn use_get_todo_list() -> ResourceHandle<Page<Todo>> {
    use_resource(
        Signal::derive(|| Some(Key::new(TODOS_PATH))),
        SwrOptions::default().with_error_notifications(),
        move |state| TODOS.view(state),
    )
}

/// Отметить задачу выполненной: сначала локально, затем на сервере
pub async fn complete_todo(id: EntityId) -> Result<(), FetchError> {
    let key = Key::new(TODOS_PATH);
    let cache = global_cache();
    if let Some(raw) = cache.snapshot(&key).data {
        cache.set_data(&key, mark_done(&raw, &id));
    }

    let url = format!("{}/{}/complete", TODOS_PATH, id);
    let result = post_json::<_, Value>(&url, &Value::Null).await;
    // при ошибке локальная правка откатится ответом сервера
    invalidate_matching(TODOS_PATH);
    result.map(|_| ())
}

/// Копия ответа, в которой задача `id` отмечена выполненной
fn mark_done(raw: &Value, id: &EntityId) -> Value {
    let mut next = raw.clone();
    if let Some(items) = next.get_mut(TODOS_FIELD).and_then(Value::as_array_mut) {
        for item in items {
            let matches = item
                .get("id")
                .and_then(|v| serde_json::from_value::<EntityId>(v.clone()).ok())
                .is_some_and(|item_id| &item_id == id);
            if matches {
                item["is_done"] = Value::Bool(true);
            }
        }
    }
    next
}
