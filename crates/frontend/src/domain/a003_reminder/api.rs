//! Напоминания и уведомления приходят одним ответом
//! `{ reminders: [...], notifications: [...] }`, поэтому оба хука
//! подписываются на один ключ и делят один запрос.

use contracts::domain::a003_reminder::aggregate::{
    Notification, Reminder, NOTIFICATIONS_FIELD, REMINDERS_FIELD,
};
use leptos::prelude::*;

use crate::shared::swr::{use_resource, CollectionField, Key, Page, ResourceHandle, SwrOptions};

pub const REMINDERS_PATH: &str = "/api/reminders";

/// Период опроса для счётчиков в шапке
pub const BADGE_REFRESH_MS: u32 = 30_000;

pub const REMINDERS: CollectionField<Reminder> = CollectionField::new(REMINDERS_FIELD);
pub const NOTIFICATIONS: CollectionField<Notification> = CollectionField::new(NOTIFICATIONS_FIELD);

fn badge_options() -> SwrOptions {
    SwrOptions::default()
        .with_refresh_interval(BADGE_REFRESH_MS)
        .with_focus_revalidation()
}

fn reminders_key() -> Signal<Option<Key>> {
    Signal::derive(|| Some(Key::new(REMINDERS_PATH)))
}

pub fn use_get_reminders() -> ResourceHandle<Page<Reminder>> {
    use_resource(reminders_key(), badge_options(), move |state| REMINDERS.view(state))
}

pub fn use_get_notifications() -> ResourceHandle<Page<Notification>> {
    use_resource(reminders_key(), badge_options(), move |state| {
        NOTIFICATIONS.view(state)
    })
}

/// Число непрочитанных уведомлений для бейджа
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

/// Открытые напоминания (без выполненных)
pub fn pending_reminders(reminders: &[Reminder]) -> Vec<Reminder> {
    reminders.iter().filter(|r| !r.is_done).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::swr::EntryState;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_both_collections_from_one_payload() {
        let state = EntryState {
            data: Some(Arc::new(json!({
                "reminders": [{ "id": 1, "title": "Позвонить", "is_done": false },
                              { "id": 2, "title": "Отправить КП", "is_done": true }],
                "notifications": [{ "id": "n1", "message": "Новый лид", "is_read": false }]
            }))),
            error: None,
            is_validating: false,
        };

        let reminders = REMINDERS.view(&state).data.unwrap().items;
        let notifications = NOTIFICATIONS.view(&state).data.unwrap().items;
        assert_eq!(pending_reminders(&reminders).len(), 1);
        assert_eq!(unread_count(&notifications), 1);
    }

    #[test]
    fn test_missing_field_is_empty() {
        let state = EntryState {
            data: Some(Arc::new(json!({ "reminders": [] }))),
            error: None,
            is_validating: false,
        };
        let view = NOTIFICATIONS.view(&state);
        assert!(view.empty);
        assert!(view.data.unwrap().items.is_empty());
    }
}
