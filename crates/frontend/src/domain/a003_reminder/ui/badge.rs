use crate::domain::a003_reminder::api::{
    pending_reminders, unread_count, use_get_notifications, use_get_reminders,
};
use contracts::domain::a003_reminder::aggregate::Reminder;
use leptos::prelude::*;

/// Колокольчик в шапке со счётчиком непрочитанных
#[component]
pub fn NotificationsBadge() -> impl IntoView {
    let notifications = use_get_notifications();
    let unread = Signal::derive(move || {
        notifications
            .data()
            .map(|p| unread_count(&p.items))
            .unwrap_or(0)
    });

    view! {
        <span class="notifications-badge" title="Уведомления">
            "🔔"
            <Show when=move || { unread.get() > 0 }>
                <span class="badge badge--danger">{move || unread.get().to_string()}</span>
            </Show>
        </span>
    }
}

/// Открытые напоминания для дашборда
#[component]
pub fn RemindersPanel() -> impl IntoView {
    let reminders = use_get_reminders();
    let pending = Signal::derive(move || {
        reminders
            .data()
            .map(|p| pending_reminders(&p.items))
            .unwrap_or_default()
    });

    view! {
        <div class="card">
            <h3 class="card__title">"Напоминания"</h3>
            <Show
                when=move || !pending.with(|p| p.is_empty())
                fallback=|| view! { <div class="card__empty">"Напоминаний нет"</div> }
            >
                <ul class="card__list">
                    <For
                        each=move || pending.get()
                        key=|r: &Reminder| r.id.clone()
                        children=|r: Reminder| {
                            let when = r
                                .remind_at
                                .map(|d| d.format("%d.%m %H:%M").to_string())
                                .unwrap_or_default();
                            view! { <li><span class="card__muted">{when}</span>" "{r.title}</li> }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}
