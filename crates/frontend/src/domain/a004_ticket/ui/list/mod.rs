use crate::domain::a004_ticket::api::{send_message, use_get_ticket_messages, use_get_tickets};
use crate::shared::notify::use_notices;
use contracts::domain::a004_ticket::aggregate::{Ticket, TicketMessage};
use contracts::shared::entity_id::EntityId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Тикеты поддержки: список слева, чат выбранного тикета справа
#[component]
pub fn TicketList() -> impl IntoView {
    let notices = use_notices();
    let status = RwSignal::new(None::<String>);
    let active = RwSignal::new(None::<EntityId>);
    let draft = RwSignal::new(String::new());

    let tickets = use_get_tickets(status.into());
    let messages = use_get_ticket_messages(active.into());
    let rows = Signal::derive(move || tickets.data().map(|p| p.items).unwrap_or_default());
    let chat = Signal::derive(move || messages.data().map(|p| p.items).unwrap_or_default());

    let send = move |_| {
        let body = draft.get_untracked().trim().to_string();
        let Some(ticket_id) = active.get_untracked() else {
            return;
        };
        if body.is_empty() {
            return;
        }
        spawn_local(async move {
            match send_message(&ticket_id, body).await {
                Ok(_) => draft.set(String::new()),
                Err(e) => {
                    if let Some(n) = notices {
                        n.error(format!("Сообщение не отправлено: {}", e));
                    }
                }
            }
        });
    };

    view! {
        <div class="page page--split">
            <div class="page__column">
                <div class="page__header">
                    <h1 class="page__title">"Тикеты"</h1>
                    <select
                        class="filter-panel__input"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            status.set((!value.is_empty()).then_some(value));
                        }
                    >
                        <option value="">"Все"</option>
                        <option value="open">"Открытые"</option>
                        <option value="closed">"Закрытые"</option>
                    </select>
                </div>
                <ul class="ticket-list">
                    <For
                        each=move || rows.get()
                        key=|t: &Ticket| (t.id.clone(), t.unread_count)
                        children=move |t: Ticket| {
                            let id = t.id.clone();
                            let id_for_class = t.id.clone();
                            let unread = t.unread_count;
                            view! {
                                <li
                                    class=move || {
                                        if active.with(|a| a.as_ref() == Some(&id_for_class)) {
                                            "ticket-list__item ticket-list__item--active"
                                        } else {
                                            "ticket-list__item"
                                        }
                                    }
                                    on:click=move |_| active.set(Some(id.clone()))
                                >
                                    <span>{t.subject}</span>
                                    <Show when=move || { unread > 0 }>
                                        <span class="badge badge--primary">{unread}</span>
                                    </Show>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>

            <div class="page__column page__column--wide">
                <Show
                    when=move || active.with(Option::is_some)
                    fallback=|| view! { <div class="table__placeholder">"Выберите тикет"</div> }
                >
                    <div class="chat">
                        <Show when=move || messages.is_loading()>
                            <div class="table__placeholder">"Загрузка..."</div>
                        </Show>
                        <For
                            each=move || chat.get()
                            key=|m: &TicketMessage| m.id.clone()
                            children=|m: TicketMessage| {
                                let sent = m
                                    .sent_at
                                    .map(|d| d.format("%d.%m %H:%M").to_string())
                                    .unwrap_or_default();
                                view! {
                                    <div class="chat__message">
                                        <div class="chat__meta">{m.author}" · "{sent}</div>
                                        <div class="chat__body">{m.body}</div>
                                    </div>
                                }
                            }
                        />
                        <div class="chat__composer">
                            <textarea
                                class="chat__input"
                                prop:value=move || draft.get()
                                on:input=move |ev| draft.set(event_target_value(&ev))
                            />
                            <Button appearance=ButtonAppearance::Primary on_click=send>
                                "Отправить"
                            </Button>
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}
