use contracts::domain::a004_ticket::aggregate::{
    Ticket, TicketMessage, MESSAGES_FIELD, TICKETS_FIELD,
};
use contracts::shared::entity_id::EntityId;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::swr::{
    invalidate_matching, post_json, use_resource, CollectionField, FetchError, Key, Page,
    QueryParams, ResourceHandle, SwrOptions,
};

pub const TICKETS_PATH: &str = "/api/tickets";

/// Чат открытого тикета опрашивается чаще списка
pub const CHAT_REFRESH_MS: u32 = 5_000;
pub const TICKETS_REFRESH_MS: u32 = 60_000;

pub const TICKETS: CollectionField<Ticket> = CollectionField::new(TICKETS_FIELD);
pub const MESSAGES: CollectionField<TicketMessage> = CollectionField::new(MESSAGES_FIELD);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub body: String,
}

pub fn tickets_key(status: Option<&str>) -> Key {
    Key::with_params(
        TICKETS_PATH,
        QueryParams::new().with("status", status.map(str::to_string)),
    )
}

pub fn messages_path(ticket_id: &EntityId) -> String {
    format!("{}/{}/messages", TICKETS_PATH, urlencoding::encode(&ticket_id.as_string()))
}

pub fn use_get_tickets(status: Signal<Option<String>>) -> ResourceHandle<Page<Ticket>> {
    let key = Signal::derive(move || Some(status.with(|s| tickets_key(s.as_deref()))));
    use_resource(
        key,
        SwrOptions::default().with_refresh_interval(TICKETS_REFRESH_MS),
        move |state| TICKETS.view(state),
    )
}

/// Сообщения тикета; без выбранного тикета запрос не выполняется.
///
/// При переключении тикета старые сообщения не показываются.
pub fn use_get_ticket_messages(
    ticket_id: Signal<Option<EntityId>>,
) -> ResourceHandle<Page<TicketMessage>> {
    let key = Signal::derive(move || {
        ticket_id.with(|id| id.as_ref().map(|id| Key::new(messages_path(id))))
    });
    use_resource(
        key,
        SwrOptions::default()
            .with_refresh_interval(CHAT_REFRESH_MS)
            .without_previous_data(),
        move |state| MESSAGES.view(state),
    )
}

pub async fn send_message(ticket_id: &EntityId, body: String) -> Result<TicketMessage, FetchError> {
    let message = post_json(&messages_path(ticket_id), &NewMessage { body }).await?;
    // список тикетов тоже меняется: счётчик непрочитанных, updated_at
    invalidate_matching(TICKETS_PATH);
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_path_encodes_string_ids() {
        assert_eq!(messages_path(&EntityId::Int(7)), "/api/tickets/7/messages");
        assert_eq!(
            messages_path(&EntityId::from("a b")),
            "/api/tickets/a%20b/messages"
        );
    }

    #[test]
    fn test_tickets_key_without_status() {
        assert_eq!(tickets_key(None).url(), "/api/tickets");
        assert_eq!(tickets_key(Some("open")).url(), "/api/tickets?status=open");
    }
}
