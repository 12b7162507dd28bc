//! Всплывающие уведомления (лимит выбора, ошибки загрузки)
//!
//! Сервис кладётся в контекст в `App`, `NoticeHost` рисует стек сообщений.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const NOTICE_TTL_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Clone, Copy)]
pub struct NoticeService {
    notices: RwSignal<Vec<Notice>>,
    next_id: RwSignal<u64>,
}

impl NoticeService {
    pub fn new() -> Self {
        Self {
            notices: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    pub fn push(&self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            NoticeLevel::Error => log::error!("{}", text),
            NoticeLevel::Warning => log::warn!("{}", text),
            NoticeLevel::Info => log::info!("{}", text),
        }

        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.notices.update(|n| n.push(Notice { id, level, text }));

        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(NOTICE_TTL_MS).await;
            svc.dismiss(id);
        });
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.push(NoticeLevel::Warning, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text);
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|n| n.retain(|x| x.id != id));
    }
}

impl Default for NoticeService {
    fn default() -> Self {
        Self::new()
    }
}

/// Сервис из контекста; вне `App` (например, в тестах) его нет
pub fn use_notices() -> Option<NoticeService> {
    use_context::<NoticeService>()
}

#[component]
pub fn NoticeHost() -> impl IntoView {
    let svc = use_notices().expect("NoticeService should be provided");

    view! {
        <div class="notice-stack">
            <For
                each=move || svc.notices.get()
                key=|n| n.id
                children=move |n| {
                    let intent = match n.level {
                        NoticeLevel::Info => MessageBarIntent::Info,
                        NoticeLevel::Warning => MessageBarIntent::Warning,
                        NoticeLevel::Error => MessageBarIntent::Error,
                    };
                    let id = n.id;
                    view! {
                        <div class="notice-stack__item" on:click=move |_| svc.dismiss(id)>
                            <MessageBar intent=intent>
                                <span>{n.text}</span>
                            </MessageBar>
                        </div>
                    }
                }
            />
        </div>
    }
}
