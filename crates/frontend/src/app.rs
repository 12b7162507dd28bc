use crate::domain::a001_client::ui::list::ClientList;
use crate::domain::a002_lead::ui::list::LeadList;
use crate::domain::a003_reminder::ui::badge::{NotificationsBadge, RemindersPanel};
use crate::domain::a004_ticket::ui::list::TicketList;
use crate::domain::a005_todo::ui::widget::TodoWidget;
use crate::shared::notify::{NoticeHost, NoticeService};
use crate::shared::swr::install_focus_revalidation;
use leptos::prelude::*;
use thaw::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Clients,
    Leads,
    Tickets,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Clients,
        Section::Leads,
        Section::Tickets,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Дашборд",
            Section::Clients => "Клиенты",
            Section::Leads => "Лиды",
            Section::Tickets => "Тикеты",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Уведомления нужны хукам списков, поэтому контекст выше всех экранов
    provide_context(NoticeService::new());
    install_focus_revalidation();

    let section = RwSignal::new(Section::Clients);

    view! {
        <ConfigProvider>
            <div class="app">
                <header class="app__header">
                    <nav class="app__nav">
                        {Section::ALL
                            .iter()
                            .map(|&s| view! {
                                <button
                                    class=move || if section.get() == s { "app__nav-item app__nav-item--active" } else { "app__nav-item" }
                                    on:click=move |_| section.set(s)
                                >
                                    {s.title()}
                                </button>
                            })
                            .collect_view()}
                    </nav>
                    <NotificationsBadge />
                </header>
                <main class="app__main">
                    {move || match section.get() {
                        Section::Dashboard => view! {
                            <div class="dashboard">
                                <TodoWidget />
                                <RemindersPanel />
                            </div>
                        }.into_any(),
                        Section::Clients => view! { <ClientList /> }.into_any(),
                        Section::Leads => view! { <LeadList /> }.into_any(),
                        Section::Tickets => view! { <TicketList /> }.into_any(),
                    }}
                </main>
                <NoticeHost />
            </div>
        </ConfigProvider>
    }
}
