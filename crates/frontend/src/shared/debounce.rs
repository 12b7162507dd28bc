//! Debounce для полей ввода (поиск), реализованный через поколения:
//! каждый новый ввод заменяет ожидающее значение, срабатывает только
//! последний таймер.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Задержка поиска по умолчанию
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<T>,
    generation: u64,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T) -> Self {
        Self {
            settled: initial,
            pending: None,
            generation: 0,
        }
    }

    /// Новый ввод; возвращает билет таймера, который должен его применить
    pub fn input(&mut self, value: T) -> u64 {
        self.generation += 1;
        self.pending = Some(value);
        self.generation
    }

    /// Срабатывание таймера. Устаревший билет игнорируется; значение
    /// возвращается только если оно отличается от уже применённого.
    pub fn fire(&mut self, ticket: u64) -> Option<T> {
        if ticket != self.generation {
            return None;
        }
        let value = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }

    /// Применить значение сразу, отменив ожидающее
    pub fn reset(&mut self, value: T) {
        self.generation += 1;
        self.pending = None;
        self.settled = value;
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }
}

/// Debounced-копия строкового сигнала; `reset` применяет значение
/// немедленно, отменяя ожидающий таймер
pub struct DebouncedSignal {
    output: RwSignal<String>,
    state: StoredValue<Debounced<String>>,
    timer: StoredValue<Option<Timeout>, LocalStorage>,
}

impl Clone for DebouncedSignal {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for DebouncedSignal {}

impl DebouncedSignal {
    fn new(initial: String) -> Self {
        Self {
            output: RwSignal::new(initial.clone()),
            state: StoredValue::new(Debounced::new(initial)),
            timer: StoredValue::new_local(None),
        }
    }

    pub fn get(&self) -> String {
        self.output.get()
    }

    pub fn reset(&self, value: String) {
        self.timer.set_value(None);
        self.state.update_value(|d| d.reset(value.clone()));
        self.output.set(value);
    }

    fn input(&self, value: String) -> u64 {
        let mut ticket = 0;
        self.state.update_value(|d| ticket = d.input(value));
        ticket
    }

    fn fire(&self, ticket: u64) {
        let mut fired = None;
        self.state.update_value(|d| fired = d.fire(ticket));
        if let Some(value) = fired {
            self.output.set(value);
        }
    }
}

/// Сигнал, повторяющий `source` после `delay_ms` тишины
pub fn use_debounced(source: Signal<String>, delay_ms: u32) -> DebouncedSignal {
    let debounced = DebouncedSignal::new(source.get_untracked());

    Effect::new(move |_| {
        let ticket = debounced.input(source.get());
        // предыдущий Timeout отменяется при замене
        debounced
            .timer
            .set_value(Some(Timeout::new(delay_ms, move || debounced.fire(ticket))));
    });

    on_cleanup(move || debounced.timer.set_value(None));

    debounced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_coalesces_to_last_value() {
        let mut d = Debounced::new(String::new());
        let t1 = d.input("a".to_string());
        let t2 = d.input("ac".to_string());
        let t3 = d.input("acm".to_string());

        assert_eq!(d.fire(t1), None);
        assert_eq!(d.fire(t2), None);
        assert_eq!(d.fire(t3), Some("acm".to_string()));
        assert_eq!(d.settled(), "acm");
    }

    #[test]
    fn test_unchanged_value_does_not_fire() {
        let mut d = Debounced::new("acme".to_string());
        let t = d.input("acme".to_string());
        assert_eq!(d.fire(t), None);
    }

    #[test]
    fn test_reset_cancels_pending() {
        let mut d = Debounced::new(String::new());
        let t = d.input("abc".to_string());
        d.reset(String::new());
        assert_eq!(d.fire(t), None);
        assert_eq!(d.settled(), "");
    }

    #[test]
    fn test_same_ticket_fires_once() {
        let mut d = Debounced::new(0);
        let t = d.input(5);
        assert_eq!(d.fire(t), Some(5));
        assert_eq!(d.fire(t), None);
    }

    #[test]
    fn test_signal_reset_drops_pending_input() {
        let owner = Owner::new();
        owner.with(|| {
            let debounced = DebouncedSignal::new("acme".to_string());
            let ticket = debounced.input("acme corp".to_string());
            debounced.reset(String::new());
            assert_eq!(debounced.output.get_untracked(), "");

            // таймер, переживший очистку, ничего не применяет
            debounced.fire(ticket);
            assert_eq!(debounced.output.get_untracked(), "");

            let ticket = debounced.input("beta".to_string());
            debounced.fire(ticket);
            assert_eq!(debounced.output.get_untracked(), "beta");
        });
    }
}
