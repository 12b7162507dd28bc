use leptos::prelude::*;

use super::{CapacityExceeded, CheckState, SelectionModel, SelectionResult, SELECTION_CAPACITY};

/// Реактивная обёртка над [`SelectionModel`], принадлежит одному экрану
pub struct SelectionHandle<Id: Send + Sync + 'static> {
    state: RwSignal<SelectionModel<Id>>,
    on_overflow: Option<Callback<CapacityExceeded>>,
}

impl<Id: Send + Sync + 'static> Clone for SelectionHandle<Id> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id: Send + Sync + 'static> Copy for SelectionHandle<Id> {}

/// Создать состояние выбора для списка.
///
/// `all_ids` - все id коллекции под текущими фильтрами; `on_overflow`
/// вызывается при отклонении операции из-за лимита.
pub fn use_selection<Id>(
    all_ids: Signal<Vec<Id>>,
    on_overflow: Option<Callback<CapacityExceeded>>,
) -> SelectionHandle<Id>
where
    Id: Clone + Eq + Send + Sync + 'static,
{
    let state = RwSignal::new(SelectionModel::<Id>::new(SELECTION_CAPACITY));

    Effect::new(move |_| {
        let ids = all_ids.get();
        state.update(|s| s.set_all_ids(ids));
    });

    SelectionHandle { state, on_overflow }
}

impl<Id> SelectionHandle<Id>
where
    Id: Clone + Eq + Send + Sync + 'static,
{
    /// Применить операцию; обработчик переполнения вызывается вне блокировки сигнала
    fn apply(&self, op: impl FnOnce(&mut SelectionModel<Id>) -> SelectionResult) -> bool {
        match self.state.try_update(op) {
            Some(Err(exceeded)) => {
                if let Some(callback) = self.on_overflow {
                    callback.run(exceeded);
                }
                false
            }
            Some(Ok(())) => true,
            None => false,
        }
    }

    pub fn select_all(&self) {
        self.state.update(|s| s.select_all());
    }

    pub fn deselect_all(&self) {
        self.state.update(|s| s.deselect_all());
    }

    pub fn select_one(&self, id: Id) -> bool {
        self.apply(move |s| s.select_one(id))
    }

    pub fn deselect_one(&self, id: Id) -> bool {
        self.apply(move |s| s.deselect_one(&id))
    }

    /// Обработчик чекбокса строки
    pub fn toggle(&self, id: Id, checked: bool) -> bool {
        if checked {
            self.select_one(id)
        } else {
            self.deselect_one(id)
        }
    }

    pub fn select_page(&self, ids: Vec<Id>) -> bool {
        self.apply(move |s| s.select_page(&ids))
    }

    pub fn deselect_page(&self, ids: Vec<Id>) -> bool {
        self.apply(move |s| s.deselect_page(&ids))
    }

    /// Обработчик чекбокса в заголовке
    pub fn toggle_page(&self, ids: Vec<Id>, checked: bool) -> bool {
        if checked {
            self.select_page(ids)
        } else {
            self.deselect_page(ids)
        }
    }

    pub fn set_explicit_selection(&self, ids: Vec<Id>) -> bool {
        self.apply(move |s| s.set_explicit_selection(ids))
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.state.with(|s| s.is_selected(id))
    }

    pub fn is_all_selected_mode(&self) -> bool {
        self.state.with(|s| s.is_all_selected_mode())
    }

    pub fn effective_selection(&self) -> Vec<Id> {
        self.state.with(|s| s.effective_selection())
    }

    pub fn non_selected_override(&self) -> Vec<Id> {
        self.state.with(|s| s.non_selected_override())
    }

    pub fn selected_count(&self, total: usize) -> usize {
        self.state.with(|s| s.selected_count(total))
    }

    pub fn page_check_state(&self, ids: &[Id]) -> CheckState {
        self.state.with(|s| s.page_check_state(ids))
    }

    /// Снимок модели для построения запроса массовой операции
    pub fn model(&self) -> SelectionModel<Id> {
        self.state.get_untracked()
    }
}
