//! Модель массового выбора строк списка
//!
//! Выбор бывает двух видов:
//! - `Explicit` - явный список выбранных id;
//! - `AllExceptExcluded` - "выбраны все", кроме списка исключений.
//!
//! Второй режим позволяет выбрать коллекцию, которая больше загруженной
//! страницы: на сервер уходит только список исключений и фильтры.
//! Оба списка ограничены `capacity`. Попытка превысить лимит отклоняется
//! целиком: состояние не меняется, вызывается обработчик переполнения.

pub mod hook;

use contracts::shared::bulk_action::BulkActionRequest;
use contracts::shared::entity_id::EntityId;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

pub use hook::{use_selection, SelectionHandle};

/// Лимит размера списка выбранных / исключённых id
pub const SELECTION_CAPACITY: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode<Id> {
    Explicit { included: Vec<Id> },
    AllExceptExcluded { excluded: Vec<Id> },
}

impl<Id> Default for SelectionMode<Id> {
    fn default() -> Self {
        SelectionMode::Explicit {
            included: Vec::new(),
        }
    }
}

/// Отклонённая операция: список вырос бы до `requested` при лимите `capacity`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExceeded {
    pub capacity: usize,
    pub requested: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Можно выбрать не более {} записей (запрошено {})",
            self.capacity, self.requested
        )
    }
}

/// Состояние чекбокса в заголовке таблицы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    Indeterminate,
}

pub type OverflowHandler = Arc<dyn Fn(&CapacityExceeded) + Send + Sync>;

pub type SelectionResult = Result<(), CapacityExceeded>;

#[derive(Clone)]
pub struct SelectionModel<Id> {
    mode: SelectionMode<Id>,
    all_ids: Vec<Id>,
    capacity: usize,
    on_overflow: Option<OverflowHandler>,
}

impl<Id: fmt::Debug> fmt::Debug for SelectionModel<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("mode", &self.mode)
            .field("all_ids", &self.all_ids.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<Id: Clone + Eq> Default for SelectionModel<Id> {
    fn default() -> Self {
        Self::new(SELECTION_CAPACITY)
    }
}

impl<Id: Clone + Eq> SelectionModel<Id> {
    pub fn new(capacity: usize) -> Self {
        Self {
            mode: SelectionMode::default(),
            all_ids: Vec::new(),
            capacity,
            on_overflow: None,
        }
    }

    pub fn with_overflow_handler(
        mut self,
        handler: impl Fn(&CapacityExceeded) + Send + Sync + 'static,
    ) -> Self {
        self.on_overflow = Some(Arc::new(handler));
        self
    }

    /// Полный список id коллекции (все строки под текущими фильтрами)
    pub fn set_all_ids(&mut self, ids: Vec<Id>) {
        self.all_ids = ids;
    }

    pub fn all_ids(&self) -> &[Id] {
        &self.all_ids
    }

    pub fn mode(&self) -> &SelectionMode<Id> {
        &self.mode
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_all_selected_mode(&self) -> bool {
        matches!(self.mode, SelectionMode::AllExceptExcluded { .. })
    }

    pub fn select_all(&mut self) {
        self.mode = SelectionMode::AllExceptExcluded {
            excluded: Vec::new(),
        };
    }

    pub fn deselect_all(&mut self) {
        self.mode = SelectionMode::default();
    }

    pub fn select_one(&mut self, id: Id) -> SelectionResult {
        let capacity = self.capacity;
        let outcome = match &mut self.mode {
            SelectionMode::AllExceptExcluded { excluded } => {
                excluded.retain(|x| *x != id);
                Ok(())
            }
            SelectionMode::Explicit { included } => add_one(included, id, capacity),
        };
        self.report(outcome)
    }

    pub fn deselect_one(&mut self, id: &Id) -> SelectionResult {
        let capacity = self.capacity;
        let outcome = match &mut self.mode {
            SelectionMode::AllExceptExcluded { excluded } => {
                add_one(excluded, id.clone(), capacity)
            }
            SelectionMode::Explicit { included } => {
                included.retain(|x| x != id);
                Ok(())
            }
        };
        self.report(outcome)
    }

    /// Выбрать все строки страницы
    pub fn select_page(&mut self, ids: &[Id]) -> SelectionResult {
        let capacity = self.capacity;
        let outcome = match &mut self.mode {
            SelectionMode::AllExceptExcluded { excluded } => {
                excluded.retain(|x| !ids.contains(x));
                Ok(())
            }
            SelectionMode::Explicit { included } => add_many(included, ids, capacity),
        };
        self.report(outcome)
    }

    /// Снять выбор со всех строк страницы
    pub fn deselect_page(&mut self, ids: &[Id]) -> SelectionResult {
        let capacity = self.capacity;
        let outcome = match &mut self.mode {
            SelectionMode::AllExceptExcluded { excluded } => add_many(excluded, ids, capacity),
            SelectionMode::Explicit { included } => {
                included.retain(|x| !ids.contains(x));
                Ok(())
            }
        };
        self.report(outcome)
    }

    /// Заменить выбор известным множеством id
    pub fn set_explicit_selection(&mut self, ids: Vec<Id>) -> SelectionResult {
        let mut included: Vec<Id> = Vec::with_capacity(ids.len());
        for id in ids {
            if !included.contains(&id) {
                included.push(id);
            }
        }
        if included.len() > self.capacity {
            let exceeded = CapacityExceeded {
                capacity: self.capacity,
                requested: included.len(),
            };
            return self.report(Err(exceeded));
        }
        self.mode = SelectionMode::Explicit { included };
        Ok(())
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        match &self.mode {
            SelectionMode::Explicit { included } => included.contains(id),
            SelectionMode::AllExceptExcluded { excluded } => !excluded.contains(id),
        }
    }

    /// Фактически выбранные id
    pub fn effective_selection(&self) -> Vec<Id> {
        match &self.mode {
            SelectionMode::Explicit { included } => included.clone(),
            SelectionMode::AllExceptExcluded { excluded } => self
                .all_ids
                .iter()
                .filter(|id| !excluded.contains(id))
                .cloned()
                .collect(),
        }
    }

    /// Исключения для массовой операции в режиме "выбрать все"
    pub fn non_selected_override(&self) -> Vec<Id> {
        match &self.mode {
            SelectionMode::AllExceptExcluded { excluded } => excluded.clone(),
            SelectionMode::Explicit { .. } => Vec::new(),
        }
    }

    /// Количество выбранных при общем числе строк `total` (может быть больше загруженного)
    pub fn selected_count(&self, total: usize) -> usize {
        match &self.mode {
            SelectionMode::Explicit { included } => included.len(),
            SelectionMode::AllExceptExcluded { excluded } => total.saturating_sub(excluded.len()),
        }
    }

    pub fn page_check_state(&self, ids: &[Id]) -> CheckState {
        if ids.is_empty() {
            return CheckState::Unchecked;
        }
        let selected = ids.iter().filter(|id| self.is_selected(id)).count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == ids.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    fn report(&self, outcome: SelectionResult) -> SelectionResult {
        if let Err(exceeded) = &outcome {
            log::warn!("selection rejected: {}", exceeded);
            if let Some(handler) = &self.on_overflow {
                handler(exceeded);
            }
        }
        outcome
    }
}

impl SelectionModel<EntityId> {
    /// Тело массовой операции: явные id или исключения + фильтры
    pub fn to_bulk_request(&self, filters: Map<String, Value>) -> BulkActionRequest {
        match &self.mode {
            SelectionMode::Explicit { included } => BulkActionRequest::explicit(included.clone()),
            SelectionMode::AllExceptExcluded { excluded } => {
                BulkActionRequest::all_except(excluded.clone(), filters)
            }
        }
    }
}

fn add_one<Id: PartialEq>(set: &mut Vec<Id>, id: Id, capacity: usize) -> SelectionResult {
    if set.contains(&id) {
        return Ok(());
    }
    if set.len() >= capacity {
        return Err(CapacityExceeded {
            capacity,
            requested: set.len() + 1,
        });
    }
    set.push(id);
    Ok(())
}

fn add_many<Id: PartialEq + Clone>(
    set: &mut Vec<Id>,
    ids: &[Id],
    capacity: usize,
) -> SelectionResult {
    let mut fresh: Vec<Id> = Vec::new();
    for id in ids {
        if !set.contains(id) && !fresh.contains(id) {
            fresh.push(id.clone());
        }
    }
    let requested = set.len() + fresh.len();
    if requested > capacity {
        return Err(CapacityExceeded {
            capacity,
            requested,
        });
    }
    set.extend(fresh);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn model(all: &[i64]) -> SelectionModel<i64> {
        let mut m = SelectionModel::default();
        m.set_all_ids(all.to_vec());
        m
    }

    fn as_set(ids: Vec<i64>) -> HashSet<i64> {
        ids.into_iter().collect()
    }

    #[test]
    fn test_select_all_then_deselect_page() {
        let mut m = model(&[1, 2, 3, 4, 5]);
        m.select_all();
        m.deselect_page(&[2, 4]).unwrap();
        assert_eq!(as_set(m.effective_selection()), as_set(vec![1, 3, 5]));
        assert_eq!(as_set(m.non_selected_override()), as_set(vec![2, 4]));
    }

    #[test]
    fn test_select_all_deselect_reselect_symmetry() {
        let mut m = model(&[1, 2, 3]);
        m.select_all();
        assert!([1, 2, 3].iter().all(|id| m.is_selected(id)));
        m.deselect_one(&2).unwrap();
        assert!(!m.is_selected(&2));
        m.select_one(2).unwrap();
        assert_eq!(as_set(m.effective_selection()), as_set(vec![1, 2, 3]));
        assert!(m.non_selected_override().is_empty());
    }

    #[test]
    fn test_capacity_rejects_and_notifies_once_per_call() {
        let rejected = Arc::new(AtomicUsize::new(0));
        let counter = rejected.clone();
        let mut m = SelectionModel::<i64>::new(3).with_overflow_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for id in 0..3 {
            m.select_one(id).unwrap();
        }
        assert_eq!(m.effective_selection().len(), 3);

        let err = m.select_one(10).unwrap_err();
        assert_eq!(err, CapacityExceeded { capacity: 3, requested: 4 });
        let _ = m.select_one(11);
        assert_eq!(rejected.load(Ordering::SeqCst), 2);
        assert_eq!(m.effective_selection(), vec![0, 1, 2]);

        // re-selecting an already selected id is not an addition
        assert!(m.select_one(1).is_ok());
        assert_eq!(rejected.load(Ordering::SeqCst), 2);
    }

    fn counted(capacity: usize) -> (SelectionModel<i64>, Arc<AtomicUsize>) {
        let rejected = Arc::new(AtomicUsize::new(0));
        let counter = rejected.clone();
        let m = SelectionModel::new(capacity).with_overflow_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (m, rejected)
    }

    #[test]
    fn test_select_page_overflow_notifies_once_per_call() {
        let (mut m, rejected) = counted(3);
        m.select_page(&[1, 2]).unwrap();
        assert!(m.select_page(&[3, 4]).is_err());
        assert_eq!(rejected.load(Ordering::SeqCst), 1);
        assert!(m.select_page(&[5, 6, 7]).is_err());
        assert_eq!(rejected.load(Ordering::SeqCst), 2);
        assert_eq!(m.effective_selection(), vec![1, 2]);
    }

    #[test]
    fn test_exclusion_overflow_notifies_once_per_call() {
        let (mut m, rejected) = counted(2);
        m.set_all_ids((0..10).collect());
        m.select_all();
        m.deselect_page(&[1, 2]).unwrap();
        assert_eq!(rejected.load(Ordering::SeqCst), 0);

        assert!(m.deselect_one(&3).is_err());
        assert_eq!(rejected.load(Ordering::SeqCst), 1);
        assert!(m.deselect_page(&[4, 5]).is_err());
        assert_eq!(rejected.load(Ordering::SeqCst), 2);
        assert_eq!(m.non_selected_override(), vec![1, 2]);
        assert!(m.is_all_selected_mode());

        // already excluded ids are not additions
        assert!(m.deselect_page(&[1, 2]).is_ok());
        assert_eq!(rejected.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_select_page_over_capacity_leaves_state_unchanged() {
        let mut m = SelectionModel::<i64>::new(4);
        m.select_page(&[1, 2]).unwrap();
        let err = m.select_page(&[2, 3, 4, 5]).unwrap_err();
        assert_eq!(err.requested, 5);
        assert_eq!(m.effective_selection(), vec![1, 2]);

        m.select_page(&[2, 3, 4]).unwrap();
        assert_eq!(m.effective_selection(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_capacity_invariant_holds_for_any_sequence() {
        let mut m = SelectionModel::<i64>::new(5);
        for step in 0..50i64 {
            let _ = if step % 3 == 0 {
                m.select_page(&[step, step + 1, step + 2])
            } else {
                m.select_one(step)
            };
            assert!(m.effective_selection().len() <= 5);
        }
    }

    #[test]
    fn test_exclusions_bounded_by_capacity() {
        let mut m = SelectionModel::<i64>::new(2);
        m.set_all_ids((0..100).collect());
        m.select_all();
        m.deselect_one(&1).unwrap();
        m.deselect_one(&2).unwrap();
        assert!(m.deselect_one(&3).is_err());
        assert!(m.deselect_page(&[7, 8]).is_err());
        assert_eq!(m.non_selected_override(), vec![1, 2]);
        assert_eq!(m.selected_count(100), 98);

        // removing exclusions never hits the limit
        m.select_page(&[1, 2]).unwrap();
        assert!(m.non_selected_override().is_empty());
    }

    #[test]
    fn test_explicit_deselect_always_succeeds() {
        let mut m = model(&[1, 2, 3]);
        m.select_page(&[1, 2]).unwrap();
        m.deselect_one(&2).unwrap();
        m.deselect_one(&99).unwrap();
        assert_eq!(m.effective_selection(), vec![1]);
        assert!(m.non_selected_override().is_empty());
    }

    #[test]
    fn test_set_explicit_selection_replaces_and_dedupes() {
        let mut m = model(&[1, 2, 3]);
        m.select_all();
        m.set_explicit_selection(vec![3, 3, 1]).unwrap();
        assert!(!m.is_all_selected_mode());
        assert_eq!(m.effective_selection(), vec![3, 1]);

        let mut small = SelectionModel::<i64>::new(2);
        assert!(small.set_explicit_selection(vec![1, 2, 3]).is_err());
        assert!(small.effective_selection().is_empty());
    }

    #[test]
    fn test_deselect_all_resets() {
        let mut m = model(&[1, 2]);
        m.select_all();
        m.deselect_one(&1).unwrap();
        m.deselect_all();
        assert_eq!(m.mode(), &SelectionMode::Explicit { included: vec![] });
        assert!(m.effective_selection().is_empty());
    }

    #[test]
    fn test_page_check_state() {
        let mut m = model(&[1, 2, 3, 4]);
        assert_eq!(m.page_check_state(&[1, 2]), CheckState::Unchecked);
        m.select_one(1).unwrap();
        assert_eq!(m.page_check_state(&[1, 2]), CheckState::Indeterminate);
        m.select_one(2).unwrap();
        assert_eq!(m.page_check_state(&[1, 2]), CheckState::Checked);
        assert_eq!(m.page_check_state(&[]), CheckState::Unchecked);
    }

    #[test]
    fn test_bulk_request_shape_per_mode() {
        let mut m = SelectionModel::<EntityId>::default();
        m.select_one(EntityId::Int(7)).unwrap();
        let req = m.to_bulk_request(Map::new());
        assert!(!req.select_all);
        assert_eq!(req.ids, vec![EntityId::Int(7)]);

        m.select_all();
        m.deselect_one(&EntityId::Int(3)).unwrap();
        let mut filters = Map::new();
        filters.insert("search".into(), Value::String("acme".into()));
        let req = m.to_bulk_request(filters);
        assert!(req.select_all);
        assert!(req.ids.is_empty());
        assert_eq!(req.non_ids, vec![EntityId::Int(3)]);
        assert_eq!(req.filters.len(), 1);
    }
}
