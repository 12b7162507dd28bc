//! Typed views over raw cache entries.
//!
//! Each resource hook pulls one nested field out of the raw response and
//! falls back to an empty collection, so screens never see a missing list.

use contracts::shared::list::{extract_collection, extract_total_count};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

use super::cache::EntryState;
use super::fetcher::FetchError;

/// What a screen sees for one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceView<T> {
    /// `None` until the first successful response
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub is_loading: bool,
    pub is_validating: bool,
    /// Not loading and the normalized collection is absent or zero-length
    pub empty: bool,
}

impl<T> Default for ResourceView<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_validating: false,
            empty: true,
        }
    }
}

impl<T: Clone> ResourceView<T> {
    pub fn from_state(
        state: &EntryState,
        extract: impl Fn(&Value) -> T,
        len: impl Fn(&T) -> usize,
    ) -> Self {
        let is_loading = state.is_loading();
        let data = state.data.as_deref().map(extract);
        let size = data.as_ref().map(len).unwrap_or(0);
        Self {
            data,
            error: state.error.clone(),
            is_loading,
            is_validating: state.is_validating,
            empty: !is_loading && size == 0,
        }
    }

    /// Carry the previous key's data over while the new key has none yet
    pub fn keep_previous(self, previous: &ResourceView<T>) -> Self {
        if self.data.is_some() || previous.data.is_none() {
            return self;
        }
        Self {
            data: previous.data.clone(),
            empty: previous.empty,
            ..self
        }
    }
}

/// One page of a paginated collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

/// Name of the response field wrapping a collection
pub struct CollectionField<T> {
    field: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CollectionField<T> {}

impl<T: DeserializeOwned + Clone> CollectionField<T> {
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            _marker: PhantomData,
        }
    }

    pub fn extract(&self, raw: &Value) -> Page<T> {
        Page {
            items: extract_collection(raw, self.field),
            total_count: extract_total_count(raw, self.field),
        }
    }

    pub fn view(&self, state: &EntryState) -> ResourceView<Page<T>> {
        ResourceView::from_state(state, |raw| self.extract(raw), |page| page.items.len())
    }
}
