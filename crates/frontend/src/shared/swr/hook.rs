//! Leptos binding of the cache: one `use_resource` call per screen/resource.

use futures::FutureExt;
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::cache::{EntryState, SharedFetch, Subscription, SwrCache};
use super::fetcher::HttpFetcher;
use super::key::Key;
use super::options::SwrOptions;
use super::projection::ResourceView;
use crate::shared::notify::use_notices;

thread_local! {
    static GLOBAL_CACHE: SwrCache = SwrCache::new(HttpFetcher);
}

/// The application-wide cache backed by the HTTP API
pub fn global_cache() -> SwrCache {
    GLOBAL_CACHE.with(Clone::clone)
}

fn drive(fetch: SharedFetch) {
    spawn_local(fetch.map(|_| ()));
}

/// Revalidate opted-in keys whenever the window regains focus
pub fn install_focus_revalidation() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        for fetch in global_cache().revalidate_on_focus() {
            drive(fetch);
        }
    }) as Box<dyn Fn()>);
    if window
        .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("swr: failed to install focus listener");
    }
    closure.forget();
}

/// Refresh every cached key under `path_prefix` after a write
pub fn invalidate_matching(path_prefix: &str) {
    for fetch in global_cache().invalidate_matching(path_prefix) {
        drive(fetch);
    }
}

/// Reactive handle returned by [`use_resource`]
pub struct ResourceHandle<T: Send + Sync + 'static> {
    view: RwSignal<ResourceView<T>>,
    key: Signal<Option<Key>>,
}

impl<T: Send + Sync + 'static> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ResourceHandle<T> {}

impl<T: Clone + Send + Sync + 'static> ResourceHandle<T> {
    pub fn view(&self) -> ResourceView<T> {
        self.view.get()
    }

    pub fn data(&self) -> Option<T> {
        self.view.with(|v| v.data.clone())
    }

    pub fn error(&self) -> Option<String> {
        self.view.with(|v| v.error.as_ref().map(ToString::to_string))
    }

    pub fn is_loading(&self) -> bool {
        self.view.with(|v| v.is_loading)
    }

    pub fn is_validating(&self) -> bool {
        self.view.with(|v| v.is_validating)
    }

    pub fn empty(&self) -> bool {
        self.view.with(|v| v.empty)
    }

    /// Force revalidation of the current key
    pub fn mutate(&self) {
        if let Some(key) = self.key.get_untracked() {
            drive(global_cache().mutate(&key));
        }
    }
}

/// Subscribe a screen to `key` (`None` disables fetching).
///
/// `project` turns the raw entry into the typed view, usually
/// [`super::CollectionField::view`].
pub fn use_resource<T>(
    key: Signal<Option<Key>>,
    options: SwrOptions,
    project: impl Fn(&EntryState) -> ResourceView<T> + Clone + 'static,
) -> ResourceHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    let view = RwSignal::new(ResourceView::<T>::default());
    let subscription = StoredValue::new_local(None::<Subscription>);
    let poller = StoredValue::new_local(None::<Interval>);
    let notices = use_notices();

    Effect::new(move |_| {
        let next_key = key.get();
        subscription.set_value(None);
        poller.set_value(None);

        let Some(key) = next_key else {
            view.set(ResourceView::default());
            return;
        };

        let cache = global_cache();
        let project = project.clone();
        let apply = move |state: &EntryState| {
            let next = project(state);
            let mut new_error = None;
            view.update(|current| {
                if next.error.is_some() && next.error != current.error {
                    new_error = next.error.clone();
                }
                *current = if options.keep_previous_data {
                    next.keep_previous(current)
                } else {
                    next
                };
            });
            if options.notify_errors {
                if let (Some(error), Some(notices)) = (new_error, notices) {
                    notices.error(format!("Ошибка загрузки: {}", error));
                }
            }
        };

        apply(&cache.snapshot(&key));
        subscription.set_value(Some(cache.subscribe(&key, options, apply)));
        drive(cache.revalidate(&key));

        if let Some(ms) = options.refresh_interval_ms {
            poller.set_value(Some(Interval::new(ms, move || {
                if let Some(fetch) = cache.poll(&key) {
                    drive(fetch);
                }
            })));
        }
    });

    on_cleanup(move || {
        subscription.set_value(None);
        poller.set_value(None);
    });

    ResourceHandle { view, key }
}
