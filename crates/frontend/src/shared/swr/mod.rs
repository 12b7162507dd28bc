//! Remote collection cache (stale-while-revalidate)

pub mod cache;
pub mod fetcher;
pub mod hook;
pub mod key;
pub mod options;
pub mod projection;

pub use cache::{Clock, EntryState, FetchStatus, SharedFetch, Subscription, SwrCache, SystemClock};
pub use fetcher::{post_json, FetchError, Fetcher, HttpFetcher};
pub use hook::{
    global_cache, install_focus_revalidation, invalidate_matching, use_resource, ResourceHandle,
};
pub use key::{Key, ParamValue, QueryParams};
pub use options::SwrOptions;
pub use projection::{CollectionField, Page, ResourceView};
