pub mod api_utils;
pub mod components;
pub mod debounce;
pub mod filters;
pub mod icons;
pub mod list_utils;
pub mod notify;
pub mod selection;
pub mod swr;
