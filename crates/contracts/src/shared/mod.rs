pub mod bulk_action;
pub mod entity_id;
pub mod filters;
pub mod list;
