pub mod filter_panel;
pub mod selection_bar;
pub mod table;

pub use filter_panel::{FilterPanel, FilterTag};
pub use selection_bar::SelectionBar;
