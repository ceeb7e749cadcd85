//! UI Components
//!
//! Reusable Leptos components for the chat widget and the dataset browser.

pub mod chat_input;
pub mod data_table;
pub mod drawing_surface;
pub mod filter_panel;
pub mod loading;
pub mod nav;
pub mod tech_tabs;
pub mod transcript;

pub use chat_input::ChatInput;
pub use data_table::DataTable;
pub use drawing_surface::DrawingSurface;
pub use filter_panel::FilterPanel;
pub use loading::TableSkeleton;
pub use nav::Nav;
pub use tech_tabs::TechTabs;
pub use transcript::TranscriptView;
