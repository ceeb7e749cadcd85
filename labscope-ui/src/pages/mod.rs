//! Pages
//!
//! Top-level page components for each route.

pub mod chat;
pub mod datasets;

pub use chat::ChatPage;
pub use datasets::DatasetsPage;
