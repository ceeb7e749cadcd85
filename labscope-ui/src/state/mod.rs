//! State Management
//!
//! Reactive state for the chat widget and the dataset browser.

pub mod chat;
pub mod datasets;
pub mod overlays;

pub use chat::{provide_chat_state, ChatState};
pub use datasets::{provide_dataset_state, DatasetState};
pub use overlays::BubbleOverlays;
