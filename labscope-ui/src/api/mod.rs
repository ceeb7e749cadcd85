//! Browser API Layer
//!
//! Fetches for the dataset sheet and the chat backend.

pub mod client;

pub use client::{fetch_dataset_csv, get_api_base, reset_session, DomMirror, GlooChatTransport};
