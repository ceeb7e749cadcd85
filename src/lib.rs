//! # Labscope
//!
//! Image annotation chat and dataset browser for a spatial omics lab.
//!
//! ## Features
//!
//! - **Annotation chat**: draw a region on a tissue image and discuss it with
//!   a vision model behind the lab backend
//! - **Graceful offline mode**: failed requests turn into a local echo reply
//! - **Dataset browser**: the lab's published dataset sheet as a filterable table
//!
//! ## Modules
//!
//! - [`annotation`]: shapes, drawing gestures and the pan/zoom viewport
//! - [`chat`]: transcript, request pipeline, session mirror and effects
//! - [`dataset`]: CSV loading, facets, filtering and table rendering
//! - [`config`]: TOML config with environment overrides
//!
//! The `native` feature (on by default) adds the reqwest/tokio transport and
//! timers used by the `labscope` binary. The browser front-end builds this
//! crate without it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labscope::chat::{ChatPipeline, HttpChatClient, MirrorReader, StaticMirror};
//! use labscope::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = HttpChatClient::new(&config.chat)?;
//!     let mirror = MirrorReader::new(StaticMirror::with_session("a1b2c3d4"));
//!
//!     let dots = labscope::chat::spawn_ticker(
//!         std::time::Duration::from_millis(400),
//!         || std::ops::ControlFlow::Continue(()),
//!     );
//!     let reply = ChatPipeline::from_config(&config.chat)
//!         .respond(&client, "What tissue is this?", &mirror, dots)
//!         .await;
//!
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod chat;
pub mod config;
pub mod dataset;

// Re-export top-level types for convenience
pub use annotation::{DrawTool, DrawnShape, Gesture, Point, ShapeCollection, Viewport};

pub use chat::{
    ChatError, ChatMessage, ChatOutcome, ChatPipeline, ChatReply, ChatRequest, ChatResponse,
    ChatTransport, MirrorReader, MirrorSource, Sender, SessionContext, Transcript,
};

pub use dataset::{
    apply_filters, DatasetError, DatasetRow, Facets, FilterState, TableCell, TABLE_COLUMNS,
};

pub use config::{ChatConfig, Config, ConfigError, DatasetConfig, LoggingConfig, ViewerConfig};
