//! Session & ROI Mirror
//!
//! Session id and selected ROI image paths are owned by the host page. They
//! arrive as JSON text; every read re-parses the latest payload and falls
//! back to defaults instead of failing.

use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// Element id carrying the session payload
pub const SESSION_MIRROR_ID: &str = "session-id-mirror";
/// Element id carrying the ROI payload
pub const ROI_MIRROR_ID: &str = "roi-data-mirror";
/// Attribute holding the serialized state
pub const MIRROR_ATTRIBUTE: &str = "data-dash-store";
/// Session id used when none can be read
pub const DEFAULT_SESSION_ID: &str = "default";

/// Session the chat is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub session_id: String,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }
}

/// Raw payload provider for the mirrored state
pub trait MirrorSource {
    fn session_payload(&self) -> Option<String>;
    fn roi_payload(&self) -> Option<String>;
}

impl<S: MirrorSource + ?Sized> MirrorSource for &S {
    fn session_payload(&self) -> Option<String> {
        (**self).session_payload()
    }

    fn roi_payload(&self) -> Option<String> {
        (**self).roi_payload()
    }
}

impl<S: MirrorSource + ?Sized> MirrorSource for Arc<S> {
    fn session_payload(&self) -> Option<String> {
        (**self).session_payload()
    }

    fn roi_payload(&self) -> Option<String> {
        (**self).roi_payload()
    }
}

/// Extract the session id from a `{"session_id": ...}` payload
pub fn parse_session_id(payload: Option<&str>) -> SessionContext {
    let Some(raw) = payload.filter(|p| !p.trim().is_empty()) else {
        tracing::warn!("No mirrored session ID found, defaulting to '{}'", DEFAULT_SESSION_ID);
        return SessionContext::default();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => match value.get("session_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => SessionContext {
                session_id: id.to_string(),
            },
            _ => {
                tracing::warn!(
                    "Session mirror has no session_id, defaulting to '{}'",
                    DEFAULT_SESSION_ID
                );
                SessionContext::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to parse session mirror: {}", e);
            SessionContext::default()
        }
    }
}

/// Extract the ROI image paths from a `{"paths": [...]}` payload
pub fn parse_roi_paths(payload: Option<&str>) -> Vec<String> {
    let Some(raw) = payload.filter(|p| !p.trim().is_empty()) else {
        tracing::warn!("No ROI data found");
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            let paths: Vec<String> = value
                .get("paths")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            if paths.is_empty() {
                tracing::warn!("No ROI data found");
            } else {
                tracing::debug!("Found {} ROI(s): {:?}", paths.len(), paths);
            }
            paths
        }
        Err(e) => {
            tracing::warn!("Failed to parse ROI mirror: {}", e);
            Vec::new()
        }
    }
}

/// Read-only view over a [`MirrorSource`]; nothing is cached
#[derive(Debug, Clone)]
pub struct MirrorReader<S> {
    source: S,
}

impl<S: MirrorSource> MirrorReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn session(&self) -> SessionContext {
        parse_session_id(self.source.session_payload().as_deref())
    }

    pub fn roi_paths(&self) -> Vec<String> {
        parse_roi_paths(self.source.roi_payload().as_deref())
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// In-process state container standing in for the DOM mirror nodes.
///
/// Writers publish typed values; readers still go through the same
/// best-effort parse as the DOM path.
#[derive(Debug, Default)]
pub struct StaticMirror {
    session: RwLock<Option<String>>,
    roi: RwLock<Option<String>>,
}

impl StaticMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session_id: &str) -> Self {
        let mirror = Self::new();
        mirror.publish_session(session_id);
        mirror
    }

    pub fn publish_session(&self, session_id: &str) {
        let payload = serde_json::json!({ "session_id": session_id }).to_string();
        self.set_session_payload(Some(payload));
    }

    pub fn publish_roi_paths(&self, paths: &[String]) {
        let payload = serde_json::json!({ "paths": paths }).to_string();
        self.set_roi_payload(Some(payload));
    }

    /// Store raw text, exactly as a host page would
    pub fn set_session_payload(&self, payload: Option<String>) {
        if let Ok(mut slot) = self.session.write() {
            *slot = payload;
        }
    }

    pub fn set_roi_payload(&self, payload: Option<String>) {
        if let Ok(mut slot) = self.roi.write() {
            *slot = payload;
        }
    }
}

impl MirrorSource for StaticMirror {
    fn session_payload(&self) -> Option<String> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn roi_payload(&self) -> Option<String> {
        self.roi.read().ok().and_then(|s| s.clone())
    }
}
