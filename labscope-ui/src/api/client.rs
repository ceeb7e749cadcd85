//! HTTP API Client
//!
//! gloo-net requests for the chat backend and the dataset sheet, plus the
//! DOM-backed session/ROI mirror.

use async_trait::async_trait;
use gloo_net::http::Request;
use labscope::chat::{
    ChatError, ChatRequest, ChatResponse, ChatTransport, MirrorSource, MIRROR_ATTRIBUTE,
    ROI_MIRROR_ID, SESSION_MIRROR_ID,
};

/// Local storage key for a backend base URL override
const API_BASE_KEY: &str = "labscope_api_url";

/// Get the chat backend base URL from local storage.
///
/// Empty means same origin, which is how the backend serves this app.
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_default();
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Fetch the dataset sheet as CSV text
pub async fn fetch_dataset_csv(url: &str) -> Result<String, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("CSV source returned status {}", response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| format!("Read error: {}", e))
}

/// Ask the backend to forget a session's history
pub async fn reset_session(reset_url: &str, session_id: &str) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct ResetRequest<'a> {
        session_id: &'a str,
    }

    let response = Request::post(reset_url)
        .json(&ResetRequest { session_id })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        Ok(())
    } else {
        Err(format!("Reset failed with status {}", response.status()))
    }
}

/// Browser fetch transport for `/api/chat`
pub struct GlooChatTransport {
    chat_url: String,
}

impl GlooChatTransport {
    pub fn new(chat_url: impl Into<String>) -> Self {
        Self {
            chat_url: chat_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl ChatTransport for GlooChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        web_sys::console::log_1(
            &format!(
                "Sending payload → {} (session {}, {} ROI)",
                self.chat_url,
                request.session_id,
                request.images.len()
            )
            .into(),
        );

        let response = Request::post(&self.chat_url)
            .json(request)
            .map_err(|e| ChatError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Status(response.status()));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}

/// Reads the mirror nodes the host page keeps in sync.
///
/// Every call goes back to the DOM, so the latest session and ROI
/// selection are always used.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomMirror;

fn read_mirror(element_id: &str) -> Option<String> {
    let payload = web_sys::window()?
        .document()?
        .get_element_by_id(element_id)
        .and_then(|el| el.get_attribute(MIRROR_ATTRIBUTE));

    if payload.is_none() {
        web_sys::console::warn_1(&format!("Mirror #{} not found", element_id).into());
    }
    payload
}

impl MirrorSource for DomMirror {
    fn session_payload(&self) -> Option<String> {
        read_mirror(SESSION_MIRROR_ID)
    }

    fn roi_payload(&self) -> Option<String> {
        read_mirror(ROI_MIRROR_ID)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use labscope::chat::{MirrorReader, DEFAULT_SESSION_ID};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_mirror(id: &str, payload: &str) -> web_sys::Element {
        let document = web_sys::window().unwrap().document().unwrap();
        let node = document.create_element("div").unwrap();
        node.set_id(id);
        node.set_attribute(MIRROR_ATTRIBUTE, payload).unwrap();
        document.body().unwrap().append_child(&node).unwrap();
        node
    }

    #[wasm_bindgen_test]
    fn malformed_session_mirror_falls_back_to_default() {
        let node = mount_mirror(SESSION_MIRROR_ID, "{not json");
        let reader = MirrorReader::new(DomMirror);
        assert_eq!(reader.session().session_id, DEFAULT_SESSION_ID);
        node.remove();
    }

    #[wasm_bindgen_test]
    fn mirrors_are_reread_on_every_call() {
        let session = mount_mirror(SESSION_MIRROR_ID, r#"{"session_id": "abc"}"#);
        let roi = mount_mirror(ROI_MIRROR_ID, r#"{"paths": ["roi/1.png"]}"#);
        let reader = MirrorReader::new(DomMirror);
        assert_eq!(reader.session().session_id, "abc");
        assert_eq!(reader.roi_paths(), vec!["roi/1.png".to_string()]);

        session
            .set_attribute(MIRROR_ATTRIBUTE, r#"{"session_id": "xyz"}"#)
            .unwrap();
        roi.set_attribute(MIRROR_ATTRIBUTE, "{}").unwrap();
        assert_eq!(reader.session().session_id, "xyz");
        assert!(reader.roi_paths().is_empty());

        session.remove();
        roi.remove();
    }

    #[wasm_bindgen_test]
    fn missing_mirror_nodes_read_as_defaults() {
        let reader = MirrorReader::new(DomMirror);
        assert_eq!(reader.session().session_id, DEFAULT_SESSION_ID);
        assert!(reader.roi_paths().is_empty());
    }
}
