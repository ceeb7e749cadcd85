//! Chat State
//!
//! Transcript, drawn shapes and the two cosmetic effects, all as signals.
//! Replies are requested with [`ChatState::request_reply`]; sends are not
//! serialized, so several replies may be in flight at once.

use gloo_timers::callback::Interval;
use gloo_timers::future::TimeoutFuture;
use leptos::*;

use labscope::annotation::{selection_message, selection_prompt, DrawnShape, ShapeCollection};
use labscope::chat::{
    ChatMessage, ChatOutcome, ChatPipeline, MessageId, MirrorReader, ThinkingDots,
    ThinkingIndicator, Transcript, TypingReveal,
};
use labscope::config::{ChatConfig, Config, ViewerConfig};

use crate::api::{self, DomMirror, GlooChatTransport};

use super::overlays::BubbleOverlays;

/// Chat widget state provided to all components
#[derive(Clone, Copy)]
pub struct ChatState {
    pub transcript: RwSignal<Transcript>,
    /// Thinking dots and partially revealed replies
    pub overlays: RwSignal<BubbleOverlays>,
    /// Shapes kept on the image overlay
    pub shapes: RwSignal<ShapeCollection>,
    pub chat_config: StoredValue<ChatConfig>,
    pub viewer_config: StoredValue<ViewerConfig>,
}

/// Provide chat state to the component tree
pub fn provide_chat_state() {
    let mut config = Config::default();
    config.chat.base_url = api::get_api_base();

    let state = ChatState {
        transcript: create_rw_signal(Transcript::new()),
        overlays: create_rw_signal(BubbleOverlays::default()),
        shapes: create_rw_signal(ShapeCollection::new()),
        chat_config: store_value(config.chat),
        viewer_config: store_value(config.viewer),
    };

    provide_context(state);
}

impl ChatState {
    /// Append a user bubble
    pub fn push_user(&self, text: &str) {
        self.transcript.update(|t| {
            t.push(ChatMessage::user(text));
        });
    }

    /// User typed a message: show it and ask for a reply
    pub fn send_text(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.push_user(text);
        self.request_reply(text.to_string());
    }

    /// A shape was drawn: keep it, announce it and ask about it
    pub fn shape_drawn(&self, shape: DrawnShape) {
        self.push_user(&selection_message(&shape));
        self.request_reply(selection_prompt(&shape));
        self.shapes.update(|shapes| {
            shapes.add(shape);
        });
    }

    /// Add a thinking placeholder and fill it once the backend answers
    pub fn request_reply(&self, prompt: String) {
        let Some(id) = self.transcript.try_update(|t| t.push_placeholder()) else {
            return;
        };

        let state = *self;
        let config = self.chat_config.get_value();
        let indicator = DotsIndicator::start(id, self.overlays, config.thinking_interval_ms as u32);

        spawn_local(async move {
            let transport = GlooChatTransport::new(config.chat_url());
            let reply = ChatPipeline::from_config(&config)
                .respond(&transport, &prompt, &MirrorReader::new(DomMirror), indicator)
                .await;

            let prefix = reply.revealed_prefix_len();
            let outcome = reply.outcome;
            let message = reply.into_message();

            if outcome == ChatOutcome::Fallback {
                web_sys::console::warn_1(&"AI fetch failed, showing offline echo".into());
                state.transcript.update(|t| {
                    t.resolve(id, message);
                });
                return;
            }

            // Keep the bubble at "AI: " through the pause and the reveal
            state.overlays.update(|o| o.begin_typing(id));
            let pause = config.reply_pause(js_sys::Math::random());
            TimeoutFuture::new(pause.as_millis() as u32).await;

            let reveal = TypingReveal::new(message.text.clone()).starting_after(prefix);
            let resolved = state
                .transcript
                .try_update(|t| t.resolve(id, message))
                .unwrap_or(false);
            if !resolved {
                // Conversation was reset while this reply was in flight
                state.overlays.update(|o| {
                    o.finish_typing(id);
                });
                return;
            }
            state.play_typing(id, reveal, config.typing_delay_ms as u32).await;
        });
    }

    async fn play_typing(&self, id: MessageId, mut reveal: TypingReveal, delay_ms: u32) {
        loop {
            TimeoutFuture::new(delay_ms).await;
            let Some(frame) = reveal.tick() else {
                break;
            };
            let shown = self
                .overlays
                .try_update(|o| o.typing_frame(id, frame))
                .unwrap_or(false);
            if !shown {
                return;
            }
        }
        self.overlays.update(|o| {
            o.finish_typing(id);
        });
    }

    /// Text a bubble should show right now
    pub fn display_text(&self, id: MessageId, stored: &str) -> String {
        self.overlays.with(|o| o.display_text(id, stored))
    }

    /// Forget the backend session and start an empty transcript
    pub fn reset(&self) {
        let config = self.chat_config.get_value();
        let session = MirrorReader::new(DomMirror).session().session_id;
        let transcript = self.transcript;
        let overlays = self.overlays;
        let shapes = self.shapes;

        spawn_local(async move {
            if let Err(e) = api::reset_session(&config.route_url("/api/reset_chat"), &session).await {
                web_sys::console::warn_1(&format!("Failed to reset chat: {}", e).into());
            }
            // Clearing keeps the id counter, so late replies find nothing
            transcript.update(|t| t.clear());
            overlays.update(|o| o.clear());
            shapes.update(|s| s.clear());
        });
    }
}

/// Dot animation bound to one placeholder; stopping drops the interval
struct DotsIndicator {
    interval: Interval,
    id: MessageId,
    overlays: RwSignal<BubbleOverlays>,
}

impl DotsIndicator {
    fn start(id: MessageId, overlays: RwSignal<BubbleOverlays>, period_ms: u32) -> Self {
        overlays.update(|o| o.start_thinking(id));

        let mut cycle = ThinkingDots::new();
        let interval = Interval::new(period_ms, move || {
            let frame = cycle.tick();
            overlays.update(|o| {
                o.thinking_frame(id, frame);
            });
        });

        Self {
            interval,
            id,
            overlays,
        }
    }
}

impl ThinkingIndicator for DotsIndicator {
    fn stop(self) {
        let DotsIndicator {
            interval,
            id,
            overlays,
        } = self;
        drop(interval);
        overlays.update(|o| {
            o.stop_thinking(id);
        });
    }
}
