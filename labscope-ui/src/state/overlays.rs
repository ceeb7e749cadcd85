//! Bubble Overlays
//!
//! Transient text drawn over transcript bubbles: thinking dots while a
//! placeholder waits, and the partial text while a reply is typed out.
//! Frames for an entry that is no longer tracked are dropped, so a timer
//! that outlives its bubble can never paint over another one.

use std::collections::HashMap;

use labscope::chat::{MessageId, AI_PREFIX, THINKING_START};

#[derive(Debug, Clone, Default)]
pub struct BubbleOverlays {
    dots: HashMap<MessageId, String>,
    typing: HashMap<MessageId, String>,
}

impl BubbleOverlays {
    pub fn start_thinking(&mut self, id: MessageId) {
        self.dots.insert(id, THINKING_START.to_string());
    }

    /// Show the next dot frame. Returns false once thinking has stopped.
    pub fn thinking_frame(&mut self, id: MessageId, frame: String) -> bool {
        match self.dots.get_mut(&id) {
            Some(slot) => {
                *slot = frame;
                true
            }
            None => false,
        }
    }

    /// Returns true only for the call that actually removed the dots
    pub fn stop_thinking(&mut self, id: MessageId) -> bool {
        self.dots.remove(&id).is_some()
    }

    pub fn dots(&self, id: MessageId) -> Option<&str> {
        self.dots.get(&id).map(String::as_str)
    }

    /// Hold the bubble at the bare prefix until the reveal starts
    pub fn begin_typing(&mut self, id: MessageId) {
        self.typing.insert(id, AI_PREFIX.to_string());
    }

    /// Show a revealed prefix. Returns false once the reveal was dropped.
    pub fn typing_frame(&mut self, id: MessageId, frame: &str) -> bool {
        match self.typing.get_mut(&id) {
            Some(slot) => {
                frame.clone_into(slot);
                true
            }
            None => false,
        }
    }

    pub fn finish_typing(&mut self, id: MessageId) -> bool {
        self.typing.remove(&id).is_some()
    }

    pub fn is_typing(&self, id: MessageId) -> bool {
        self.typing.contains_key(&id)
    }

    /// Text a bubble should show right now
    pub fn display_text(&self, id: MessageId, stored: &str) -> String {
        self.typing
            .get(&id)
            .cloned()
            .unwrap_or_else(|| stored.to_string())
    }

    /// Forget every running effect
    pub fn clear(&mut self) {
        self.dots.clear();
        self.typing.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.dots.is_empty() && self.typing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labscope::chat::{ChatMessage, ThinkingDots, Transcript, TypingReveal};

    #[test]
    fn test_dots_removed_exactly_once() {
        let mut transcript = Transcript::new();
        let id = transcript.push_placeholder();
        let mut overlays = BubbleOverlays::default();

        overlays.start_thinking(id);
        assert_eq!(overlays.dots(id), Some(THINKING_START));

        let mut cycle = ThinkingDots::new();
        for expected in [".", "..", "...", ""] {
            assert!(overlays.thinking_frame(id, cycle.tick()));
            assert_eq!(overlays.dots(id), Some(expected));
        }

        assert!(overlays.stop_thinking(id));
        assert!(!overlays.stop_thinking(id));
        // A tick that races the stop must not bring the dots back
        assert!(!overlays.thinking_frame(id, cycle.tick()));
        assert_eq!(overlays.dots(id), None);
        assert!(overlays.is_idle());
    }

    #[test]
    fn test_typing_entry_removed_when_reveal_completes() {
        let mut transcript = Transcript::new();
        let id = transcript.push_placeholder();
        let mut overlays = BubbleOverlays::default();

        overlays.start_thinking(id);
        overlays.stop_thinking(id);
        overlays.begin_typing(id);
        assert_eq!(overlays.display_text(id, "AI: "), "AI: ");

        transcript.resolve(id, ChatMessage::ai("AI: ok"));
        let stored = transcript.get(id).unwrap().message.text.clone();
        // Stored text is final, the overlay still hides it
        assert_eq!(overlays.display_text(id, &stored), "AI: ");

        let mut reveal = TypingReveal::new(stored.clone()).starting_after(AI_PREFIX.len());
        let mut shown = Vec::new();
        while let Some(frame) = reveal.tick() {
            assert!(overlays.typing_frame(id, frame));
            shown.push(overlays.display_text(id, &stored));
        }
        assert_eq!(shown, vec!["AI: o", "AI: ok"]);

        assert!(overlays.finish_typing(id));
        assert!(!overlays.is_typing(id));
        assert_eq!(overlays.display_text(id, &stored), "AI: ok");
        assert!(overlays.is_idle());
    }

    #[test]
    fn test_clear_drops_frames_from_old_conversation() {
        let mut transcript = Transcript::new();
        let thinking = transcript.push_placeholder();
        let typing = transcript.push_placeholder();
        let mut overlays = BubbleOverlays::default();
        overlays.start_thinking(thinking);
        overlays.begin_typing(typing);

        transcript.clear();
        overlays.clear();

        let user = transcript.push(ChatMessage::user("second"));
        let fresh = transcript.push_placeholder();
        overlays.start_thinking(fresh);

        assert!(!overlays.stop_thinking(thinking));
        assert!(!overlays.typing_frame(typing, "AI: stale"));
        assert_eq!(overlays.display_text(user, "second"), "second");
        assert_eq!(overlays.dots(fresh), Some(THINKING_START));
    }
}
