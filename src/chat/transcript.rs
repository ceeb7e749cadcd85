//! Transcript
//!
//! Ordered, append-only message list. The only mutation after creation is
//! resolving a thinking placeholder into the final reply. Clearing starts a
//! new conversation but never reuses ids, so a reply that arrives for a
//! cleared placeholder is refused.

use super::{ChatMessage, AI_PREFIX};

/// Stable handle to a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

/// A message plus whether it is still waiting for a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: MessageId,
    pub message: ChatMessage,
    pub pending: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished message
    pub fn push(&mut self, message: ChatMessage) -> MessageId {
        self.push_entry(message, false)
    }

    /// Append an AI bubble that shows the thinking indicator
    pub fn push_placeholder(&mut self) -> MessageId {
        self.push_entry(ChatMessage::ai(AI_PREFIX), true)
    }

    fn push_entry(&mut self, message: ChatMessage, pending: bool) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id,
            message,
            pending,
        });
        id
    }

    /// Replace a pending placeholder with its reply.
    ///
    /// Returns false when `id` is unknown or was already resolved.
    pub fn resolve(&mut self, id: MessageId, message: ChatMessage) -> bool {
        let slot = self.position(id).and_then(|i| self.entries.get_mut(i));
        match slot {
            Some(entry) if entry.pending => {
                entry.message = message;
                entry.pending = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: MessageId) -> Option<&TranscriptEntry> {
        self.position(id).map(|i| &self.entries[i])
    }

    // Ids only grow, so entries stay sorted by id
    fn position(&self, id: MessageId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Drop every entry. Ids handed out before are never issued again.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, id: MessageId) -> bool {
        self.get(id).map_or(false, |e| e.pending)
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().map(|e| &e.message)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.pending).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;

    #[test]
    fn test_append_order() {
        let mut transcript = Transcript::new();
        let a = transcript.push(ChatMessage::user("first"));
        let b = transcript.push(ChatMessage::user("second"));

        assert!(a < b);
        let texts: Vec<_> = transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_placeholder_resolves_once() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("what is this?"));
        let thinking = transcript.push_placeholder();

        assert!(transcript.is_pending(thinking));
        assert_eq!(transcript.get(thinking).unwrap().message.text, "AI: ");
        assert_eq!(transcript.pending_count(), 1);

        assert!(transcript.resolve(thinking, ChatMessage::ai("AI: a liver section")));
        assert!(!transcript.is_pending(thinking));
        assert!(!transcript.resolve(thinking, ChatMessage::ai("AI: overwritten")));
        assert_eq!(
            transcript.get(thinking).unwrap().message.text,
            "AI: a liver section"
        );
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_finished_messages_cannot_be_resolved() {
        let mut transcript = Transcript::new();
        let user = transcript.push(ChatMessage::user("hi"));
        assert!(!transcript.resolve(user, ChatMessage::ai("AI: nope")));
        assert_eq!(transcript.get(user).unwrap().message.sender, Sender::User);
    }

    #[test]
    fn test_interleaved_sends_keep_positions() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("one"));
        let first = transcript.push_placeholder();
        transcript.push(ChatMessage::user("two"));
        let second = transcript.push_placeholder();

        // Replies may arrive out of order without reordering the transcript
        assert!(transcript.resolve(second, ChatMessage::ai("AI: reply two")));
        assert!(transcript.resolve(first, ChatMessage::ai("AI: reply one")));

        let texts: Vec<_> = transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "AI: reply one", "two", "AI: reply two"]);
    }

    #[test]
    fn test_reply_for_cleared_placeholder_is_refused() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("first"));
        let stale = transcript.push_placeholder();

        transcript.clear();
        assert!(transcript.is_empty());

        transcript.push(ChatMessage::user("second"));
        let fresh = transcript.push_placeholder();
        assert_ne!(stale, fresh);

        assert!(!transcript.resolve(stale, ChatMessage::ai("AI: reply to first")));
        assert!(transcript.get(stale).is_none());
        assert!(transcript.is_pending(fresh));

        assert!(transcript.resolve(fresh, ChatMessage::ai("AI: reply to second")));
        let texts: Vec<_> = transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "AI: reply to second"]);
    }
}
