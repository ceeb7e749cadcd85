//! Cosmetic chat effects.
//!
//! Both effects are plain state machines advanced by a timer owned by the
//! caller. The timer is cancelled when the reply arrives (dots) or when the
//! last character is shown (typing).

/// Text of the dots span before the first tick
pub const THINKING_START: &str = "…";

/// Dot cycle 0 → 1 → 2 → 3 → 0 shown while a request is outstanding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThinkingDots {
    count: u8,
}

impl ThinkingDots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step and return the new dots
    pub fn tick(&mut self) -> String {
        self.count = (self.count + 1) % 4;
        self.text()
    }

    pub fn text(&self) -> String {
        ".".repeat(self.count as usize)
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

/// Reveals a reply one character per tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingReveal {
    text: String,
    /// Byte offsets of every character boundary after the first char
    boundaries: Vec<usize>,
    revealed: usize,
}

impl TypingReveal {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        Self {
            text,
            boundaries,
            revealed: 0,
        }
    }

    /// Start with the first `chars` characters already visible
    pub fn starting_after(mut self, chars: usize) -> Self {
        self.revealed = chars.min(self.boundaries.len());
        self
    }

    /// Reveal the next character; `None` once everything is visible
    pub fn tick(&mut self) -> Option<&str> {
        if self.is_done() {
            return None;
        }
        self.revealed += 1;
        Some(self.visible())
    }

    /// Currently visible prefix
    pub fn visible(&self) -> &str {
        match self.revealed {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    pub fn is_done(&self) -> bool {
        self.revealed >= self.boundaries.len()
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    /// Ticks left until the text is complete
    pub fn remaining(&self) -> usize {
        self.boundaries.len() - self.revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dots_cycle() {
        let mut dots = ThinkingDots::new();
        let frames: Vec<String> = (0..5).map(|_| dots.tick()).collect();
        assert_eq!(frames, vec![".", "..", "...", "", "."]);
    }

    #[test]
    fn test_typing_reveals_one_char_per_tick() {
        let mut typing = TypingReveal::new("AI: ok");
        assert_eq!(typing.visible(), "");
        assert_eq!(typing.tick(), Some("A"));
        assert_eq!(typing.tick(), Some("AI"));
        assert_eq!(typing.remaining(), 4);
    }

    #[test]
    fn test_typing_resumes_after_prefix() {
        let mut typing = TypingReveal::new("AI: ok").starting_after(4);
        assert_eq!(typing.visible(), "AI: ");
        assert_eq!(typing.tick(), Some("AI: o"));
        assert_eq!(typing.tick(), Some("AI: ok"));
        assert!(typing.is_done());
        assert_eq!(typing.tick(), None);
    }

    #[test]
    fn test_typing_handles_multibyte() {
        let mut typing = TypingReveal::new("é→");
        assert_eq!(typing.tick(), Some("é"));
        assert_eq!(typing.tick(), Some("é→"));
        assert_eq!(typing.tick(), None);
    }

    #[test]
    fn test_empty_text_is_done_immediately() {
        let mut typing = TypingReveal::new("");
        assert!(typing.is_done());
        assert_eq!(typing.tick(), None);

        let typing = TypingReveal::new("abc").starting_after(10);
        assert!(typing.is_done());
        assert_eq!(typing.visible(), "abc");
    }
}
