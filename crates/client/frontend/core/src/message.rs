//! Message boxes and the bounded log of everything shown to the player.
use std::collections::VecDeque;
use std::time::Duration;

use crate::config::MessageConfig;

/// Severity level for UI messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    /// Narration of a simulation packet.
    Info,
    /// A refused menu choice.
    Warning,
}

/// Snapshot of a single message entry.
#[derive(Clone, Debug)]
pub struct MessageEntry {
    pub text: String,
    /// Turn during which the message was shown, when known.
    pub turn: Option<u32>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, turn: Option<u32>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            turn,
            level,
        }
    }
}

/// Circular buffer of messages displayed to the player.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
    pushed: u64,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
            pushed: 0,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.pushed += 1;
    }

    pub fn push_text(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Info));
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    /// Number of entries ever pushed, including evicted ones.
    pub fn total(&self) -> u64 {
        self.pushed
    }

    /// Entries pushed after the log had seen `seen` entries in total. Entries
    /// already evicted are skipped.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &MessageEntry> {
        let fresh = self.pushed.saturating_sub(seen).min(self.entries.len() as u64) as usize;
        self.entries.iter().skip(self.entries.len() - fresh)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How a message box may close.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageMode {
    /// Closes on acknowledgment or after the idle timeout.
    AutoAdvance,
    /// Closes on acknowledgment only. Used for messages shown over a menu.
    Static,
}

/// A message being printed to the player.
///
/// Text appears at the configured rate. Acknowledging while it prints
/// completes the text; acknowledging afterwards closes the box.
#[derive(Clone, Debug)]
pub struct MessageBox {
    text: String,
    mode: MessageMode,
    total_chars: usize,
    visible_chars: usize,
    chars_per_second: u32,
    printing_for: Duration,
    idle_for: Duration,
    auto_advance: Duration,
    closed: bool,
}

impl MessageBox {
    pub fn new(text: impl Into<String>, mode: MessageMode, config: &MessageConfig) -> Self {
        let text = text.into();
        let total_chars = text.chars().count();
        let visible_chars = if config.chars_per_second == 0 {
            total_chars
        } else {
            0
        };
        Self {
            text,
            mode,
            total_chars,
            visible_chars,
            chars_per_second: config.chars_per_second,
            printing_for: Duration::ZERO,
            idle_for: Duration::ZERO,
            auto_advance: config.auto_advance,
            closed: false,
        }
    }

    /// Advances printing and the auto-advance timer by one frame.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.closed {
            return;
        }

        let mut idle = elapsed;
        if self.is_printing() {
            self.printing_for += elapsed;
            let printed = self.printing_for.as_secs_f64() * f64::from(self.chars_per_second);
            self.visible_chars = (printed as usize).min(self.total_chars);
            if self.is_printing() {
                return;
            }
            let needed = Duration::from_secs_f64(
                self.total_chars as f64 / f64::from(self.chars_per_second),
            );
            idle = self.printing_for.saturating_sub(needed);
        }

        self.idle_for += idle;
        if self.mode == MessageMode::AutoAdvance && self.idle_for >= self.auto_advance {
            self.closed = true;
        }
    }

    pub fn acknowledge(&mut self) {
        if self.is_printing() {
            self.visible_chars = self.total_chars;
        } else {
            self.closed = true;
        }
    }

    pub fn is_printing(&self) -> bool {
        self.visible_chars < self.total_chars
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Portion of the text printed so far.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.visible_chars) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn mode(&self) -> MessageMode {
        self.mode
    }
}
