//! Ordered, capped conversation log with derived context windows.
//!
//! One [`ConversationManager`] per visitor session. Message ids are strictly
//! increasing and survive `clear()`, so ids stay unique for the lifetime of
//! the session. Serialization is an opaque JSON blob the caller hands to
//! whatever store it likes; the manager itself never touches disk.

use folio_shared::Sender;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default retained-message cap before the oldest messages are evicted.
pub const DEFAULT_MAX_MESSAGES: usize = 100;

/// Default context window size for [`ConversationManager::context`].
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    /// Epoch milliseconds; defaults to call time when not supplied.
    pub timestamp: i64,
}

/// Fixed welcome payload. Not appended to history; the caller decides
/// whether to persist it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    pub content: String,
    pub sender: Sender,
    pub suggestions: Vec<String>,
}

impl Greeting {
    pub fn welcome() -> Self {
        Self {
            content: "Hi! I can answer questions about my experience, skills, projects, \
                      awards, certifications, and how to get in touch. What would you \
                      like to know?"
                .to_string(),
            sender: Sender::Bot,
            suggestions: vec![
                "What is your work experience?".to_string(),
                "What skills do you have?".to_string(),
                "Tell me about your projects".to_string(),
                "How can I contact you?".to_string(),
            ],
        }
    }
}

/// Serialized form of a conversation. Round-trips losslessly; entries beyond
/// the cap at restore time are retained as given.
#[derive(Debug, Serialize, Deserialize)]
struct ConversationState {
    messages: Vec<Message>,
    message_id_counter: u64,
}

/// Ordered, capped message log for one session.
pub struct ConversationManager {
    messages: VecDeque<Message>,
    next_id: u64,
    max_messages: usize,
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_MESSAGES)
    }

    /// Creates a log that retains at most `max_messages` entries.
    pub fn with_capacity(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            next_id: 0,
            max_messages: max_messages.max(1),
        }
    }

    /// Appends a message and evicts from the front until the cap holds.
    /// The returned message is the stored one, eviction already applied.
    pub fn add_message(
        &mut self,
        content: impl Into<String>,
        sender: Sender,
        timestamp: Option<i64>,
    ) -> Message {
        self.next_id += 1;
        let message = Message {
            id: format!("msg-{}", self.next_id),
            content: content.into(),
            sender,
            timestamp: timestamp.unwrap_or_else(now_millis),
        };
        self.messages.push_back(message.clone());
        while self.messages.len() > self.max_messages {
            if let Some(evicted) = self.messages.pop_front() {
                tracing::debug!(
                    target: "folio::memory",
                    id = %evicted.id,
                    "evicted oldest message at cap {}",
                    self.max_messages
                );
            }
        }
        message
    }

    /// Defensive copy of the full ordered history.
    pub fn history(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// The last `n` messages (default 5), fewer if the history is shorter.
    pub fn context(&self, n: Option<usize>) -> Vec<Message> {
        let n = match n {
            Some(0) | None => DEFAULT_CONTEXT_WINDOW,
            Some(n) => n,
        };
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Empties the history. The id counter is NOT reset, so ids stay unique
    /// across clears.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn greeting(&self) -> Greeting {
        Greeting::welcome()
    }

    /// Opaque state blob for an external store.
    pub fn serialize(&self) -> String {
        let state = ConversationState {
            messages: self.history(),
            message_id_counter: self.next_id,
        };
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// Replaces in-memory state wholesale on success. On parse failure the
    /// current state is left untouched and `false` is returned. The cap is
    /// not re-enforced on restore; oversized blobs are retained as given.
    pub fn restore(&mut self, raw: &str) -> bool {
        match serde_json::from_str::<ConversationState>(raw) {
            Ok(state) => {
                self.messages = state.messages.into();
                self.next_id = state.message_id_counter;
                true
            }
            Err(e) => {
                tracing::warn!(target: "folio::memory", error = %e, "rejected conversation blob");
                false
            }
        }
    }
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_and_survive_clear() {
        let mut log = ConversationManager::new();
        let first = log.add_message("hello", Sender::User, None);
        log.clear();
        let second = log.add_message("again", Sender::User, None);
        assert_ne!(first.id, second.id);
        assert_eq!(first.id, "msg-1");
        assert_eq!(second.id, "msg-2");
    }

    #[test]
    fn cap_keeps_exactly_the_most_recent_messages() {
        let mut log = ConversationManager::with_capacity(3);
        for i in 1..=5 {
            log.add_message(format!("m{i}"), Sender::User, None);
        }
        let history = log.history();
        assert_eq!(history.len(), 3);
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4", "m5"]);
    }

    #[test]
    fn hundred_and_first_message_evicts_the_first() {
        let mut log = ConversationManager::new();
        for i in 1..=101 {
            log.add_message(format!("m{i}"), Sender::Bot, None);
        }
        let history = log.history();
        assert_eq!(history.len(), DEFAULT_MAX_MESSAGES);
        assert_eq!(history[0].id, "msg-2");
    }

    #[test]
    fn context_returns_last_five_of_seven() {
        let mut log = ConversationManager::new();
        for i in 1..=7 {
            log.add_message(format!("m{i}"), Sender::User, None);
        }
        let window = log.context(None);
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].content, "m3");
        assert_eq!(window[4].content, "m7");
    }

    #[test]
    fn context_shorter_history_returns_everything() {
        let mut log = ConversationManager::new();
        log.add_message("only", Sender::User, None);
        assert_eq!(log.context(Some(10)).len(), 1);
        assert_eq!(log.context(None).len(), 1);
    }

    #[test]
    fn explicit_timestamp_is_preserved() {
        let mut log = ConversationManager::new();
        let msg = log.add_message("pinned", Sender::User, Some(1_700_000_000_000));
        assert_eq!(msg.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn serialize_restore_round_trips() {
        let mut log = ConversationManager::new();
        log.add_message("question", Sender::User, Some(1));
        log.add_message("answer", Sender::Bot, Some(2));
        let blob = log.serialize();

        let mut restored = ConversationManager::new();
        assert!(restored.restore(&blob));
        assert_eq!(restored.history(), log.history());

        // counter restored too: next id continues after the snapshot
        let next = restored.add_message("more", Sender::User, None);
        assert_eq!(next.id, "msg-3");
    }

    #[test]
    fn restore_failure_leaves_state_untouched() {
        let mut log = ConversationManager::new();
        log.add_message("keep me", Sender::User, None);
        assert!(!log.restore("not json"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.history()[0].content, "keep me");
    }

    #[test]
    fn restore_does_not_re_enforce_the_cap() {
        let mut big = ConversationManager::with_capacity(200);
        for i in 1..=150 {
            big.add_message(format!("m{i}"), Sender::User, None);
        }
        let blob = big.serialize();

        let mut small = ConversationManager::with_capacity(100);
        assert!(small.restore(&blob));
        assert_eq!(small.len(), 150);
    }

    #[test]
    fn greeting_is_not_appended_to_history() {
        let log = ConversationManager::new();
        let greeting = log.greeting();
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(greeting.suggestions.len(), 4);
        assert!(log.is_empty());
    }
}
