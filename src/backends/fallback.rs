use crate::conversation::{last_user, ChatMessage};

pub const GREETING: &str =
    "Hi! I’m Bhanu — your terminal agent. Ask me to calc, check weather, or just chat!";
pub const BINARY_SEARCH: &str =
    "Binary search halves the search range in a sorted array; O(log n) time.";
pub const LINUX_TIP: &str =
    "Linux tip: use `ctrl+r` in the terminal to reverse-search your command history.";
pub const STUDY_BALANCE: &str =
    "Balance idea: 50-minute study sprints + 10-minute stretch or light drills.";
pub const OFFLINE: &str = "I’m offline 😅 — try a tool (calc/weather/time/joke/news/etc).";

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "namaste"];

/// Canned answers picked by keyword. Always has something to say.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn name(&self) -> &'static str {
        "fallback"
    }

    pub fn respond(&self, history: &[ChatMessage]) -> String {
        self.reply_to(last_user(history).unwrap_or_default()).to_string()
    }

    pub fn reply_to(&self, text: &str) -> &'static str {
        let text = text.trim().to_lowercase();

        if GREETING_WORDS.iter().any(|w| text.contains(w)) {
            GREETING
        } else if text.contains("binary search") {
            BINARY_SEARCH
        } else if text.contains("linux tip") {
            LINUX_TIP
        } else if text.contains("sports") && text.contains("study") {
            STUDY_BALANCE
        } else {
            OFFLINE
        }
    }
}
