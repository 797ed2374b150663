//! Routes a raw input line to a tool, the end of the session, or chat.

use crate::context::HELP_TEXT;
use crate::tools::{ToolRegistry, ToolRequest};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Tool output (or help text), ready to print.
    Reply(String),
    Exit,
    /// Not a command; hand the line to the chat backends.
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// Keyword alone, nothing after it.
    Exact,
    /// Keyword, optionally followed by whitespace and arguments.
    WithArgs,
}

/// Tool routes in priority order. Help and exit are checked before these.
const ROUTES: &[(&str, Form)] = &[
    ("calc", Form::WithArgs),
    ("weather", Form::WithArgs),
    ("time", Form::WithArgs),
    ("joke", Form::Exact),
    ("quote", Form::Exact),
    ("dict", Form::WithArgs),
    ("translate", Form::WithArgs),
    ("news", Form::Exact),
    ("ip", Form::Exact),
    ("todo", Form::WithArgs),
];

const HELP_WORDS: &[&str] = &["help", "/help", "?"];
const EXIT_WORDS: &[&str] = &["exit", "quit"];

/// If `line` starts with `keyword` (any case) followed by whitespace or the
/// end of the line, return the trimmed remainder.
pub fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &line[keyword.len()..];
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        Some(_) => None,
    }
}

/// Find the route for `line`, returning the tool name and its argument text.
pub fn route(line: &str) -> Option<(&'static str, &str)> {
    ROUTES.iter().find_map(|&(keyword, form)| match form {
        Form::Exact => line.eq_ignore_ascii_case(keyword).then_some((keyword, "")),
        Form::WithArgs => strip_keyword(line, keyword).map(|args| (keyword, args)),
    })
}

pub struct Dispatcher {
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, input: &str) -> Dispatch {
        let line = input.trim();

        if HELP_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
            return Dispatch::Reply(HELP_TEXT.to_string());
        }
        if EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
            return Dispatch::Exit;
        }

        let Some((tool, args)) = route(line) else {
            return Dispatch::NoMatch;
        };

        debug!("Dispatching to {} with args {:?}", tool, args);
        let response = self.registry.execute(ToolRequest::new(tool, args)).await;
        Dispatch::Reply(response.tagged())
    }
}
