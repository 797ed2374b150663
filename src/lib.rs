pub mod backends;
pub mod calc;
pub mod chat;
pub mod config;
pub mod context;
pub mod conversation;
pub mod dispatch;
pub mod http;
pub mod runtime;
pub mod todo;
pub mod tools;

pub use chat::{InteractiveChat, Session};
pub use config::Config;
pub use dispatch::{Dispatch, Dispatcher};
pub use runtime::Runtime;

#[derive(Debug, thiserror::Error)]
pub enum BhanuError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] runtime::RuntimeError),

    #[error("Tool error: {0}")]
    Tool(#[from] tools::ToolError),

    #[error("Todo store error: {0}")]
    Todo(#[from] todo::TodoError),

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Nothing to run: the command is empty")]
    EmptyCommand,
}

pub type Result<T> = std::result::Result<T, BhanuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let runtime_err = runtime::RuntimeError::Creation("test".to_string());
        let err: BhanuError = runtime_err.into();
        assert!(matches!(err, BhanuError::Runtime(_)));

        let tool_err = tools::ToolError::Usage("Usage: dict <word>".to_string());
        let err: BhanuError = tool_err.into();
        assert_eq!(err.to_string(), "Tool error: Usage: dict <word>");

        let readline_err = rustyline::error::ReadlineError::Eof;
        let err: BhanuError = readline_err.into();
        assert!(matches!(err, BhanuError::Readline(_)));
    }

    #[test]
    fn test_error_display() {
        let err = BhanuError::EmptyCommand;
        assert_eq!(err.to_string(), "Nothing to run: the command is empty");
    }
}
