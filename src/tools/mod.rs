pub mod calc;
pub mod clock;
pub mod dictionary;
pub mod fun;
pub mod ip;
pub mod news;
pub mod todo;
pub mod translate;
pub mod weather;

use crate::{config::Config, todo::TodoStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Wrong or missing arguments; the message is shown to the user as-is.
    #[error("{0}")]
    Usage(String),

    #[error("Calc error: {0}")]
    Calc(#[from] crate::calc::CalcError),

    #[error("Todo error: {0}")]
    Todo(#[from] crate::todo::TodoError),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool: String,
    pub args: String,
}

impl ToolRequest {
    pub fn new(tool: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            args: args.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub tool: String,
    pub success: bool,
    pub output: String,
}

impl ToolResponse {
    /// Transcript form, e.g. `[calc] 4`.
    pub fn tagged(&self) -> String {
        format!("[{}] {}", self.tool, self.output)
    }
}

/// A single-purpose command. Remote failures are absorbed by the tool and
/// turned into an offline answer; only usage and evaluation problems come
/// back as errors.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn execute(&self, args: &str) -> Result<String, ToolError>;
}

pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry with every built-in tool, sharing one HTTP client.
    pub fn with_builtins(config: &Config) -> Self {
        let client = crate::http::client();
        let mut registry = Self::new();
        registry.register(Box::new(calc::CalcTool));
        registry.register(Box::new(weather::WeatherTool::new(client.clone())));
        registry.register(Box::new(clock::TimeTool));
        registry.register(Box::new(fun::JokeTool));
        registry.register(Box::new(fun::QuoteTool));
        registry.register(Box::new(dictionary::DictTool::new(client.clone())));
        registry.register(Box::new(translate::TranslateTool::new(client.clone())));
        registry.register(Box::new(news::NewsTool::new(client.clone())));
        registry.register(Box::new(ip::IpTool::new(client)));
        registry.register(Box::new(todo::TodoTool::new(TodoStore::new(
            config.todo_file.clone(),
        ))));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        debug!("Registering tool: {}", name);
        self.tools.insert(name, tool);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Never fails: errors become the response text.
    pub async fn execute(&self, request: ToolRequest) -> ToolResponse {
        let Some(tool) = self.tools.get(&request.tool) else {
            return ToolResponse {
                success: false,
                output: ToolError::NotFound(request.tool.clone()).to_string(),
                tool: request.tool,
            };
        };

        match tool.execute(&request.args).await {
            Ok(output) => ToolResponse {
                tool: request.tool,
                success: true,
                output,
            },
            Err(e) => {
                debug!("Tool {} returned error: {}", request.tool, e);
                ToolResponse {
                    tool: request.tool,
                    success: false,
                    output: e.to_string(),
                }
            }
        }
    }

    pub fn list_tools(&self) -> Vec<(String, String)> {
        let mut tools: Vec<_> = self
            .tools
            .values()
            .map(|tool| (tool.name().to_string(), tool.description().to_string()))
            .collect();
        tools.sort();
        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo tool for unit tests"
        }

        async fn execute(&self, args: &str) -> Result<String, ToolError> {
            if args.is_empty() {
                return Err(ToolError::Usage("Usage: echo <text>".to_string()));
            }
            Ok(args.to_string())
        }
    }

    #[tokio::test]
    async fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let response = registry.execute(ToolRequest::new("echo", "hello")).await;
        assert!(response.success);
        assert_eq!(response.tagged(), "[echo] hello");

        let response = registry.execute(ToolRequest::new("echo", "")).await;
        assert!(!response.success);
        assert_eq!(response.output, "Usage: echo <text>");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let response = registry.execute(ToolRequest::new("nope", "")).await;
        assert!(!response.success);
        assert_eq!(response.output, "Tool not found: nope");
    }

    #[test]
    fn test_builtins_are_registered() {
        let config = Config::offline("unused_todo.json");
        let registry = ToolRegistry::with_builtins(&config);
        let names: Vec<String> = registry.list_tools().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "calc",
                "dict",
                "ip",
                "joke",
                "news",
                "quote",
                "time",
                "todo",
                "translate",
                "weather"
            ]
        );
    }
}
