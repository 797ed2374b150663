use super::{Tool, ToolError};
use crate::todo::TodoStore;
use async_trait::async_trait;
use tracing::info;

const USAGE: &str = "Usage: todo add <task> | todo list | todo clear";

#[derive(Debug, PartialEq, Eq)]
enum TodoCommand<'a> {
    List,
    Add(&'a str),
    Clear,
}

fn parse(args: &str) -> Option<TodoCommand<'_>> {
    let args = args.trim();
    if args.is_empty() {
        return Some(TodoCommand::List);
    }

    let (verb, rest) = match args.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (args, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "list" if rest.is_empty() => Some(TodoCommand::List),
        "clear" if rest.is_empty() => Some(TodoCommand::Clear),
        "add" if !rest.is_empty() => Some(TodoCommand::Add(rest)),
        _ => None,
    }
}

fn render(tasks: &[String]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.".to_string();
    }
    let lines: Vec<String> = tasks.iter().map(|t| format!("- {t}")).collect();
    format!("Your TODOs:\n{}", lines.join("\n"))
}

pub struct TodoTool {
    store: TodoStore,
}

impl TodoTool {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for TodoTool {
    fn name(&self) -> &str {
        "todo"
    }

    fn description(&self) -> &str {
        "Manage a simple persistent todo list"
    }

    async fn execute(&self, args: &str) -> Result<String, ToolError> {
        match parse(args).ok_or_else(|| ToolError::Usage(USAGE.to_string()))? {
            TodoCommand::List => Ok(render(&self.store.load())),
            TodoCommand::Add(task) => {
                self.store.add(task)?;
                info!("Added todo item to {:?}", self.store.path());
                Ok(format!("Added: {task}"))
            }
            TodoCommand::Clear => {
                self.store.clear()?;
                Ok("Todo list cleared.".to_string())
            }
        }
    }
}
