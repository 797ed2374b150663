use super::{Tool, ToolError};
use crate::calc::{evaluate, format_number};
use async_trait::async_trait;
use tracing::debug;

pub struct CalcTool;

#[async_trait]
impl Tool for CalcTool {
    fn name(&self) -> &str {
        "calc"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression"
    }

    async fn execute(&self, args: &str) -> Result<String, ToolError> {
        let expr = args.trim();
        if expr.is_empty() {
            return Err(ToolError::Usage("Usage: calc <expr>".to_string()));
        }

        debug!("Evaluating expression: {}", expr);
        let value = evaluate(expr)?;
        Ok(format_number(value))
    }
}
