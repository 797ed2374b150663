use async_trait::async_trait;
use bhanu::tools::{Tool, ToolError, ToolRegistry, ToolRequest};

struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing_tool"
    }

    fn description(&self) -> &str {
        "A tool that always fails"
    }

    async fn execute(&self, _args: &str) -> Result<String, ToolError> {
        Err(ToolError::Usage("Intentional failure".to_string()))
    }
}

#[tokio::test]
async fn test_tool_registry_error_handling() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(FailingTool));

    let response = registry
        .execute(ToolRequest::new("failing_tool", "anything"))
        .await;
    assert!(!response.success);
    assert!(response.output.contains("Intentional failure"));
    assert_eq!(
        response.tagged(),
        "[failing_tool] Intentional failure"
    );
}

#[tokio::test]
async fn test_tool_registry_list() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(FailingTool));

    let tools = registry.list_tools();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].0, "failing_tool");
    assert_eq!(tools[0].1, "A tool that always fails");
    assert!(registry.contains("failing_tool"));
    assert!(!registry.contains("calc"));
}

#[test]
fn test_tool_registry_default() {
    let registry = ToolRegistry::default();
    assert_eq!(registry.list_tools().len(), 0);
}
