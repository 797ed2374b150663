// Every command keyword must reach its tool, never the chat chain
use bhanu::{
    backends::BackendChain,
    chat::{Session, Turn},
    dispatch::{Dispatch, Dispatcher},
    todo::TodoStore,
    tools::{
        calc::CalcTool, clock::TimeTool, dictionary::DictTool, fun, ip::IpTool, news::NewsTool,
        todo::TodoTool, translate::TranslateTool, weather::WeatherTool, ToolRegistry,
    },
};
use tempfile::TempDir;

// Nothing listens on the discard port
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn offline_registry(dir: &TempDir) -> ToolRegistry {
    let client = bhanu::http::client();
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CalcTool));
    registry.register(Box::new(WeatherTool::with_base_url(client.clone(), UNREACHABLE)));
    registry.register(Box::new(TimeTool));
    registry.register(Box::new(fun::JokeTool));
    registry.register(Box::new(fun::QuoteTool));
    registry.register(Box::new(DictTool::with_base_url(client.clone(), UNREACHABLE)));
    registry.register(Box::new(TranslateTool::with_url(client.clone(), UNREACHABLE)));
    registry.register(Box::new(NewsTool::with_url(client.clone(), UNREACHABLE)));
    registry.register(Box::new(IpTool::with_url(client, UNREACHABLE)));
    registry.register(Box::new(TodoTool::new(TodoStore::new(
        dir.path().join("todo.json"),
    ))));
    registry
}

#[tokio::test]
async fn test_every_command_is_routed_to_its_tool() {
    let dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(offline_registry(&dir));

    let cases = [
        ("calc (12+8)*5", "[calc] 100"),
        ("weather Hyderabad", "[weather] "),
        ("weather", "[weather] Please provide a city"),
        ("time", "[time] "),
        ("joke", "[joke] "),
        ("quote", "[quote] "),
        ("dict serendipity", "[dict] serendipity: meaning not found (offline)."),
        ("dict", "[dict] Usage: dict <word>"),
        ("translate fr good morning", "[translate] Translation (offline dummy): good morning in fr"),
        ("translate fr", "[translate] Usage: translate <lang> <text>"),
        ("news", "[news] Breaking news (offline dummy)"),
        ("ip", "[ip] Your IP: 127.0.0.1 (dummy offline)"),
        ("todo", "[todo] No tasks yet."),
        ("todo frobnicate", "[todo] Usage: todo add <task>"),
    ];

    for (input, expected_prefix) in cases {
        match dispatcher.dispatch(input).await {
            Dispatch::Reply(text) => assert!(
                text.starts_with(expected_prefix),
                "{input:?} gave {text:?}"
            ),
            other => panic!("{input:?} was not routed to a tool: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_offline_network_tools_never_fail_the_session() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(
        Dispatcher::new(offline_registry(&dir)),
        BackendChain::new(),
    );

    for input in ["weather Paris", "news", "ip", "dict rust", "translate es hi"] {
        assert!(matches!(session.handle_line(input).await, Turn::Reply(_)));
    }
    assert_eq!(session.conversation().len(), 1);
}
