/// Banner, help text and system preamble for the terminal agent
pub const SYSTEM_PROMPT: &str = "You are Bhanu, a helpful, concise terminal AI agent.";

pub const BANNER: &str = r#"
██████  ██   ██  █████  ███    ██ ██    ██
██   ██ ██   ██ ██   ██ ████   ██ ██    ██
██████  ███████ ███████ ██ ██  ██ ██    ██
██   ██ ██   ██ ██   ██ ██  ██ ██ ██    ██
██████  ██   ██ ██   ██ ██   ████  ██████
"#;

pub const TAGLINE: &str = "Bhanu Terminal Agent — Tools + Chat";

pub const HELP_TEXT: &str = r#"
Tools you can use:
  • calc <expr>            -> evaluate math (e.g., "calc (12+8)*5")
  • weather <city>         -> quick weather
  • time [Zone/Name]       -> current time
  • joke                   -> random joke
  • quote                  -> motivational quote
  • dict <word>            -> dictionary meaning
  • translate <lang> <txt> -> translate text
  • news                   -> latest headlines
  • ip                     -> your public IP
  • todo [add/list/clear]  -> manage simple todo
  • help                   -> show this help
  • exit / quit            -> leave the chat
"#;

pub const FAREWELL: &str = "Bye!";
pub const EXIT_REPLY: &str = "Bye! 👋";
