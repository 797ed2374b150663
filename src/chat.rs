use crate::{
    backends::BackendChain,
    config::Config,
    context::{BANNER, EXIT_REPLY, FAREWELL, HELP_TEXT, SYSTEM_PROMPT, TAGLINE},
    conversation::Conversation,
    dispatch::{Dispatch, Dispatcher},
    tools::ToolRegistry,
    BhanuError, Result,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, error};

const PROMPT: &str = "You: ";
const AGENT_LABEL: &str = "Agent:";

/// What the loop should do after one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Print this and keep going.
    Reply(String),
    /// Blank input; read again.
    Ignored,
    /// Print this and stop.
    End(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Ended,
}

/// One conversation: dispatcher, backend chain and the chat history.
pub struct Session {
    dispatcher: Dispatcher,
    chain: BackendChain,
    conversation: Conversation,
    state: SessionState,
}

impl Session {
    pub fn new(dispatcher: Dispatcher, chain: BackendChain) -> Self {
        Self {
            dispatcher,
            chain,
            conversation: Conversation::new(SYSTEM_PROMPT),
            state: SessionState::Running,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Dispatcher::new(ToolRegistry::with_builtins(config)),
            BackendChain::from_config(config),
        )
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn handle_line(&mut self, line: &str) -> Turn {
        if self.state == SessionState::Ended {
            return Turn::End(EXIT_REPLY.to_string());
        }

        let line = line.trim();
        if line.is_empty() {
            return Turn::Ignored;
        }

        match self.dispatcher.dispatch(line).await {
            Dispatch::Exit => {
                self.state = SessionState::Ended;
                Turn::End(EXIT_REPLY.to_string())
            }
            Dispatch::Reply(reply) => Turn::Reply(reply),
            Dispatch::NoMatch => {
                self.conversation.push_user(line);
                let reply = self.chain.respond(self.conversation.messages()).await;
                debug!("Chat reply from {}", reply.backend);
                self.conversation.push_assistant(reply.text.clone());
                Turn::Reply(reply.text)
            }
        }
    }

    /// End-of-input or interrupt.
    pub fn hang_up(&mut self) -> String {
        self.state = SessionState::Ended;
        FAREWELL.to_string()
    }
}

/// Terminal front-end: line editing, history file, banner.
pub struct InteractiveChat {
    session: Session,
    history_file: String,
}

impl InteractiveChat {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            history_file: ".bhanu_history".to_string(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        // Load history if exists
        let _ = rl.load_history(&self.history_file);

        println!("{BANNER}");
        println!("{TAGLINE}\n");
        println!("{HELP_TEXT}");

        while self.session.state() == SessionState::Running {
            println!();
            let line = match rl.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("\n{}", self.session.hang_up());
                    break;
                }
                Err(err) => {
                    error!("Error reading input: {:?}", err);
                    self.session.hang_up();
                    let _ = rl.save_history(&self.history_file);
                    return Err(err.into());
                }
            };

            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(line.trim());
            }

            match self.session.handle_line(&line).await {
                Turn::Ignored => continue,
                Turn::Reply(reply) => println!("{AGENT_LABEL} {reply}"),
                Turn::End(reply) => println!("{AGENT_LABEL} {reply}"),
            }
        }

        let _ = rl.save_history(&self.history_file);

        Ok(())
    }
}

/// Run a single line through a session and print the answer.
pub async fn run_once(session: &mut Session, command: &str) -> Result<()> {
    match session.handle_line(command).await {
        Turn::Ignored => return Err(BhanuError::EmptyCommand),
        Turn::Reply(reply) | Turn::End(reply) => println!("{AGENT_LABEL} {reply}"),
    }
    Ok(())
}
