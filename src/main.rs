use anyhow::Result;
use bhanu::{
    chat::{self, InteractiveChat, Session},
    config::Config,
    runtime::Runtime,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bhanu")]
#[command(about = "Terminal agent with tools and a chat fallback chain", long_about = None)]
struct Args {
    #[arg(short, long, help = "Enable debug logging")]
    debug: bool,

    #[arg(long, help = "Never contact an LLM; answer chat from the built-in fallback")]
    offline: bool,

    #[arg(long, help = "Path of the todo list file")]
    todo_file: Option<PathBuf>,

    #[arg(long, help = "Base URL of the local Ollama server")]
    ollama_url: Option<String>,

    #[arg(long, help = "Model name for the local Ollama server")]
    ollama_model: Option<String>,

    #[arg(short, long, help = "Handle one line of input and exit")]
    command: Option<String>,
}

impl Args {
    fn into_config(self) -> (Config, Option<String>) {
        let mut config = Config::from_env();
        config.offline = self.offline;
        if let Some(path) = self.todo_file {
            config.todo_file = path;
        }
        if let Some(url) = self.ollama_url {
            config.ollama_url = url;
        }
        if let Some(model) = self.ollama_model {
            config.ollama_model = model;
        }
        (config, self.command)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; quiet unless asked, stderr shares the terminal
    let filter = if args.debug {
        EnvFilter::from_default_env()
            .add_directive("bhanu=debug".parse()?)
            .add_directive("info".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting bhanu v{}", env!("CARGO_PKG_VERSION"));

    let runtime = Runtime::new()?;
    let (config, command) = args.into_config();

    runtime.block_on(async_main(config, command))
}

async fn async_main(config: Config, command: Option<String>) -> Result<()> {
    info!(
        "Hosted LLM: {}, local LLM: {}, todo file: {:?}",
        config.use_hosted_backend(),
        config.use_local_backend(),
        config.todo_file
    );

    let mut session = Session::from_config(&config);
    info!(
        "Registered {} tools",
        session.dispatcher().registry().list_tools().len()
    );

    match command {
        Some(command) => {
            info!("Executing command: {}", command);
            chat::run_once(&mut session, &command).await?;
        }
        None => InteractiveChat::new(session).run().await?,
    }
    Ok(())
}
