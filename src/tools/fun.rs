use super::{Tool, ToolError};
use async_trait::async_trait;
use rand::seq::SliceRandom;

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "A SQL query walks into a bar, walks up to two tables and asks: 'Can I join you?'",
    "Debugging: being the detective in a crime movie where you are also the murderer.",
];

pub const QUOTES: &[&str] = &[
    "Believe you can and you're halfway there.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
    "Do what you can, with what you have, where you are.",
];

fn pick(options: &'static [&'static str]) -> String {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

pub struct JokeTool;

#[async_trait]
impl Tool for JokeTool {
    fn name(&self) -> &str {
        "joke"
    }

    fn description(&self) -> &str {
        "Tell a random programming joke"
    }

    async fn execute(&self, _args: &str) -> Result<String, ToolError> {
        Ok(pick(JOKES))
    }
}

pub struct QuoteTool;

#[async_trait]
impl Tool for QuoteTool {
    fn name(&self) -> &str {
        "quote"
    }

    fn description(&self) -> &str {
        "Share a motivational quote"
    }

    async fn execute(&self, _args: &str) -> Result<String, ToolError> {
        Ok(pick(QUOTES))
    }
}
