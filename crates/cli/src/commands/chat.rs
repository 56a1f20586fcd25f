//! Interactive chat command handler.

use clap::Args;
use podium_core::{AppConfig, AppResult};
use podium_knowledge::AgentConfig;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive conversation on stdin
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Print sources after every answer
    #[arg(long)]
    pub sources: bool,
}

/// One line of chat input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    Question(String),
    History,
    Reset,
    Persona(PathBuf),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ChatInput {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('/') {
            return Self::Question(line.to_string());
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "/history" => Self::History,
            "/reset" => Self::Reset,
            "/persona" if !arg.is_empty() => Self::Persona(PathBuf::from(arg)),
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "Commands: /history, /reset, /persona <file>, /help, /quit";

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting chat session");

        let cache = super::build_cache(config, true)?;
        let mut agent_config = AgentConfig::from_app_config(config)?;
        let mut agent = cache.get_or_create(&agent_config).await?;

        eprintln!(
            "Ready: {} chunks from {}. {}",
            agent.chunk_count(),
            agent_config.corpus_path.display(),
            HELP
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("> ");
            std::io::stderr().flush().ok();

            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };

            match ChatInput::parse(&line) {
                ChatInput::Empty => continue,
                ChatInput::Quit => break,
                ChatInput::Help => eprintln!("{}", HELP),
                ChatInput::Unknown(input) => eprintln!("Unknown command: {}. {}", input, HELP),
                ChatInput::History => {
                    let history = agent.history();
                    if history.is_empty() {
                        eprintln!("(no history)");
                    }
                    for (i, turn) in history.iter().enumerate() {
                        println!("{}. Human: {}", i + 1, turn.question);
                        println!("   AI: {}", turn.answer);
                    }
                }
                ChatInput::Reset => {
                    agent.reset_history();
                    eprintln!("History cleared");
                }
                ChatInput::Persona(path) => {
                    match podium_prompt::load_persona(&path) {
                        Ok(system_prompt) => {
                            agent_config.system_prompt = system_prompt;
                            // New identity: the cache rebuilds and history starts empty.
                            agent = cache.get_or_create(&agent_config).await?;
                            eprintln!("Persona switched to {}", path.display());
                        }
                        Err(e) => eprintln!("Could not load persona: {}", e),
                    }
                }
                ChatInput::Question(question) => match agent.ask_with_sources(&question).await {
                    Ok(response) => {
                        println!("{}", response.answer);
                        if self.sources {
                            super::ask::print_sources(&response);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Question failed: {}", e);
                        eprintln!("Error: {}", e);
                    }
                },
            }
        }

        tracing::info!("Chat session ended after {} turns", agent.history().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_and_commands() {
        assert_eq!(
            ChatInput::parse("  What color is the sky?  "),
            ChatInput::Question("What color is the sky?".to_string())
        );
        assert_eq!(ChatInput::parse(""), ChatInput::Empty);
        assert_eq!(ChatInput::parse("/history"), ChatInput::History);
        assert_eq!(ChatInput::parse("/reset"), ChatInput::Reset);
        assert_eq!(ChatInput::parse("/quit"), ChatInput::Quit);
        assert_eq!(ChatInput::parse("/exit"), ChatInput::Quit);
        assert_eq!(
            ChatInput::parse("/persona personas/opposition.txt"),
            ChatInput::Persona(PathBuf::from("personas/opposition.txt"))
        );
    }

    #[test]
    fn test_parse_unknown_and_incomplete_commands() {
        assert_eq!(
            ChatInput::parse("/persona"),
            ChatInput::Unknown("/persona".to_string())
        );
        assert_eq!(
            ChatInput::parse("/dance now"),
            ChatInput::Unknown("/dance now".to_string())
        );
    }
}
