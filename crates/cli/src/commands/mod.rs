//! Command handlers for the Podium CLI.

pub mod ask;
pub mod chat;
pub mod corpus;
pub mod personas;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use corpus::CorpusCommand;
pub use personas::PersonasCommand;

use podium_core::{AppConfig, AppResult};
use podium_knowledge::{AgentCache, AgentOptions, AgentServices, ProgressReporter};
use std::sync::Arc;

/// Build an agent cache from the final configuration.
///
/// Progress lines go to stderr so stdout carries only answers.
pub(crate) fn build_cache(config: &AppConfig, show_progress: bool) -> AppResult<AgentCache> {
    let options = AgentOptions::from_app_config(config)?;
    let services = AgentServices::from_app_config(config)?;

    let progress = if show_progress {
        ProgressReporter::new(Arc::new(|event| eprintln!("{}", event.format_simple())))
    } else {
        ProgressReporter::noop()
    };

    Ok(AgentCache::new(options, services).with_progress(progress))
}
