//! Single-slot cache of the active retrieval agent.

use crate::progress::ProgressReporter;
use crate::rag::agent::{AgentServices, RetrievalAgent};
use crate::rag::types::{AgentConfig, AgentOptions};
use podium_core::AppResult;
use std::sync::Arc;
use tokio::sync::Mutex;

struct CachedAgent {
    key: String,
    agent: Arc<RetrievalAgent>,
}

/// Holds at most one initialized agent, keyed on its [`AgentConfig`].
///
/// Lookups and rebuilds are serialized by an async mutex, so concurrent
/// callers with a new configuration build the index once. Callers holding
/// an `Arc` to a replaced agent keep using it until they drop it; they never
/// see the new agent's index or history.
pub struct AgentCache {
    options: AgentOptions,
    services: AgentServices,
    progress: ProgressReporter,
    slot: Mutex<Option<CachedAgent>>,
}

impl std::fmt::Debug for AgentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentCache")
            .field("options", &self.options)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

impl AgentCache {
    pub fn new(options: AgentOptions, services: AgentServices) -> Self {
        Self {
            options,
            services,
            progress: ProgressReporter::noop(),
            slot: Mutex::new(None),
        }
    }

    /// Report progress of every agent this cache builds.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Return the cached agent for `config`, building a new one if the
    /// configuration changed.
    ///
    /// The previous agent (and its history) is discarded before the rebuild
    /// starts; if the rebuild fails the cache is left empty.
    pub async fn get_or_create(&self, config: &AgentConfig) -> AppResult<Arc<RetrievalAgent>> {
        let key = config.cache_key();
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.key == key {
                tracing::debug!("Reusing cached retrieval agent");
                return Ok(Arc::clone(&cached.agent));
            }
        }

        if slot.take().is_some() {
            tracing::info!("Agent configuration changed, rebuilding");
        }

        let mut agent = RetrievalAgent::new(
            config.clone(),
            self.options.clone(),
            self.services.clone(),
        )?
        .with_progress(self.progress.clone());
        agent.initialize().await?;

        let agent = Arc::new(agent);
        *slot = Some(CachedAgent {
            key,
            agent: Arc::clone(&agent),
        });

        Ok(agent)
    }

    /// The cached agent, if any.
    pub async fn current(&self) -> Option<Arc<RetrievalAgent>> {
        self.slot
            .lock()
            .await
            .as_ref()
            .map(|cached| Arc::clone(&cached.agent))
    }

    /// Drop the cached agent.
    pub async fn invalidate(&self) {
        if self.slot.lock().await.take().is_some() {
            tracing::info!("Cached retrieval agent invalidated");
        }
    }
}
