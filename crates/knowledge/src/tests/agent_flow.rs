//! End-to-end agent scenarios with fake services.

use crate::embeddings::MockProvider;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::rag::{AgentCache, AgentConfig, AgentOptions, AgentServices, RetrievalAgent};
use crate::ChunkConfig;
use async_trait::async_trait;
use podium_core::{AppError, AppResult};
use podium_llm::{LlmClient, LlmRequest, LlmResponse};
use podium_prompt::PromptSection;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Records every prompt and replies after an optional delay.
#[derive(Debug, Default)]
struct CapturingLlm {
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

#[async_trait]
impl LlmClient for CapturingLlm {
    fn provider_name(&self) -> &str {
        "capturing"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(LlmResponse {
            content: "The sky is blue.".to_string(),
            model: request.model.clone(),
            usage: Default::default(),
        })
    }
}

fn sky_corpus() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("colors.txt"),
        "The sky is blue. Grass is green.",
    )
    .unwrap();
    temp
}

fn small_chunks() -> AgentOptions {
    AgentOptions {
        chunk: ChunkConfig::new(20, 5).unwrap(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_end_to_end_sky_question() {
        let corpus = sky_corpus();
        let llm = Arc::new(CapturingLlm::default());
        let services = AgentServices::new(Arc::new(MockProvider::new(1024)), llm.clone());

        let mut agent = RetrievalAgent::new(
            AgentConfig::new(corpus.path(), "You're a helpful assistant."),
            small_chunks(),
            services,
        )
        .unwrap();
        agent.initialize().await.unwrap();
        assert_eq!(agent.chunk_count(), 2);

        let response = agent
            .ask_with_sources("What color is the sky?")
            .await
            .unwrap();
        assert_eq!(response.answer, "The sky is blue.");

        let top = &response.sources[0].snippet;
        assert!(top.contains("sky") && top.contains("blue"), "top chunk: {}", top);

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];

        let positions: Vec<usize> = PromptSection::ALL
            .iter()
            .map(|section| {
                prompt
                    .find(section.label())
                    .unwrap_or_else(|| panic!("missing {}", section.label()))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(prompt.starts_with("SYSTEM PROMPT: You're a helpful assistant."));
        assert!(prompt.contains("CONTEXT: The sky is blue. Gra"));
        assert!(prompt.contains("QUESTION: What color is the sky?"));
        assert!(prompt.ends_with("Helpful Answer:"));
    }

    #[tokio::test]
    async fn test_second_prompt_carries_history() {
        let corpus = sky_corpus();
        let llm = Arc::new(CapturingLlm::default());
        let services = AgentServices::new(Arc::new(MockProvider::new(1024)), llm.clone());

        let mut agent = RetrievalAgent::new(
            AgentConfig::new(corpus.path(), "You're a helpful assistant."),
            small_chunks(),
            services,
        )
        .unwrap();
        agent.initialize().await.unwrap();

        agent.ask("What color is the sky?").await.unwrap();
        agent.ask("And the grass?").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("CHAT HISTORY: \n"));
        assert!(prompts[1]
            .contains("CHAT HISTORY: Human: What color is the sky?\nAI: The sky is blue.\n"));

        let history = agent.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "What color is the sky?");
        assert_eq!(history[1].question, "And the grass?");
    }

    #[tokio::test]
    async fn test_slow_completion_times_out_without_recording() {
        let corpus = sky_corpus();
        let llm = Arc::new(CapturingLlm {
            delay: Some(Duration::from_millis(500)),
            ..Default::default()
        });
        let services = AgentServices::new(Arc::new(MockProvider::new(64)), llm);
        let options = AgentOptions {
            request_timeout: Duration::from_millis(50),
            ..small_chunks()
        };

        let mut agent = RetrievalAgent::new(
            AgentConfig::new(corpus.path(), "You're a helpful assistant."),
            options,
            services,
        )
        .unwrap();
        agent.initialize().await.unwrap();

        let result = agent.ask("What color is the sky?").await;
        assert!(matches!(result, Err(AppError::Timeout { .. })));
        assert!(agent.history().is_empty());
    }

    #[tokio::test]
    async fn test_progress_phases_in_order() {
        let corpus = sky_corpus();
        let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::new(Arc::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        let services = AgentServices::new(
            Arc::new(MockProvider::new(64)),
            Arc::new(CapturingLlm::default()),
        );
        let mut agent = RetrievalAgent::new(
            AgentConfig::new(corpus.path(), "You're a helpful assistant."),
            small_chunks(),
            services,
        )
        .unwrap()
        .with_progress(reporter);
        agent.initialize().await.unwrap();

        let mut phases: Vec<String> = events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.phase.clone())
            .collect();
        phases.dedup();
        assert_eq!(phases, vec!["load", "chunk", "embed", "index"]);
    }

    #[tokio::test]
    async fn test_cache_config_change_yields_empty_history() {
        let corpus = sky_corpus();
        let services = AgentServices::new(
            Arc::new(MockProvider::new(64)),
            Arc::new(CapturingLlm::default()),
        );
        let cache = AgentCache::new(small_chunks(), services);

        let config = AgentConfig::new(corpus.path(), "You're a helpful assistant.");
        let agent = cache.get_or_create(&config).await.unwrap();
        agent.ask("What color is the sky?").await.unwrap();
        agent.ask("And the grass?").await.unwrap();
        assert_eq!(agent.history().len(), 2);

        let changed = AgentConfig::new(corpus.path(), "You are a debate moderator.");
        let fresh = cache.get_or_create(&changed).await.unwrap();
        assert!(fresh.history().is_empty());
        assert!(fresh.is_ready());
    }
}
