//! The retrieval agent.

use crate::chunk::{Chunk, ChunkSplitter};
use crate::embeddings::{create_provider, Embedder, EmbeddingProvider};
use crate::loader::load_corpus;
use crate::progress::ProgressReporter;
use crate::rag::history::{ConversationHistory, Turn};
use crate::rag::retriever::Retriever;
use crate::rag::sources::map_chunks_to_sources;
use crate::rag::types::{AgentConfig, AgentOptions, RagResponse};
use crate::vector_index::{FlatIndex, VectorIndex};
use podium_core::{AppConfig, AppError, AppResult};
use podium_llm::{create_client, LlmClient, LlmRequest};
use podium_prompt::{join_context, PromptComposer, PromptInput};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// External capabilities the agent calls out to.
#[derive(Clone)]
pub struct AgentServices {
    pub embeddings: Arc<dyn EmbeddingProvider>,
    pub llm: Arc<dyn LlmClient>,
}

impl std::fmt::Debug for AgentServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentServices")
            .field("embeddings", &self.embeddings.provider_name())
            .field("llm", &self.llm.provider_name())
            .finish()
    }
}

impl AgentServices {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, llm: Arc<dyn LlmClient>) -> Self {
        Self { embeddings, llm }
    }

    /// Build the configured embedding provider and chat client.
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        let api_key = config.resolve_api_key();
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let embeddings = create_provider(
            &config.embedding,
            config.endpoint.as_deref(),
            api_key.as_deref(),
            timeout,
        )?;
        let llm = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
            timeout,
        )?;

        Ok(Self::new(embeddings, llm))
    }
}

enum AgentState {
    Uninitialized,
    Ready(Retriever),
}

/// Answers questions over a document corpus, keeping conversation history.
///
/// Starts `Uninitialized`; [`initialize`](Self::initialize) builds the vector
/// index and moves it to ready. Questions asked before that fail with
/// [`AppError::NotInitialized`].
pub struct RetrievalAgent {
    config: AgentConfig,
    options: AgentOptions,
    services: AgentServices,
    composer: PromptComposer,
    progress: ProgressReporter,
    state: AgentState,
    history: Mutex<ConversationHistory>,
}

impl std::fmt::Debug for RetrievalAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalAgent")
            .field("config", &self.config)
            .field("ready", &self.is_ready())
            .field("chunks", &self.chunk_count())
            .finish()
    }
}

impl RetrievalAgent {
    pub fn new(
        config: AgentConfig,
        options: AgentOptions,
        services: AgentServices,
    ) -> AppResult<Self> {
        let history = ConversationHistory::new(options.history_limit);

        Ok(Self {
            config,
            options,
            services,
            composer: PromptComposer::new()?,
            progress: ProgressReporter::noop(),
            state: AgentState::Uninitialized,
            history: Mutex::new(history),
        })
    }

    /// Report initialization progress through `progress`.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AgentState::Ready(_))
    }

    /// Number of indexed chunks (0 before initialization).
    pub fn chunk_count(&self) -> usize {
        match &self.state {
            AgentState::Ready(retriever) => retriever.index().len(),
            AgentState::Uninitialized => 0,
        }
    }

    /// Load, chunk, embed and index the corpus.
    ///
    /// On failure the agent is left uninitialized with no partial index.
    pub async fn initialize(&mut self) -> AppResult<()> {
        self.state = AgentState::Uninitialized;

        tracing::info!(
            corpus = %self.config.corpus_path.display(),
            "Initializing retrieval agent"
        );

        let corpus_path = self.config.corpus_path.clone();
        let extension = self.options.extension.clone();
        let progress = self.progress.clone();
        let documents =
            tokio::task::spawn_blocking(move || load_corpus(&corpus_path, &extension, &progress))
                .await
                .map_err(|e| AppError::Other(format!("Corpus loading task failed: {}", e)))??;

        let splitter = ChunkSplitter::new(self.options.chunk)?;
        let total_docs = documents.len() as u64;
        let mut chunks: Vec<Chunk> = Vec::new();
        for (i, document) in documents.iter().enumerate() {
            chunks.extend(splitter.split(document));
            self.progress
                .chunk(i as u64 + 1, Some(total_docs), chunks.len());
        }

        tracing::info!(
            "Split {} documents into {} chunks (size {}, overlap {})",
            documents.len(),
            chunks.len(),
            self.options.chunk.chunk_size,
            self.options.chunk.chunk_overlap
        );

        let embedder = Embedder::new(
            self.services.embeddings.clone(),
            self.options.embedding_batch_size,
            self.options.request_timeout,
        );
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_texts(&texts, &self.progress).await?;

        let index = FlatIndex::build(chunks, embeddings)?;
        self.progress.index(1, Some(1));

        tracing::info!(
            "Retrieval agent ready: {} chunks of dimension {}",
            index.len(),
            index.dimensions()
        );

        self.state = AgentState::Ready(Retriever::new(
            embedder,
            Arc::new(index),
            self.options.top_k,
        ));
        Ok(())
    }

    /// Answer a question and record it in the history.
    pub async fn ask(&self, question: &str) -> AppResult<String> {
        Ok(self.ask_with_sources(question).await?.answer)
    }

    /// Answer a question, returning the sources it was grounded on.
    pub async fn ask_with_sources(&self, question: &str) -> AppResult<RagResponse> {
        let retriever = match &self.state {
            AgentState::Ready(retriever) => retriever,
            AgentState::Uninitialized => return Err(AppError::NotInitialized),
        };

        if question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        tracing::info!("Answering question: {}", question);

        let results = retriever.retrieve(question).await?;
        let context = join_context(results.iter().map(|r| r.chunk.text.as_str()));

        // Snapshot only; concurrent asks may both miss each other's turn.
        let chat_history = self.lock_history().render();

        let prompt = self.composer.compose(&PromptInput::new(
            self.config.system_prompt.as_str(),
            context,
            chat_history,
            question,
        ))?;

        let mut request = LlmRequest::new(prompt, self.options.chat_model.as_str());
        if let Some(temperature) = self.options.temperature {
            request = request.with_temperature(temperature);
        }

        let timeout = self.options.request_timeout;
        let response = tokio::time::timeout(timeout, self.services.llm.complete(&request))
            .await
            .map_err(|_| AppError::Timeout {
                operation: "chat completion".to_string(),
                secs: timeout.as_secs(),
            })??;

        let answer = response.content;
        self.lock_history().push(question, answer.as_str());

        let max_score = results.first().map(|r| r.score).unwrap_or(0.0);
        let sources = map_chunks_to_sources(&results);

        tracing::debug!(
            "Answered with {} sources (max score {:.3})",
            sources.len(),
            max_score
        );

        Ok(RagResponse::new(answer, sources, max_score))
    }

    /// Snapshot of the conversation so far, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        self.lock_history().turns().to_vec()
    }

    /// Forget the conversation; the index is kept.
    pub fn reset_history(&self) {
        self.lock_history().clear();
    }

    fn lock_history(&self) -> MutexGuard<'_, ConversationHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
