//! Retrieval agent types.

use crate::chunk::{calculate_hash, ChunkConfig};
use crate::vector_index::DEFAULT_TOP_K;
use podium_core::config::EmbeddingSettings;
use podium_core::{AppConfig, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Identity of a retrieval agent.
///
/// Two agents with equal configurations are interchangeable; changing either
/// field means a new index and a fresh conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Directory holding the document corpus
    pub corpus_path: PathBuf,

    /// System instruction placed at the top of every prompt
    pub system_prompt: String,
}

impl AgentConfig {
    pub fn new(corpus_path: impl Into<PathBuf>, system_prompt: impl Into<String>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Build from application config, reading the persona file if one is set.
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        let system_prompt = match &config.persona_file {
            Some(path) => podium_prompt::load_persona(path)?,
            None => config.system_prompt.clone(),
        };

        Ok(Self::new(config.corpus_path.clone(), system_prompt))
    }

    /// Stable SHA-256 key over both fields.
    pub fn cache_key(&self) -> String {
        let material = format!(
            "{}\u{0}{}",
            self.corpus_path.to_string_lossy(),
            self.system_prompt
        );
        calculate_hash(&material)
    }
}

/// Process-wide agent settings. Not part of agent identity.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub chunk: ChunkConfig,

    /// Chunks retrieved per question
    pub top_k: usize,

    /// Corpus file extension, without dot
    pub extension: String,

    /// Chat model identifier
    pub chat_model: String,

    pub temperature: Option<f32>,

    /// Keep only the last N turns in the prompt and history
    pub history_limit: Option<usize>,

    /// Inputs per embedding request
    pub embedding_batch_size: usize,

    /// Upper bound for each embedding or completion call
    pub request_timeout: Duration,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig::default(),
            top_k: DEFAULT_TOP_K,
            extension: "txt".to_string(),
            chat_model: "gpt-4o".to_string(),
            temperature: Some(1.2),
            history_limit: None,
            embedding_batch_size: EmbeddingSettings::default().batch_size,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl AgentOptions {
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            chunk: ChunkConfig::new(config.chunk_size, config.chunk_overlap)?,
            top_k: config.top_k,
            extension: config.corpus_extension.clone(),
            chat_model: config.model.clone(),
            temperature: config.temperature,
            history_limit: config.history_limit,
            embedding_batch_size: config.embedding.batch_size,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }
}

/// A single source reference used to answer a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagSourceRef {
    /// Source file name (e.g., "motion.txt")
    pub source: String,

    /// Human-readable location within the source
    pub location: String,

    /// Short snippet of the retrieved text
    pub snippet: String,
}

/// Answer plus the sources it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// Text returned by the chat model
    pub answer: String,

    /// De-duplicated sources, in retrieval order
    pub sources: Vec<RagSourceRef>,

    /// Highest similarity among retrieved chunks
    pub max_score: f32,
}

impl RagResponse {
    pub fn new(answer: String, sources: Vec<RagSourceRef>, max_score: f32) -> Self {
        Self {
            answer,
            sources,
            max_score,
        }
    }
}
