//! Configuration management for Podium.
//!
//! Configuration is layered, later layers overriding earlier ones:
//! - Built-in defaults
//! - YAML config file (`--config`, `PODIUM_CONFIG` or `./podium.yaml`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "podium.yaml";

/// Providers the chat side knows how to build.
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai"];

/// Providers the embedding side knows how to build.
pub const KNOWN_EMBEDDING_PROVIDERS: &[&str] = &["openai", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Directory holding the document corpus
    pub corpus_path: PathBuf,

    /// File extension registered with the corpus loader (without dot)
    pub corpus_extension: String,

    /// System instruction given to the agent
    pub system_prompt: String,

    /// Persona file whose contents replace `system_prompt` when set
    pub persona_file: Option<PathBuf>,

    /// Maximum characters per chunk
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per question
    pub top_k: usize,

    /// Keep only the last N conversation turns (unbounded when `None`)
    pub history_limit: Option<usize>,

    /// Chat completion provider (e.g., "openai")
    pub provider: String,

    /// Chat model identifier
    pub model: String,

    /// Sampling temperature for the chat model
    pub temperature: Option<f32>,

    /// Custom API base URL
    pub endpoint: Option<String>,

    /// Environment variable holding the provider API key
    pub api_key_env: String,

    /// API key resolved from `PODIUM_API_KEY`
    pub api_key: Option<String>,

    /// Embedding settings
    pub embedding: EmbeddingSettings,

    /// Upper bound for every network call, in seconds
    pub request_timeout_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingSettings {
    /// Provider name: "openai" or "mock"
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Vector dimension (used by the mock provider and for validation)
    pub dimensions: usize,

    /// Maximum inputs per embedding request
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
            batch_size: 512,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    corpus: Option<CorpusSection>,
    agent: Option<AgentSection>,
    llm: Option<LlmSection>,
    embedding: Option<EmbeddingSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CorpusSection {
    path: Option<PathBuf>,
    extension: Option<String>,
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AgentSection {
    #[serde(rename = "systemPrompt")]
    system_prompt: Option<String>,
    #[serde(rename = "personaFile")]
    persona_file: Option<PathBuf>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    #[serde(rename = "historyLimit")]
    history_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    #[serde(rename = "batchSize")]
    batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            corpus_path: PathBuf::from("public/documents"),
            corpus_extension: "txt".to_string(),
            system_prompt: "You're a helpful assistant.".to_string(),
            persona_file: None,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            history_limit: None,
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            temperature: Some(1.2),
            endpoint: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            embedding: EmbeddingSettings::default(),
            request_timeout_secs: 60,
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `PODIUM_CONFIG`: Path to config file
    /// - `PODIUM_CORPUS`: Corpus directory
    /// - `PODIUM_SYSTEM_PROMPT`: System instruction
    /// - `PODIUM_MODEL`: Chat model identifier
    /// - `PODIUM_ENDPOINT`: API base URL
    /// - `PODIUM_API_KEY`: API key (wins over `llm.apiKeyEnv`)
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use podium_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Corpus: {:?}", config.corpus_path);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file
            .or_else(|| std::env::var("PODIUM_CONFIG").ok().map(PathBuf::from));

        match config.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        config.apply_env();

        Ok(config)
    }

    /// Environment variables override YAML config.
    fn apply_env(&mut self) {
        if let Ok(corpus) = std::env::var("PODIUM_CORPUS") {
            self.corpus_path = PathBuf::from(corpus);
        }

        if let Ok(system_prompt) = std::env::var("PODIUM_SYSTEM_PROMPT") {
            self.system_prompt = system_prompt;
        }

        if let Ok(model) = std::env::var("PODIUM_MODEL") {
            self.model = model;
        }

        if let Ok(endpoint) = std::env::var("PODIUM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        self.api_key = std::env::var("PODIUM_API_KEY").ok();

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        let file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(corpus) = file.corpus {
            if let Some(path) = corpus.path {
                result.corpus_path = path;
            }
            if let Some(extension) = corpus.extension {
                result.corpus_extension = extension.trim_start_matches('.').to_string();
            }
            if let Some(size) = corpus.chunk_size {
                result.chunk_size = size;
            }
            if let Some(overlap) = corpus.chunk_overlap {
                result.chunk_overlap = overlap;
            }
        }

        if let Some(agent) = file.agent {
            if let Some(system_prompt) = agent.system_prompt {
                result.system_prompt = system_prompt;
            }
            if agent.persona_file.is_some() {
                result.persona_file = agent.persona_file;
            }
            if let Some(top_k) = agent.top_k {
                result.top_k = top_k;
            }
            if agent.history_limit.is_some() {
                result.history_limit = agent.history_limit;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.temperature.is_some() {
                result.temperature = llm.temperature;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(env) = llm.api_key_env {
                result.api_key_env = env;
            }
            if let Some(secs) = llm.timeout_secs {
                result.request_timeout_secs = secs;
            }
        }

        if let Some(embedding) = file.embedding {
            if let Some(provider) = embedding.provider {
                result.embedding.provider = provider;
            }
            if let Some(model) = embedding.model {
                result.embedding.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding.dimensions = dimensions;
            }
            if let Some(batch_size) = embedding.batch_size {
                result.embedding.batch_size = batch_size;
            }
        }

        if let Some(logging) = file.logging {
            if logging.level.is_some() {
                result.log_level = logging.level;
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and file.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(corpus) = overrides.corpus {
            self.corpus_path = corpus;
        }

        if let Some(system_prompt) = overrides.system_prompt {
            self.system_prompt = system_prompt;
        }

        if overrides.persona.is_some() {
            self.persona_file = overrides.persona;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }

        if overrides.offline {
            self.embedding.provider = "mock".to_string();
            self.embedding.model = "trigram-v1".to_string();
            self.embedding.dimensions = 384;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if overrides.log_json {
            self.log_json = true;
        }

        self
    }

    /// Resolve the API key: `PODIUM_API_KEY` first, then `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate the configuration before any work starts.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_LLM_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_LLM_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::InvalidChunkConfig {
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            });
        }

        if self.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 || self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding batch size and dimensions must be non-zero".to_string(),
            ));
        }

        if self.corpus_extension.is_empty() {
            return Err(AppError::Config(
                "Corpus extension cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub corpus: Option<PathBuf>,
    pub system_prompt: Option<String>,
    pub persona: Option<PathBuf>,
    pub model: Option<String>,
    pub top_k: Option<usize>,
    pub offline: bool,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.corpus_path, PathBuf::from("public/documents"));
        assert_eq!(config.system_prompt, "You're a helpful assistant.");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.top_k, 4);
        assert!(config.history_limit.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_merge_yaml_sections() {
        let yaml = r#"
corpus:
  path: debate/docs
  extension: .md
  chunkSize: 500
  chunkOverlap: 50
agent:
  systemPrompt: "You argue for the motion."
  topK: 6
  historyLimit: 10
llm:
  model: gpt-4o-mini
  temperature: 0.7
  timeoutSecs: 15
embedding:
  provider: mock
  dimensions: 64
logging:
  level: debug
  color: false
  json: true
"#;
        let merged = AppConfig::default().merge_yaml_str(yaml).unwrap();

        assert_eq!(merged.corpus_path, PathBuf::from("debate/docs"));
        assert_eq!(merged.corpus_extension, "md");
        assert_eq!(merged.chunk_size, 500);
        assert_eq!(merged.chunk_overlap, 50);
        assert_eq!(merged.system_prompt, "You argue for the motion.");
        assert_eq!(merged.top_k, 6);
        assert_eq!(merged.history_limit, Some(10));
        assert_eq!(merged.model, "gpt-4o-mini");
        assert_eq!(merged.temperature, Some(0.7));
        assert_eq!(merged.request_timeout_secs, 15);
        assert_eq!(merged.embedding.provider, "mock");
        assert_eq!(merged.embedding.dimensions, 64);
        assert_eq!(merged.embedding.model, "text-embedding-ada-002");
        assert_eq!(merged.log_level, Some("debug".to_string()));
        assert!(merged.no_color);
        assert!(merged.log_json);
    }

    #[test]
    fn test_merge_yaml_empty_keeps_defaults() {
        let merged = AppConfig::default().merge_yaml_str("{}").unwrap();
        assert_eq!(merged.model, "gpt-4o");
        assert_eq!(merged.top_k, 4);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("podium.yaml");
        std::fs::write(&path, "agent:\n  topK: 2\n").unwrap();

        let config = AppConfig::load(Some(path.clone())).unwrap();
        assert_eq!(config.top_k, 2);
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::load(Some(temp.path().join("missing.yaml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(CliOverrides {
            corpus: Some(PathBuf::from("other")),
            model: Some("gpt-4o-mini".to_string()),
            top_k: Some(2),
            offline: true,
            verbose: true,
            ..Default::default()
        });

        assert_eq!(config.corpus_path, PathBuf::from("other"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.top_k, 2);
        assert_eq!(config.embedding.provider, "mock");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_default() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlap_not_below_size() {
        for (size, overlap) in [(10, 10), (10, 11), (0, 0)] {
            let config = AppConfig {
                chunk_size: size,
                chunk_overlap: overlap,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(AppError::InvalidChunkConfig { .. })
            ));
        }
    }

    #[test]
    fn test_validate_zero_top_k() {
        let config = AppConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
