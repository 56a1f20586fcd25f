//! Retrieval-augmented answering.
//!
//! [`RetrievalAgent`] ties the pipeline together: corpus loading, chunking,
//! embedding and indexing at initialization; retrieval, prompt composition
//! and chat completion per question. [`AgentCache`] keeps at most one agent
//! per process, keyed on its [`AgentConfig`].

pub mod agent;
pub mod cache;
pub mod history;
pub mod retriever;
pub mod sources;
pub mod types;

pub use agent::{AgentServices, RetrievalAgent};
pub use cache::AgentCache;
pub use history::{ConversationHistory, Turn};
pub use retriever::Retriever;
pub use sources::map_chunks_to_sources;
pub use types::{AgentConfig, AgentOptions, RagResponse, RagSourceRef};
