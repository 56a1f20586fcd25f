//! LLM integration crate for Podium.
//!
//! Provides a provider-agnostic chat completion abstraction. The retrieval
//! agent only depends on the [`LlmClient`] trait, so tests inject fakes and
//! production code injects the OpenAI client.
//!
//! # Example
//! ```no_run
//! use podium_llm::{LlmClient, LlmRequest, providers::OpenAiClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...", Duration::from_secs(60))?;
//! let request = LlmRequest::new("Hello, world!", "gpt-4o");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OpenAiClient;
