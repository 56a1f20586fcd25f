//! Prompt system for Podium.
//!
//! This crate provides:
//! - The fixed four-section question template (Handlebars)
//! - Context joining for retrieved chunks
//! - Persona (system prompt) file loading

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{compose_prompt, join_context, PromptComposer, CONTEXT_SEPARATOR};
pub use loader::{list_personas, load_persona};
pub use types::{PersonaEntry, PromptInput, PromptSection};
