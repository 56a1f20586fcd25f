//! Prompt types.

use serde::Serialize;
use std::path::PathBuf;

/// The four values substituted into the question template.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PromptInput {
    /// Persona or system instruction for the agent
    pub system_prompt: String,

    /// Retrieved chunk texts, already joined
    pub context: String,

    /// Rendered conversation history (may be empty)
    pub chat_history: String,

    /// The current question
    pub question: String,
}

impl PromptInput {
    pub fn new(
        system_prompt: impl Into<String>,
        context: impl Into<String>,
        chat_history: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            context: context.into(),
            chat_history: chat_history.into(),
            question: question.into(),
        }
    }
}

/// Labelled sections of the composed prompt, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSection {
    SystemPrompt,
    Context,
    ChatHistory,
    Question,
}

impl PromptSection {
    /// All sections in the order they appear in the prompt.
    pub const ALL: [PromptSection; 4] = [
        PromptSection::SystemPrompt,
        PromptSection::Context,
        PromptSection::ChatHistory,
        PromptSection::Question,
    ];

    /// Label as written in the prompt, including the colon.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SystemPrompt => "SYSTEM PROMPT:",
            Self::Context => "CONTEXT:",
            Self::ChatHistory => "CHAT HISTORY:",
            Self::Question => "QUESTION:",
        }
    }
}

/// A persona file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaEntry {
    /// File stem, used as the persona name
    pub name: String,

    /// Full path to the file
    pub path: PathBuf,
}
