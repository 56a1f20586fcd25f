//! Prompt composer for the retrieval agent.
//!
//! The question prompt is a fixed Handlebars template with four labelled
//! sections. Composition is a pure function of its four inputs.

use crate::types::PromptInput;
use podium_core::{AppError, AppResult};
use handlebars::Handlebars;

const TEMPLATE_NAME: &str = "question";

/// Separator placed between retrieved chunk texts in the context section.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// The question template. Section order is fixed.
pub const QUESTION_TEMPLATE: &str = "SYSTEM PROMPT: {{system_prompt}}
Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.
----------------
CONTEXT: {{context}}
----------------
CHAT HISTORY: {{chat_history}}
----------------
QUESTION: {{question}}
----------------
Helpful Answer:";

/// Compiled question template.
///
/// Build once and reuse; `compose` has no side effects.
pub struct PromptComposer {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for PromptComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptComposer").finish_non_exhaustive()
    }
}

impl PromptComposer {
    /// Compile the question template.
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Plain text prompt, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        registry
            .register_template_string(TEMPLATE_NAME, QUESTION_TEMPLATE)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self { registry })
    }

    /// Render the prompt for one question.
    pub fn compose(&self, input: &PromptInput) -> AppResult<String> {
        let rendered = self
            .registry
            .render(TEMPLATE_NAME, input)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

        tracing::debug!(
            "Composed prompt: {} bytes ({} bytes of context, {} bytes of history)",
            rendered.len(),
            input.context.len(),
            input.chat_history.len()
        );

        Ok(rendered)
    }
}

/// Compose a prompt with a freshly compiled template.
///
/// # Example
/// ```no_run
/// use podium_prompt::{compose_prompt, PromptInput};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let input = PromptInput::new("You're a helpful assistant.", "The sky is blue.", "", "What color is the sky?");
/// let prompt = compose_prompt(&input)?;
/// assert!(prompt.starts_with("SYSTEM PROMPT:"));
/// # Ok(())
/// # }
/// ```
pub fn compose_prompt(input: &PromptInput) -> AppResult<String> {
    PromptComposer::new()?.compose(input)
}

/// Join retrieved texts into the context section, keeping retrieval order.
pub fn join_context<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|t| t.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
