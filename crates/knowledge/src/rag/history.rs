//! Conversation history for one retrieval agent.

use serde::{Deserialize, Serialize};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

/// Ordered (question, answer) pairs, oldest first.
///
/// Unbounded unless a limit is set, in which case the oldest turns are
/// dropped once the limit is exceeded.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    limit: Option<usize>,
}

impl ConversationHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            turns: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn {
            question: question.into(),
            answer: answer.into(),
        });

        if let Some(limit) = self.limit {
            if self.turns.len() > limit {
                let excess = self.turns.len() - limit;
                self.turns.drain(..excess);
            }
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render for the CHAT HISTORY section.
    ///
    /// Each turn is `Human: <question>\nAI: <answer>`; turns are separated by
    /// a blank line. Empty history renders as an empty string.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("Human: {}\nAI: {}", t.question, t.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_renders_empty() {
        let history = ConversationHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.render(), "");
    }

    #[test]
    fn test_render_format() {
        let mut history = ConversationHistory::new(None);
        history.push("What color is the sky?", "Blue.");
        history.push("And grass?", "Green.");

        assert_eq!(
            history.render(),
            "Human: What color is the sky?\nAI: Blue.\n\nHuman: And grass?\nAI: Green."
        );
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut history = ConversationHistory::default();
        for i in 0..100 {
            history.push(format!("q{}", i), format!("a{}", i));
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.turns()[0].question, "q0");
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = ConversationHistory::new(Some(2));
        history.push("q1", "a1");
        history.push("q2", "a2");
        history.push("q3", "a3");

        let questions: Vec<&str> = history.turns().iter().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec!["q2", "q3"]);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new(None);
        history.push("q", "a");
        history.clear();
        assert!(history.is_empty());
    }
}
