//! Cross-module scenarios.

mod agent_flow;
mod rag_ranking;
