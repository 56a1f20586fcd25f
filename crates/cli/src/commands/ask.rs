//! Ask command handler.

use clap::Args;
use podium_core::{AppConfig, AppError, AppResult};
use podium_knowledge::{AgentConfig, RagResponse};

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the sources the answer was grounded on
    #[arg(long)]
    pub sources: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        if self.question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let cache = super::build_cache(config, !self.json)?;
        let agent = cache
            .get_or_create(&AgentConfig::from_app_config(config)?)
            .await?;

        let response = agent.ask_with_sources(&self.question).await?;

        if self.json {
            println!("{}", render_json(&response, self.sources, &config.model)?);
        } else {
            println!("{}", response.answer);
            if self.sources {
                print_sources(&response);
            }
        }

        Ok(())
    }
}

fn render_json(response: &RagResponse, with_sources: bool, model: &str) -> AppResult<String> {
    let mut output = serde_json::json!({
        "answer": response.answer,
        "model": model,
    });
    if with_sources {
        output["sources"] = serde_json::to_value(&response.sources)?;
        output["maxScore"] = serde_json::json!(response.max_score);
    }

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Print source references after an answer.
pub(crate) fn print_sources(response: &RagResponse) {
    if response.sources.is_empty() {
        return;
    }

    println!();
    println!("Sources:");
    for (i, source) in response.sources.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, source.source, source.location);
        println!("     {}", source.snippet.replace('\n', " "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_knowledge::RagSourceRef;

    fn response() -> RagResponse {
        RagResponse::new(
            "Blue.".to_string(),
            vec![RagSourceRef {
                source: "colors.txt".to_string(),
                location: "bytes 0-20".to_string(),
                snippet: "The sky is blue. Gra".to_string(),
            }],
            0.75,
        )
    }

    #[test]
    fn test_render_json_without_sources() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&response(), false, "gpt-4o").unwrap()).unwrap();
        assert_eq!(json["answer"], "Blue.");
        assert_eq!(json["model"], "gpt-4o");
        assert!(json.get("sources").is_none());
    }

    #[test]
    fn test_render_json_with_sources() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&response(), true, "gpt-4o").unwrap()).unwrap();
        assert_eq!(json["sources"][0]["source"], "colors.txt");
        assert_eq!(json["sources"][0]["location"], "bytes 0-20");
    }
}
