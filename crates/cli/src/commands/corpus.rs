//! Corpus inspection command handler.

use clap::Args;
use podium_core::{AppConfig, AppResult};
use podium_knowledge::{corpus_stats, ChunkConfig, DocumentStats};

/// Load and chunk the corpus, printing per-document statistics
#[derive(Args, Debug)]
pub struct CorpusCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusCommand {
    /// Runs offline; no embeddings are computed.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Inspecting corpus at {:?}", config.corpus_path);

        let chunk_config = ChunkConfig::new(config.chunk_size, config.chunk_overlap)?;
        let stats = corpus_stats(&config.corpus_path, &config.corpus_extension, chunk_config)?;

        if self.json {
            let output = serde_json::json!({
                "corpus": config.corpus_path,
                "chunkSize": config.chunk_size,
                "chunkOverlap": config.chunk_overlap,
                "documents": stats,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", render_table(&stats));
        }

        Ok(())
    }
}

fn render_table(stats: &[DocumentStats]) -> String {
    let mut out = format!(
        "{:<40} {:>8} {:>7} {:>10} {:>9}\n",
        "DOCUMENT", "CHARS", "CHUNKS", "SEPARATOR", "HARD CUT"
    );

    for doc in stats {
        out.push_str(&format!(
            "{:<40} {:>8} {:>7} {:>10} {:>9}\n",
            doc.source.display(),
            doc.chars,
            doc.chunks,
            doc.separator_cuts,
            doc.hard_cuts
        ));
    }

    let total_chars: usize = stats.iter().map(|d| d.chars).sum();
    let total_chunks: usize = stats.iter().map(|d| d.chunks).sum();
    out.push_str(&format!(
        "{} documents, {} chars, {} chunks\n",
        stats.len(),
        total_chars,
        total_chunks
    ));

    out
}
