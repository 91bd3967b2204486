//! The `satforge fetch` command.

use std::path::PathBuf;

use anyhow::Result;

use satforge_core::corpus::save_corpus;
use satforge_core::model::Section;
use satforge_fetch::{crawl, CrawlOptions, QuestionBankClient};

pub async fn execute(
    output: PathBuf,
    sections_str: Option<String>,
    delay_ms: u64,
    limit: Option<usize>,
    base_url: Option<String>,
) -> Result<()> {
    let sections: Vec<Section> = match &sections_str {
        Some(s) => s
            .split(',')
            .map(|name| {
                name.trim()
                    .parse::<Section>()
                    .map_err(|e| anyhow::anyhow!("{e}"))
            })
            .collect::<Result<Vec<_>>>()?,
        None => Section::ALL.to_vec(),
    };

    let client = QuestionBankClient::new(base_url);
    let options = CrawlOptions {
        sections,
        delay_ms,
        limit,
    };

    let corpus = crawl(&client, &options).await?;
    anyhow::ensure!(!corpus.is_empty(), "crawl produced no questions");

    save_corpus(&corpus, &output)?;
    eprintln!("Saved {} questions to: {}", corpus.len(), output.display());

    // Compact binary sibling for fast loads.
    let compact = output.with_extension("bin");
    if compact != output {
        save_corpus(&corpus, &compact)?;
        eprintln!("Compact corpus: {}", compact.display());
    }

    Ok(())
}
