//! Corpus crawling: listing, paced detail fetches, retry on rate limits.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use satforge_core::model::{Question, Section};

use crate::client::QuestionBankClient;
use crate::error::FetchError;

const MAX_ATTEMPTS: u32 = 3;
const PROGRESS_EVERY: usize = 25;

/// Crawl parameters.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Sections to crawl, in order.
    pub sections: Vec<Section>,
    /// Pause between detail fetches.
    pub delay_ms: u64,
    /// Cap on questions per section, mainly for smoke runs.
    pub limit: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            sections: Section::ALL.to_vec(),
            delay_ms: 250,
            limit: None,
        }
    }
}

/// Crawl the question bank and return the normalized corpus.
///
/// Listing failures abort the crawl. A question whose detail fetch fails
/// permanently is skipped with a warning; transient failures are retried
/// with the server's retry-after hint when one is given.
pub async fn crawl(client: &QuestionBankClient, options: &CrawlOptions) -> Result<Vec<Question>> {
    let mut corpus = Vec::new();

    for &section in &options.sections {
        let listing = client
            .list_questions(section)
            .await
            .with_context(|| format!("failed to list {section} questions"))?;
        let total = options
            .limit
            .map_or(listing.len(), |cap| cap.min(listing.len()));
        info!(%section, total, "listed questions");

        let mut skipped = 0usize;
        for (i, summary) in listing.iter().take(total).enumerate() {
            match fetch_with_retry(client, summary, section).await {
                Ok(question) => {
                    debug!(id = %question.id, "fetched question");
                    corpus.push(question);
                }
                Err(e) => {
                    warn!(id = summary.id().unwrap_or("?"), error = %e, "skipping question");
                    skipped += 1;
                }
            }

            if (i + 1) % PROGRESS_EVERY == 0 {
                info!(%section, fetched = i + 1, total, "crawl progress");
            }
            if options.delay_ms > 0 && i + 1 < total {
                tokio::time::sleep(Duration::from_millis(options.delay_ms)).await;
            }
        }

        info!(%section, fetched = total - skipped, skipped, "section complete");
    }

    Ok(corpus)
}

async fn fetch_with_retry(
    client: &QuestionBankClient,
    summary: &crate::client::QuestionSummary,
    section: Section,
) -> Result<Question, FetchError> {
    let mut last_error = None;
    for attempt in 1..=MAX_ATTEMPTS {
        match client.fetch_question(summary, section).await {
            Ok(question) => return Ok(question),
            Err(e) if e.is_permanent() => return Err(e),
            Err(e) => {
                if attempt < MAX_ATTEMPTS {
                    let delay = e.retry_after_ms().unwrap_or(1000 * attempt as u64);
                    warn!(
                        id = summary.id().unwrap_or("?"),
                        attempt, delay_ms = delay, error = %e, "retrying fetch"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or(FetchError::NetworkError("retries exhausted".into())))
}
