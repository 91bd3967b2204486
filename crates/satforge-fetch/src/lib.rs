//! satforge-fetch — question bank API client and corpus crawler.

pub mod client;
pub mod crawl;
pub mod error;

pub use client::{QuestionBankClient, QuestionSummary};
pub use crawl::{crawl, CrawlOptions};
pub use error::FetchError;
