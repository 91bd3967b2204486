//! Question bank API client.
//!
//! Two endpoints: `get-questions` returns the metadata listing for a
//! section, `get-question` returns one question's full content keyed by its
//! external id. Raw API payloads are normalized into `satforge_core`
//! questions before anything else sees them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use satforge_core::model::{AnswerChoice, Difficulty, ModuleId, Question, Section};

use crate::error::FetchError;

const DEFAULT_BASE_URL: &str =
    "https://qbank-api.collegeboard.org/msreportingquestionbank-prod/questionbank/digital";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:138.0) Gecko/20100101 Firefox/138.0";
const QBANK_ORIGIN: &str = "https://satsuitequestionbank.collegeboard.org";

/// Assessment event id for the digital SAT.
const ASMT_EVENT_ID: u32 = 99;

fn section_query(section: Section) -> (u32, &'static str) {
    // (test id, comma-separated domain codes) as the question bank expects.
    match section {
        Section::ReadingWriting => (1, "INI,CAS,EOI,SEC"),
        Section::Math => (2, "H,P,Q,S"),
    }
}

/// One row of the `get-questions` listing: metadata only, no content.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSummary {
    #[serde(rename = "questionId")]
    pub question_id: Option<String>,
    pub external_id: Option<String>,
    #[serde(rename = "skill_cd")]
    pub skill_code: Option<String>,
    #[serde(rename = "skill_desc")]
    pub skill_desc: Option<String>,
    #[serde(rename = "score_band_range_cd")]
    pub score_band: Option<u8>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionSummary {
    /// The id used to fetch content and to identify the question downstream.
    pub fn id(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .or(self.question_id.as_deref())
    }
}

#[derive(Serialize)]
struct ListRequest {
    #[serde(rename = "asmtEventId")]
    asmt_event_id: u32,
    test: u32,
    domain: &'static str,
}

#[derive(Serialize)]
struct DetailRequest<'a> {
    external_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    stem: Option<String>,
    stimulus: Option<String>,
    rationale: Option<String>,
    #[serde(rename = "answerOptions", default)]
    answer_options: Vec<RawOption>,
    #[serde(rename = "correct_answer", default)]
    correct_answer: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    content: Option<String>,
}

/// HTTP client for the question bank API.
pub struct QuestionBankClient {
    base_url: String,
    client: reqwest::Client,
}

impl QuestionBankClient {
    pub fn new(base_url: Option<String>) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            reqwest::header::ORIGIN,
            reqwest::header::HeaderValue::from_static(QBANK_ORIGIN),
        );
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_static(QBANK_ORIGIN),
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }

    /// List every question the bank knows for a section.
    #[instrument(skip(self), fields(section = %section))]
    pub async fn list_questions(
        &self,
        section: Section,
    ) -> Result<Vec<QuestionSummary>, FetchError> {
        let (test, domain) = section_query(section);
        let body = ListRequest {
            asmt_event_id: ASMT_EVENT_ID,
            test,
            domain,
        };

        let response = self
            .post_json(&format!("{}/get-questions", self.base_url), &body)
            .await?;
        response.json().await.map_err(|e| FetchError::ApiError {
            status: 0,
            message: format!("failed to parse question listing: {e}"),
        })
    }

    /// Fetch one question's content and normalize it.
    #[instrument(skip(self, summary), fields(id = summary.id().unwrap_or("?")))]
    pub async fn fetch_question(
        &self,
        summary: &QuestionSummary,
        section: Section,
    ) -> Result<Question, FetchError> {
        let id = summary.id().ok_or_else(|| FetchError::MalformedResponse {
            id: "?".into(),
            detail: "listing entry has neither external_id nor questionId".into(),
        })?;

        let response = self
            .post_json(
                &format!("{}/get-question", self.base_url),
                &DetailRequest { external_id: id },
            )
            .await?;
        let detail: RawDetail = response.json().await.map_err(|e| FetchError::ApiError {
            status: 0,
            message: format!("failed to parse question {id}: {e}"),
        })?;

        normalize(id, summary, section, detail)
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    FetchError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(FetchError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(body);
            return Err(FetchError::ApiError { status, message });
        }

        Ok(response)
    }
}

/// Module tier for a question the bank does not label by module.
///
/// Score bands run 1 through 7; the lower half maps to module 1. Questions
/// without a band fall back on difficulty, with medium going to module 1.
fn module_for(summary: &QuestionSummary) -> ModuleId {
    match (summary.score_band, summary.difficulty) {
        (Some(band), _) if band <= 3 => ModuleId::Module1,
        (Some(_), _) => ModuleId::Module2,
        (None, Some(Difficulty::Hard)) => ModuleId::Module2,
        (None, _) => ModuleId::Module1,
    }
}

fn normalize(
    id: &str,
    summary: &QuestionSummary,
    section: Section,
    detail: RawDetail,
) -> Result<Question, FetchError> {
    let malformed = |detail: &str| FetchError::MalformedResponse {
        id: id.to_string(),
        detail: detail.to_string(),
    };

    let stem = detail.stem.ok_or_else(|| malformed("missing stem"))?;

    let options: Vec<AnswerChoice> = detail
        .answer_options
        .iter()
        .enumerate()
        .map(|(i, opt)| AnswerChoice {
            // Options arrive positionally; letters are assigned in order.
            letter: (b'A' + i as u8) as char,
            content: opt.content.clone().unwrap_or_default(),
        })
        .collect();
    if options.is_empty() {
        return Err(malformed("no answer options"));
    }

    let correct = detail
        .correct_answer
        .first()
        .and_then(|s| s.trim().chars().next())
        .ok_or_else(|| malformed("no correct answer"))?;
    if !options.iter().any(|o| o.letter == correct) {
        return Err(malformed("correct answer is not an option letter"));
    }

    let question = Question {
        id: id.to_string(),
        section,
        module: module_for(summary),
        stimulus: detail.stimulus.filter(|s| !s.trim().is_empty()),
        stem,
        options,
        correct,
        rationale: detail.rationale.filter(|s| !s.trim().is_empty()),
        difficulty: summary.difficulty,
        skill: summary
            .skill_desc
            .clone()
            .or_else(|| summary.skill_code.clone()),
    };
    question
        .validate()
        .map_err(|e| malformed(&e.to_string()))?;
    Ok(question)
}
