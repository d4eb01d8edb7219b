//! AI spending insights.
//!
//! [`Summarizer::summarize`] never fails: a missing key, an empty ledger or a
//! failed request all resolve to a markdown message the dashboard can show
//! as-is.

use crate::error::SummarizerError;
use crate::http::ResponseExt;
use crate::types::Transaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Value shipped in sample `.env` files; treated as "no key".
const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY";

pub const DISABLED_MESSAGE: &str = "### AI Features Disabled\n\
Your Gemini API key has not been configured. Set `GEMINI_API_KEY` in your environment \
or `.env` file to enable AI-powered spending insights.";

pub const NO_ACTIVITY_MESSAGE: &str = "### No Activity Yet\n\
There are no transactions to analyze. Once you send or receive funds, insights about \
your spending will appear here.";

pub const INVALID_KEY_MESSAGE: &str = "Sorry, I couldn't analyze your spending. \
The provided Gemini API key is not valid. Please check `GEMINI_API_KEY`.";

pub const UNAVAILABLE_MESSAGE: &str = "Sorry, I couldn't analyze your spending right now. \
There was an issue connecting to the AI service.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Markdown summary of `transactions`. Never fails.
    async fn summarize(&self, transactions: &[Transaction]) -> String;
}

/// Gemini credentials and endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Summarizer backend selection, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummarizerConfig {
    /// No usable API key: every request returns [`DISABLED_MESSAGE`].
    #[default]
    Disabled,
    Gemini(GeminiConfig),
}

impl SummarizerConfig {
    /// Resolve from `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_API_URL`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY);
        let Some(api_key) = api_key else {
            tracing::warn!("Gemini API key is not configured. AI features will be disabled.");
            return SummarizerConfig::Disabled;
        };
        let model = lookup("GEMINI_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let api_url = lookup("GEMINI_API_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string());
        SummarizerConfig::Gemini(GeminiConfig {
            api_key,
            model,
            api_url,
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, SummarizerConfig::Gemini(_))
    }
}

/// Build the advisor prompt for `transactions`.
pub fn build_prompt(transactions: &[Transaction]) -> String {
    let summary = transactions
        .iter()
        .map(Transaction::summary_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a friendly financial advisor for a smart wallet app called BitPrivacy.\n\
Analyze the following list of user transactions and provide a brief, insightful summary of their spending habits.\n\
\n\
The user's transactions are:\n\
{summary}\n\
\n\
Your analysis should be:\n\
- Concise (2-3 paragraphs max).\n\
- Easy to understand for a non-expert.\n\
- Highlight the largest spending category (excluding income).\n\
- Offer one or two simple, actionable tips for improvement.\n\
- Be encouraging and positive in tone.\n\
- Format your response using markdown. Use headings and bullet points for clarity.\n"
    )
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Summarizer backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    config: SummarizerConfig,
}

impl GeminiSummarizer {
    pub fn new(client: reqwest::Client, config: SummarizerConfig) -> Self {
        Self { client, config }
    }

    async fn generate(&self, gemini: &GeminiConfig, prompt: &str) -> Result<String, SummarizerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            gemini.api_url.trim_end_matches('/'),
            gemini.model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };
        let response: GenerateResponse = self
            .client
            .post(url)
            .header("x-goog-api-key", &gemini.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizerError::RequestFailed(e.to_string()))?
            .check_success()
            .await
            .map_err(SummarizerError::NotSuccessResponse)?
            .json()
            .await
            .map_err(|e| SummarizerError::CannotParseResponse(e.to_string()))?;

        let text: String = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            return Err(SummarizerError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, transactions: &[Transaction]) -> String {
        let gemini = match &self.config {
            SummarizerConfig::Disabled => return DISABLED_MESSAGE.to_string(),
            SummarizerConfig::Gemini(gemini) => gemini,
        };
        if transactions.is_empty() {
            return NO_ACTIVITY_MESSAGE.to_string();
        }

        let prompt = build_prompt(transactions);
        match self.generate(gemini, &prompt).await {
            Ok(text) => {
                tracing::info!("Spending insights generated ({} chars)", text.len());
                text
            }
            Err(e) if e.is_invalid_key() => {
                tracing::error!("Gemini rejected the configured API key: {}", e);
                INVALID_KEY_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!("Error calling Gemini API: {}", e);
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}
