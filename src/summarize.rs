//! Article summaries from an OpenAI-compatible chat completion endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Article text sent to the model is cut to this many characters.
const MAX_INPUT_CHARS: usize = 8000;
const TEXT_WIDTH: usize = 100;

const SYSTEM_PROMPT: &str =
    "You summarize web articles. Reply with two or three plain-text sentences and nothing else.";

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("model returned no content")]
    EmptyResponse,
    #[error("summarization is not configured")]
    NotConfigured,
}

pub trait Summarizer {
    /// Plain-text summary of the page at `url`.
    fn summarize(&self, url: &str) -> Result<String, SummarizeError>;
}

/// Run `summarizer`, degrading any failure to an empty summary.
pub fn summarize_or_empty(summarizer: &dyn Summarizer, url: &str) -> String {
    match summarizer.summarize(url) {
        Ok(summary) => summary,
        Err(e) => {
            warn!(link = %url, error = %e, "summarization failed, continuing without summary");
            String::new()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Used when feeds ask for summaries but no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSummarizer;

impl Summarizer for NoSummarizer {
    fn summarize(&self, _url: &str) -> Result<String, SummarizeError> {
        Err(SummarizeError::NotConfigured)
    }
}

pub struct LlmSummarizer {
    client: reqwest::blocking::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl LlmSummarizer {
    pub fn new(config: LlmConfig) -> Result<Self, SummarizeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn fetch_article_text(&self, url: &str) -> Result<String, SummarizeError> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(SummarizeError::HttpStatus(response.status().as_u16()));
        }
        let html = response.text()?;
        Ok(article_text(&html))
    }

    fn complete(&self, input: &str) -> Result<String, SummarizeError> {
        let endpoint = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: input },
            ],
        };

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()?;
        if !response.status().is_success() {
            return Err(SummarizeError::HttpStatus(response.status().as_u16()));
        }
        let body: ChatResponse = response.json()?;
        first_choice(body)
    }
}

impl Summarizer for LlmSummarizer {
    fn summarize(&self, url: &str) -> Result<String, SummarizeError> {
        let text = self.fetch_article_text(url)?;
        self.complete(&format!("Link: {url}\n\nContent:\n{text}"))
    }
}

/// Plain text of an HTML page, truncated for the prompt.
fn article_text(html: &str) -> String {
    let text = html2text::from_read(html.as_bytes(), TEXT_WIDTH);
    text.chars().take(MAX_INPUT_CHARS).collect()
}

fn first_choice(body: ChatResponse) -> Result<String, SummarizeError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(SummarizeError::EmptyResponse)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl Summarizer for Fixed {
        fn summarize(&self, _url: &str) -> Result<String, SummarizeError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn failures_degrade_to_empty() {
        assert_eq!(summarize_or_empty(&NoSummarizer, "https://example.com"), "");
    }

    #[test]
    fn successes_pass_through() {
        assert_eq!(summarize_or_empty(&Fixed("gist"), "https://example.com"), "gist");
    }

    #[test]
    fn first_choice_is_trimmed() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  A summary.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(body).unwrap(), "A summary.");
    }

    #[test]
    fn blank_or_missing_content_is_an_error() {
        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(empty), Err(SummarizeError::EmptyResponse)));

        let null: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(first_choice(null), Err(SummarizeError::EmptyResponse)));
    }

    #[test]
    fn article_text_drops_markup_and_truncates() {
        let text = article_text("<html><body><p>Hello <b>there</b></p></body></html>");
        assert!(text.contains("Hello"));
        assert!(!text.contains("<p>"));

        let long = format!("<p>{}</p>", "x".repeat(MAX_INPUT_CHARS * 2));
        assert!(article_text(&long).chars().count() <= MAX_INPUT_CHARS);
    }

    #[test]
    fn request_serializes_as_chat_completion() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "u");
    }
}
