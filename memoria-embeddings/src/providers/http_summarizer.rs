//! Remote LLM-backed summarizer over HTTP (§4.4: "generateContextPrefix").

use serde::{Deserialize, Serialize};

use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::Deadline;
use memoria_core::traits::ISummarizer;

use super::http_embedder::classify_reqwest_err;

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    max_chars: usize,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

pub struct HttpSummarizer {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSummarizer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ISummarizer for HttpSummarizer {
    fn summarize(&self, text: &str, max_chars: usize, deadline: Deadline) -> CortexResult<String> {
        if deadline.is_expired() {
            return Err(CortexError::Timeout("summarizer: deadline already expired".into()));
        }
        let body = SummarizeRequest { text, max_chars };
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(deadline.remaining())
            .json(&body)
            .send()
            .map_err(|e| classify_reqwest_err("summarizer", e))?;

        if !response.status().is_success() {
            return Err(CortexError::Unavailable(format!(
                "summarizer: http status {}",
                response.status()
            )));
        }

        let parsed: SummarizeResponse = response
            .json()
            .map_err(|e| CortexError::internal(e.to_string(), "summarizer"))?;
        Ok(parsed.summary)
    }
}
