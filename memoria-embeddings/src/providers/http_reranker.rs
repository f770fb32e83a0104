//! Remote cross-encoder reranker over HTTP (§4.4, §4.5 stage 7).

use serde::{Deserialize, Serialize};

use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::Deadline;
use memoria_core::traits::IReranker;

use super::http_embedder::classify_reqwest_err;

/// Passages longer than this are truncated before being sent to the
/// reranker — cross-encoders score a fixed-size window regardless, and this
/// keeps request bodies bounded.
const PASSAGE_CHAR_CAP: usize = 2_000;

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    passages: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct RerankResponse {
    scores: Vec<f64>,
}

pub struct HttpReranker {
    endpoint: String,
    model: String,
    max_batch_size: usize,
    client: reqwest::blocking::Client,
}

impl HttpReranker {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, max_batch_size: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            max_batch_size,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn truncate(passage: &str) -> String {
        if passage.len() <= PASSAGE_CHAR_CAP {
            passage.to_string()
        } else {
            passage.chars().take(PASSAGE_CHAR_CAP).collect()
        }
    }

    fn call_batch(&self, query: &str, batch: &[String], deadline: Deadline) -> CortexResult<Vec<f64>> {
        if deadline.is_expired() {
            return Err(CortexError::Timeout(format!(
                "{}: deadline already expired before dispatch",
                self.model
            )));
        }
        let truncated: Vec<String> = batch.iter().map(|p| Self::truncate(p)).collect();
        let body = RerankRequest {
            query,
            passages: &truncated,
            model: &self.model,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(deadline.remaining())
            .json(&body)
            .send()
            .map_err(|e| classify_reqwest_err(&self.model, e))?;

        if !response.status().is_success() {
            return Err(CortexError::Unavailable(format!(
                "{}: http status {}",
                self.model,
                response.status()
            )));
        }

        let parsed: RerankResponse = response
            .json()
            .map_err(|e| CortexError::internal(e.to_string(), "reranker"))?;

        if parsed.scores.len() != batch.len() {
            return Err(CortexError::internal(
                format!("expected {} scores, got {}", batch.len(), parsed.scores.len()),
                "reranker",
            ));
        }
        Ok(parsed.scores)
    }
}

impl IReranker for HttpReranker {
    fn rerank(&self, query: &str, candidates: &[String], deadline: Deadline) -> CortexResult<Vec<f64>> {
        let mut scores = Vec::with_capacity(candidates.len());
        for chunk in candidates.chunks(self.max_batch_size.max(1)) {
            scores.extend(self.call_batch(query, chunk, deadline)?);
        }
        Ok(scores)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
