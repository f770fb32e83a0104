//! Remote embedding provider over HTTP. Speaks a minimal JSON contract:
//! `POST {endpoint} {"input": [...]} -> {"embeddings": [[f32...], ...]}`.

use serde::{Deserialize, Serialize};

use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::Deadline;
use memoria_core::traits::IEmbedder;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct HttpEmbedder {
    endpoint: String,
    model: String,
    dimensions: usize,
    client: reqwest::blocking::Client,
}

impl HttpEmbedder {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            dimensions,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn call(&self, inputs: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        if deadline.is_expired() {
            return Err(CortexError::Timeout(format!(
                "{}: deadline already expired before dispatch",
                self.model
            )));
        }
        let body = EmbedRequest {
            input: inputs,
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

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| CortexError::internal(e.to_string(), "embedder"))?;

        for vec in &parsed.embeddings {
            if vec.len() != self.dimensions {
                return Err(CortexError::SchemaMismatch(format!(
                    "{}: expected {} dims, got {}",
                    self.model,
                    self.dimensions,
                    vec.len()
                )));
            }
        }
        Ok(parsed.embeddings)
    }
}

pub(crate) fn classify_reqwest_err(model: &str, e: reqwest::Error) -> CortexError {
    if e.is_timeout() {
        CortexError::Timeout(format!("{model}: {e}"))
    } else if e.is_connect() {
        CortexError::Unavailable(format!("{model}: {e}"))
    } else {
        CortexError::internal(e.to_string(), "embedder")
    }
}

impl IEmbedder for HttpEmbedder {
    fn embed(&self, text: &str, deadline: Deadline) -> CortexResult<Vec<f32>> {
        let mut out = self.call(std::slice::from_ref(&text.to_string()), deadline)?;
        out.pop()
            .ok_or_else(|| CortexError::internal("empty embedding response", "embedder"))
    }

    fn embed_batch(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        self.call(texts, deadline)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
