//! Dependency-free TF-IDF fallback embedder. Used when the remote embedder's
//! breaker is open — always available, never times out, never matches the
//! remote model's semantic quality.

use std::collections::HashMap;

use memoria_core::errors::CortexResult;
use memoria_core::models::Deadline;
use memoria_core::traits::IEmbedder;

pub struct TfIdfFallback {
    dimensions: usize,
}

impl TfIdfFallback {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn tfidf_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &tf {
            let freq = count / total;
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimensions);
            vec[bucket] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbedder for TfIdfFallback {
    fn embed(&self, text: &str, _deadline: Deadline) -> CortexResult<Vec<f32>> {
        Ok(self.tfidf_vector(text))
    }

    fn embed_batch(&self, texts: &[String], _deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.tfidf_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "tfidf-fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn dl() -> Deadline {
        Deadline::after(Duration::from_secs(1))
    }

    #[test]
    fn empty_text_returns_zero_vector() {
        let p = TfIdfFallback::new(128);
        let v = p.embed("", dl()).unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn output_is_unit_normalized() {
        let p = TfIdfFallback::new(256);
        let v = p.embed("rust programming language systems", dl()).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn deterministic() {
        let p = TfIdfFallback::new(256);
        let a = p.embed("deterministic test", dl()).unwrap();
        let b = p.embed("deterministic test", dl()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn similar_texts_have_higher_cosine() {
        let p = TfIdfFallback::new(256);
        let a = p.embed("rust programming language", dl()).unwrap();
        let b = p.embed("rust programming systems", dl()).unwrap();
        let c = p.embed("cooking recipes pasta", dl()).unwrap();

        let cos_ab: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let cos_ac: f32 = a.iter().zip(&c).map(|(x, y)| x * y).sum();
        assert!(cos_ab > cos_ac);
    }
}
