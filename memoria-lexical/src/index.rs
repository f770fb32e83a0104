//! `BmInMemoryIndex` — a brute-force per-user BM25 scorer (§4.3). Mirrors the
//! sibling vector index's "scan everything, it's rebuildable" idiom: there is
//! no durable backing, a cold process starts empty and `invalidate_user`
//! simply forces a rebuild on next access.

use std::collections::HashMap;
use std::sync::RwLock;

use dashmap::DashMap;

use memoria_core::errors::CortexResult;
use memoria_core::traits::ILexicalIndex;

use crate::tokenize::tokenize;

const K1: f64 = 1.2;
const B: f64 = 0.75;

struct DocEntry {
    term_counts: HashMap<String, u32>,
    length: u32,
}

#[derive(Default)]
struct UserShard {
    docs: RwLock<HashMap<String, DocEntry>>,
}

pub struct BmInMemoryIndex {
    shards: DashMap<String, UserShard>,
}

impl Default for BmInMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl BmInMemoryIndex {
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
        }
    }
}

impl ILexicalIndex for BmInMemoryIndex {
    fn score(&self, user_id: &str, query: &str, limit: usize) -> CortexResult<Vec<(String, f64)>> {
        let Some(shard) = self.shards.get(user_id) else {
            return Ok(Vec::new());
        };
        let docs = shard.docs.read().unwrap();
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let query_terms: Vec<String> = {
            let mut terms = tokenize(query);
            terms.sort();
            terms.dedup();
            terms
        };
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let n = docs.len() as f64;
        let avgdl = docs.values().map(|d| d.length as f64).sum::<f64>() / n;

        let idf: HashMap<&str, f64> = query_terms
            .iter()
            .map(|term| {
                let df = docs
                    .values()
                    .filter(|d| d.term_counts.contains_key(term))
                    .count() as f64;
                let score = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                (term.as_str(), score)
            })
            .collect();

        let mut scored: Vec<(String, f64)> = docs
            .iter()
            .filter_map(|(memory_id, doc)| {
                let dl = doc.length as f64;
                let score: f64 = query_terms
                    .iter()
                    .filter_map(|term| {
                        let tf = *doc.term_counts.get(term)? as f64;
                        let term_idf = idf[term.as_str()];
                        let denom = tf + K1 * (1.0 - B + B * dl / avgdl);
                        Some(term_idf * (tf * (K1 + 1.0)) / denom)
                    })
                    .sum();
                (score > 0.0).then(|| (memory_id.clone(), score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    fn index(&self, user_id: &str, memory_id: &str, text: &str) -> CortexResult<()> {
        let mut term_counts: HashMap<String, u32> = HashMap::new();
        let tokens = tokenize(text);
        for term in &tokens {
            *term_counts.entry(term.clone()).or_default() += 1;
        }
        let entry = DocEntry {
            term_counts,
            length: tokens.len() as u32,
        };
        let shard = self.shards.entry(user_id.to_string()).or_default();
        shard.docs.write().unwrap().insert(memory_id.to_string(), entry);
        Ok(())
    }

    fn remove(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        if let Some(shard) = self.shards.get(user_id) {
            shard.docs.write().unwrap().remove(memory_id);
        }
        Ok(())
    }

    fn invalidate_user(&self, user_id: &str) -> CortexResult<()> {
        self.shards.remove(user_id);
        Ok(())
    }
}
