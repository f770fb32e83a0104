//! `InMemoryVectorIndex` — a brute-force cosine-similarity scan over
//! per-user point sets, kept entirely in process memory (§4.1). Rebuilt
//! from `RecordStore` by the consistency/reindex jobs on cold start; losing
//! it is a repairable consistency defect, never data loss.

use std::collections::HashMap;
use std::sync::RwLock;

use dashmap::DashMap;
use rayon::prelude::*;

use memoria_core::errors::CortexResult;
use memoria_core::models::{Status, Tier};
use memoria_core::traits::IVectorIndex;

use crate::similarity::cosine_similarity;

#[derive(Clone)]
struct Point {
    vector: Vec<f32>,
    entities: Vec<String>,
    tier: Tier,
    status: Status,
}

#[derive(Default)]
struct UserShard {
    points: RwLock<HashMap<String, Point>>,
}

pub struct InMemoryVectorIndex {
    dims: RwLock<Option<usize>>,
    shards: DashMap<String, UserShard>,
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            dims: RwLock::new(None),
            shards: DashMap::new(),
        }
    }

    /// Variant of `upsert` that also records the item's normalized entity
    /// tokens, consulted by `filter_by_entities` (§4.5 stage 3 prefilter).
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_with_entities(
        &self,
        user_id: &str,
        memory_id: &str,
        vector: &[f32],
        entities: &[String],
        tier: Tier,
        status: Status,
    ) -> CortexResult<()> {
        let shard = self.shards.entry(user_id.to_string()).or_default();
        shard.points.write().unwrap().insert(
            memory_id.to_string(),
            Point {
                vector: vector.to_vec(),
                entities: entities.to_vec(),
                tier,
                status,
            },
        );
        Ok(())
    }
}

impl IVectorIndex for InMemoryVectorIndex {
    fn ensure_schema(&self, dims: usize) -> CortexResult<()> {
        *self.dims.write().unwrap() = Some(dims);
        Ok(())
    }

    fn upsert(
        &self,
        user_id: &str,
        memory_id: &str,
        vector: &[f32],
        tier: Tier,
        status: Status,
    ) -> CortexResult<()> {
        self.upsert_with_entities(user_id, memory_id, vector, &[], tier, status)
    }

    fn upsert_batch(
        &self,
        user_id: &str,
        points: &[(String, Vec<f32>, Tier, Status)],
    ) -> CortexResult<usize> {
        let shard = self.shards.entry(user_id.to_string()).or_default();
        let mut guard = shard.points.write().unwrap();
        for (memory_id, vector, tier, status) in points {
            guard.insert(
                memory_id.clone(),
                Point {
                    vector: vector.clone(),
                    entities: Vec::new(),
                    tier: *tier,
                    status: *status,
                },
            );
        }
        Ok(points.len())
    }

    fn search(
        &self,
        user_id: &str,
        query: &[f32],
        limit: usize,
        entity_filter: Option<&[String]>,
    ) -> CortexResult<Vec<(String, f64)>> {
        let Some(shard) = self.shards.get(user_id) else {
            return Ok(Vec::new());
        };
        let guard = shard.points.read().unwrap();
        let candidates: Vec<(&String, &Point)> = match entity_filter {
            Some(entities) if !entities.is_empty() => guard
                .iter()
                .filter(|(_, p)| p.entities.iter().any(|e| entities.contains(e)))
                .collect(),
            _ => guard.iter().collect(),
        };

        let mut scored: Vec<(String, f64)> = candidates
            .par_iter()
            .map(|(id, point)| ((*id).clone(), cosine_similarity(query, &point.vector)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    fn filter_by_entities(
        &self,
        user_id: &str,
        entities: &[String],
        limit: usize,
    ) -> CortexResult<Vec<String>> {
        let Some(shard) = self.shards.get(user_id) else {
            return Ok(Vec::new());
        };
        let guard = shard.points.read().unwrap();
        Ok(guard
            .iter()
            .filter(|(_, p)| p.entities.iter().any(|e| entities.contains(e)))
            .take(limit)
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn delete(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        if let Some(shard) = self.shards.get(user_id) {
            shard.points.write().unwrap().remove(memory_id);
        }
        Ok(())
    }

    fn delete_by_filter(
        &self,
        user_id: &str,
        tier: Option<Tier>,
        status: Option<Status>,
    ) -> CortexResult<usize> {
        let Some(shard) = self.shards.get(user_id) else {
            return Ok(0);
        };
        let mut guard = shard.points.write().unwrap();
        let to_remove: Vec<String> = guard
            .iter()
            .filter(|(_, p)| {
                tier.map_or(true, |t| p.tier == t) && status.map_or(true, |s| p.status == s)
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in &to_remove {
            guard.remove(id);
        }
        Ok(to_remove.len())
    }

    fn scroll(
        &self,
        user_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> CortexResult<(Vec<String>, Option<String>)> {
        let Some(shard) = self.shards.get(user_id) else {
            return Ok((Vec::new(), None));
        };
        let guard = shard.points.read().unwrap();
        let mut ids: Vec<&String> = guard.keys().collect();
        ids.sort();

        let start = match cursor {
            Some(c) => ids.partition_point(|id| id.as_str() <= c),
            None => 0,
        };
        let page: Vec<String> = ids[start..].iter().take(limit).map(|s| s.to_string()).collect();
        let next_cursor = if start + page.len() < ids.len() {
            page.last().cloned()
        } else {
            None
        };
        Ok((page, next_cursor))
    }

    fn contains(&self, user_id: &str, memory_id: &str) -> CortexResult<bool> {
        Ok(self
            .shards
            .get(user_id)
            .map(|shard| shard.points.read().unwrap().contains_key(memory_id))
            .unwrap_or(false))
    }
}
