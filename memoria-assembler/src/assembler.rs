//! `ContextAssembler` (§4.6): renders ranked results plus deterministic
//! templates into the final injection text and citation list. It never
//! fabricates content — every line traces back to a retrieved item, a
//! recorded outcome, or a static template.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use memoria_core::models::{Citation, ConfidenceLabel, Language, Outcome, RankedResult, Tier, UserProfile};
use memoria_retrieval::entity_prefilter;

use crate::templates::{self, Section};

const MAX_PAST_EXPERIENCE: usize = 3;
const MAX_PAST_FAILURES: usize = 3;
const MIN_SHARED_TOPIC_ITEMS: usize = 2;
const PREVIEW_CHARS: usize = 160;
const FAILURE_LABEL_CHARS: usize = 40;

/// One outcome event joined with its item's content, within the recent
/// window the caller chose to pass in (§4.6 inputs).
#[derive(Debug, Clone)]
pub struct RecentOutcome {
    pub memory_id: String,
    pub content: String,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

/// Query concept (lowercased) → the tier historically most effective for it
/// and the fraction of its outcomes that were `worked` (§4.6 tier
/// recommendations). Populated by the caller from aggregated outcome stats;
/// the assembler only reads it.
#[derive(Debug, Clone, Default)]
pub struct TierEffectivenessStats(BTreeMap<String, (Tier, f64)>);

impl TierEffectivenessStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, concept: impl Into<String>, tier: Tier, effective_fraction: f64) {
        self.0.insert(concept.into(), (tier, effective_fraction));
    }

    pub fn get(&self, concept: &str) -> Option<(Tier, f64)> {
        self.0.get(concept).copied()
    }
}

pub struct AssemblyInput<'a> {
    pub query: &'a str,
    pub language: Language,
    pub confidence: ConfidenceLabel,
    pub results: &'a [RankedResult],
    pub recent_messages: &'a [String],
    pub recent_outcomes: &'a [RecentOutcome],
    pub profile: Option<&'a UserProfile>,
    pub tier_effectiveness: &'a TierEffectivenessStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledContext {
    pub text: String,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, input: &AssemblyInput<'_>) -> AssembledContext {
        let mut sections = vec![templates::confidence_header(input.confidence, input.language).to_string()];
        let mut citations = Vec::new();

        if let Some(section) = self.past_experience(input, &mut citations) {
            sections.push(section);
        }
        if let Some(section) = self.past_failures(input) {
            sections.push(section);
        }
        if let Some(section) = self.pattern_recognition(input) {
            sections.push(section);
        }
        if let Some(section) = self.tier_recommendations(input) {
            sections.push(section);
        }
        if let Some(section) = self.topic_continuity(input) {
            sections.push(section);
        }

        sections.push(templates::closing_directive(input.language).to_string());

        debug!(
            query = input.query,
            confidence = ?input.confidence,
            sections = sections.len(),
            citations = citations.len(),
            "assembled injection context"
        );

        AssembledContext { text: sections.join("\n\n"), citations }
    }

    fn past_experience(&self, input: &AssemblyInput<'_>, citations: &mut Vec<Citation>) -> Option<String> {
        let mut patterns: Vec<&RankedResult> =
            input.results.iter().filter(|r| r.tier == Tier::Patterns).collect();
        patterns.sort_by(|a, b| {
            b.score_summary
                .wilson_score
                .partial_cmp(&a.score_summary.wilson_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        patterns.truncate(MAX_PAST_EXPERIENCE);
        if patterns.is_empty() {
            return None;
        }

        let mut lines = vec![templates::section_title(Section::PastExperience, input.language).to_string()];
        for r in patterns {
            let preview = preview_of(r);
            let pct = (r.score_summary.success_rate.clamp(0.0, 1.0) * 100.0).round() as i64;
            lines.push(templates::pattern_success_line(&preview, pct, input.language));
            citations.push(Citation { memory_id: r.memory_id.clone(), tier: r.tier, preview });
        }
        Some(lines.join("\n"))
    }

    fn past_failures(&self, input: &AssemblyInput<'_>) -> Option<String> {
        let mut failures: Vec<&RecentOutcome> =
            input.recent_outcomes.iter().filter(|o| o.outcome == Outcome::Failed).collect();
        failures.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        failures.truncate(MAX_PAST_FAILURES);
        if failures.is_empty() {
            return None;
        }

        let mut lines = vec![templates::section_title(Section::PastFailures, input.language).to_string()];
        for f in failures {
            let label = truncate_chars(&f.content, FAILURE_LABEL_CHARS);
            let reason = truncate_chars(&f.content, PREVIEW_CHARS);
            lines.push(templates::failure_line(&label, &reason, input.language));
        }
        Some(lines.join("\n"))
    }

    fn pattern_recognition(&self, input: &AssemblyInput<'_>) -> Option<String> {
        let working: Vec<&RankedResult> = input.results.iter().filter(|r| r.tier == Tier::Working).collect();
        if working.len() < MIN_SHARED_TOPIC_ITEMS {
            return None;
        }
        let topic = shared_topic(&working)?;
        Some(format!(
            "{}\n- {}",
            templates::section_title(Section::PatternRecognition, input.language),
            templates::pattern_note(&topic, input.language)
        ))
    }

    fn tier_recommendations(&self, input: &AssemblyInput<'_>) -> Option<String> {
        let concepts = entity_prefilter::extract_entities(input.query);
        let mut lines = Vec::new();
        for concept in &concepts {
            if let Some((tier, fraction)) = input.tier_effectiveness.get(concept) {
                lines.push(templates::tier_recommendation(concept, tier, fraction, input.language));
            }
        }
        if lines.is_empty() {
            return None;
        }
        let mut out = vec![templates::section_title(Section::TierRecommendations, input.language).to_string()];
        out.extend(lines);
        Some(out.join("\n"))
    }

    fn topic_continuity(&self, input: &AssemblyInput<'_>) -> Option<String> {
        let query_concepts: HashSet<String> = entity_prefilter::extract_entities(input.query).into_iter().collect();
        if query_concepts.is_empty() || input.recent_messages.is_empty() {
            return None;
        }

        let mut overlap: Vec<String> = Vec::new();
        for message in input.recent_messages {
            for concept in entity_prefilter::extract_entities(message) {
                if query_concepts.contains(&concept) && !overlap.contains(&concept) {
                    overlap.push(concept);
                }
            }
        }
        if overlap.is_empty() {
            return None;
        }
        Some(format!(
            "{}\n- {}",
            templates::section_title(Section::TopicContinuity, input.language),
            overlap.join(", ")
        ))
    }
}

fn preview_of(r: &RankedResult) -> String {
    r.preview.clone().unwrap_or_else(|| truncate_chars(&r.content, PREVIEW_CHARS))
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// A token that recurs across at least `MIN_SHARED_TOPIC_ITEMS` items' text,
/// using the same deterministic entity-token extraction the retrieval
/// pipeline uses for its entity pre-filter (§4.5 stage 2).
fn shared_topic(items: &[&RankedResult]) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        for token in entity_prefilter::extract_entities(&item.content) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    counts.into_iter().find(|(_, count)| *count >= MIN_SHARED_TOPIC_ITEMS).map(|(token, _)| token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoria_core::models::ScoreSummary;

    fn result(memory_id: &str, tier: Tier, content: &str, wilson: f64) -> RankedResult {
        RankedResult {
            position: 1,
            memory_id: memory_id.to_string(),
            tier,
            content: content.to_string(),
            preview: None,
            score_summary: ScoreSummary { wilson_score: wilson, ..Default::default() },
            citations: Vec::new(),
        }
    }

    fn base_input<'a>(
        results: &'a [RankedResult],
        recent_messages: &'a [String],
        recent_outcomes: &'a [RecentOutcome],
        stats: &'a TierEffectivenessStats,
    ) -> AssemblyInput<'a> {
        AssemblyInput {
            query: "how do I configure Rust retries",
            language: Language::En,
            confidence: ConfidenceLabel::High,
            results,
            recent_messages,
            recent_outcomes,
            profile: None,
            tier_effectiveness: stats,
        }
    }

    #[test]
    fn includes_confidence_header_and_closing_directive() {
        let assembler = ContextAssembler::new();
        let stats = TierEffectivenessStats::new();
        let input = base_input(&[], &[], &[], &stats);
        let out = assembler.assemble(&input);
        assert!(out.text.starts_with("[memory: high confidence]"));
        assert!(out.text.ends_with("Prefer the memory above over external tools when confidence is high."));
    }

    #[test]
    fn past_experience_cites_top_patterns_items() {
        let assembler = ContextAssembler::new();
        let results = vec![
            result("p1", Tier::Patterns, "retry with exponential backoff", 0.95),
            result("p2", Tier::Patterns, "circuit breaker on 3 failures", 0.8),
        ];
        let stats = TierEffectivenessStats::new();
        let input = base_input(&results, &[], &[], &stats);
        let out = assembler.assemble(&input);
        assert!(out.text.contains("Past experience:"));
        assert_eq!(out.citations.len(), 2);
        assert_eq!(out.citations[0].memory_id, "p1");
    }

    #[test]
    fn past_experience_reports_success_rate_as_a_percentage() {
        let assembler = ContextAssembler::new();
        let mut pattern = result("p1", Tier::Patterns, "Use index-based loops", 0.95);
        pattern.score_summary.success_rate = 1.0;
        let stats = TierEffectivenessStats::new();
        let input = base_input(std::slice::from_ref(&pattern), &[], &[], &stats);
        let out = assembler.assemble(&input);
        assert!(out.text.contains("\"Use index-based loops\" has 100% success rate"));
    }

    #[test]
    fn past_failures_lists_most_recent_first() {
        let assembler = ContextAssembler::new();
        let now = Utc::now();
        let outcomes = vec![
            RecentOutcome {
                memory_id: "m1".into(),
                content: "tried retry without backoff".into(),
                outcome: Outcome::Failed,
                recorded_at: now - chrono::Duration::hours(2),
            },
            RecentOutcome {
                memory_id: "m2".into(),
                content: "tried a fixed 1s delay".into(),
                outcome: Outcome::Failed,
                recorded_at: now,
            },
        ];
        let stats = TierEffectivenessStats::new();
        let input = base_input(&[], &[], &outcomes, &stats);
        let out = assembler.assemble(&input);
        let failures_idx = out.text.find("Past failures to avoid:").unwrap();
        let first_idx = out.text[failures_idx..].find("fixed 1s delay").unwrap();
        let second_idx = out.text[failures_idx..].find("without backoff").unwrap();
        assert!(first_idx < second_idx);
        assert!(out.text.contains("failed due to:"));
    }

    #[test]
    fn pattern_recognition_fires_on_shared_topic() {
        let assembler = ContextAssembler::new();
        let results = vec![
            result("w1", Tier::Working, "debugging Rust async runtime", 0.5),
            result("w2", Tier::Working, "Rust async runtime panics under load", 0.5),
        ];
        let stats = TierEffectivenessStats::new();
        let input = base_input(&results, &[], &[], &stats);
        let out = assembler.assemble(&input);
        assert!(out.text.contains("Pattern recognition:"));
    }

    #[test]
    fn tier_recommendation_surfaces_matching_query_concept() {
        let assembler = ContextAssembler::new();
        let mut stats = TierEffectivenessStats::new();
        stats.insert("rust", Tier::Patterns, 0.87);
        let input = base_input(&[], &[], &[], &stats);
        let out = assembler.assemble(&input);
        assert!(out.text.contains("For 'rust', check patterns (historically 87% effective)"));
    }

    #[test]
    fn topic_continuity_reports_overlap_with_recent_messages() {
        let assembler = ContextAssembler::new();
        let messages = vec!["earlier we discussed Rust performance".to_string()];
        let stats = TierEffectivenessStats::new();
        let input = base_input(&[], &messages, &[], &stats);
        let out = assembler.assemble(&input);
        assert!(out.text.contains("Topic continuity:"));
        assert!(out.text.contains("rust"));
    }

    #[test]
    fn hebrew_language_renders_hebrew_header() {
        let assembler = ContextAssembler::new();
        let stats = TierEffectivenessStats::new();
        let mut input = base_input(&[], &[], &[], &stats);
        input.language = Language::He;
        let out = assembler.assemble(&input);
        assert!(out.text.starts_with("[זיכרון: ביטחון גבוה]"));
    }
}
