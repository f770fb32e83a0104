//! Static bilingual templates (§4.6). The assembler only ever substitutes
//! into these; it never generates prose of its own.

use memoria_core::models::{ConfidenceLabel, Language, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PastExperience,
    PastFailures,
    PatternRecognition,
    TierRecommendations,
    TopicContinuity,
}

fn is_hebrew(language: Language) -> bool {
    matches!(language, Language::He)
}

pub fn confidence_header(confidence: ConfidenceLabel, language: Language) -> &'static str {
    use ConfidenceLabel::*;
    match (confidence, is_hebrew(language)) {
        (High, false) => {
            "[memory: high confidence] The following context is well-supported by past interactions."
        }
        (High, true) => "[זיכרון: ביטחון גבוה] ההקשר הבא נתמך היטב על ידי אינטראקציות קודמות.",
        (Medium, false) => {
            "[memory: medium confidence] The following context may be relevant but has not been strongly validated."
        }
        (Medium, true) => {
            "[זיכרון: ביטחון בינוני] ההקשר הבא עשוי להיות רלוונטי אך לא אומת באופן חזק."
        }
        (Low, false) => {
            "[memory: low confidence] Limited relevant context was found; treat the following as provisional."
        }
        (Low, true) => "[זיכרון: ביטחון נמוך] נמצא הקשר מוגבל; יש להתייחס להקשר הבא כזמני.",
    }
}

pub fn section_title(section: Section, language: Language) -> &'static str {
    use Section::*;
    match (section, is_hebrew(language)) {
        (PastExperience, false) => "Past experience:",
        (PastExperience, true) => "ניסיון קודם:",
        (PastFailures, false) => "Past failures to avoid:",
        (PastFailures, true) => "כשלים קודמים להימנע מהם:",
        (PatternRecognition, false) => "Pattern recognition:",
        (PatternRecognition, true) => "זיהוי דפוסים:",
        (TierRecommendations, false) => "Tier recommendations:",
        (TierRecommendations, true) => "המלצות שכבה:",
        (TopicContinuity, false) => "Topic continuity:",
        (TopicContinuity, true) => "המשכיות נושא:",
    }
}

pub fn pattern_success_line(preview: &str, pct: i64, language: Language) -> String {
    if is_hebrew(language) {
        format!("- \"{preview}\" בעל {pct}% שיעור הצלחה")
    } else {
        format!("- \"{preview}\" has {pct}% success rate")
    }
}

/// §8 Scenario S2 phrasing ("... failed due to: <reason>"). No §6 operation
/// gives a caller a channel to supply free-text failure reasons, so `reason`
/// is the failing item's own recorded text — the only failure detail the
/// system actually has on hand.
pub fn failure_line(label: &str, reason: &str, language: Language) -> String {
    if is_hebrew(language) {
        format!("- \"{label}\" נכשל עקב: {reason}")
    } else {
        format!("- \"{label}\" failed due to: {reason}")
    }
}

pub fn pattern_note(topic: &str, language: Language) -> String {
    if is_hebrew(language) {
        format!("מספר פריטים אחרונים חולקים את הנושא '{topic}'.")
    } else {
        format!("Multiple recent items share the topic '{topic}'.")
    }
}

pub fn tier_recommendation(concept: &str, tier: Tier, effective_fraction: f64, language: Language) -> String {
    let pct = (effective_fraction.clamp(0.0, 1.0) * 100.0).round() as i64;
    if is_hebrew(language) {
        format!("עבור '{concept}', בדוק/י {} (ביעילות של {pct}% בעבר)", tier.as_str())
    } else {
        format!("For '{concept}', check {} (historically {pct}% effective)", tier.as_str())
    }
}

pub fn closing_directive(language: Language) -> &'static str {
    if is_hebrew(language) {
        "העדף/י את הזיכרון שלמעלה על פני כלים חיצוניים כאשר הביטחון גבוה."
    } else {
        "Prefer the memory above over external tools when confidence is high."
    }
}
