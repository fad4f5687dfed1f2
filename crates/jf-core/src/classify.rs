//! Four-layer rule cascade classifying one extracted phrase as a core
//! skill, a tool, a review candidate, or rejected. First match wins; layer
//! order is a hard contract (soft-skill rejection can never be overridden
//! by a later layer).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::taxonomy::{canonicalize, MatchKind, Taxonomy};
use crate::CandidatePhrase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhraseKind {
    CoreSkill,
    Tool,
    Candidate,
    Rejected,
}

/// Dictionary entry a classification resolved to, carried for UI evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedEntry {
    pub name: String,
    pub canonical: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: PhraseKind,
    pub canonical: Option<String>,
    pub name: String,
    pub confidence: f64,
    pub evidence: String,
    pub matched_entry: Option<MatchedEntry>,
    /// Weak lean for candidates only; candidates are never auto-scored.
    pub inferred_kind: Option<PhraseKind>,
}

impl Classification {
    /// The canonical key used for bucket matching, falling back to the
    /// normalized phrase for pattern-classified items.
    pub fn bucket_key(&self) -> String {
        self.canonical
            .clone()
            .unwrap_or_else(|| canonicalize(&self.name))
    }
}

/// A phrase together with its classification; offsets survive so the
/// requirement detector can locate the phrase in the description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPhrase {
    pub raw: String,
    pub source_offset: Option<usize>,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedBatch {
    pub core_skills: Vec<ClassifiedPhrase>,
    pub tools: Vec<ClassifiedPhrase>,
    pub candidates: Vec<ClassifiedPhrase>,
    pub rejected: Vec<ClassifiedPhrase>,
}

impl ClassifiedBatch {
    pub fn len(&self) -> usize {
        self.core_skills.len() + self.tools.len() + self.candidates.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static BRAND_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:hub|force|flow|base|desk|suite|cloud|stack)").unwrap());
static ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2,5}$").unwrap());
static HAS_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
static ING_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+ing$").unwrap());
static ING_STOPLIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:training|testing|learning)$").unwrap());
static SKILL_NOUN_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" (?:strategy|analysis|optimization|management)$").unwrap());

/// Trim bullet/punctuation edges and collapse internal whitespace.
pub fn clean_phrase(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| matches!(c, ',' | '.' | '-' | '•' | '*' | ':' | ';') || c.is_whitespace());
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify one phrase through the ordered cascade. Purely functional: the
/// same phrase and taxonomy always yield the same classification.
pub fn classify_phrase(taxonomy: &Taxonomy, raw: &str) -> Classification {
    let cleaned = clean_phrase(raw);
    if cleaned.chars().count() < 2 {
        return rejected(raw, "Too short or empty".into());
    }

    // Layer 0: soft-skill rejection, blocking.
    if let Some(pattern) = taxonomy.match_soft_skill(&cleaned) {
        return rejected(&cleaned, format!("Soft skill: matched pattern `{pattern}`"));
    }

    // Layer 1: exact dictionary / alias match, skills before tools.
    if let Some(hit) = dictionary_match(taxonomy, &cleaned) {
        return hit;
    }

    // Layer 2: forced core skills (product override).
    if taxonomy.is_forced_core_skill(&cleaned) {
        return Classification {
            kind: PhraseKind::CoreSkill,
            canonical: Some(canonicalize(&cleaned)),
            name: cleaned,
            confidence: 1.0,
            evidence: "Forced core skill (product override)".into(),
            matched_entry: None,
            inferred_kind: None,
        };
    }

    // Layer 3: pattern rules, in priority order.
    if let Some(hit) = pattern_match(&cleaned) {
        return hit;
    }

    // Layer 4: candidates bucket, flagged for human review.
    candidate(&cleaned)
}

fn dictionary_match(taxonomy: &Taxonomy, cleaned: &str) -> Option<Classification> {
    if let Some((entry, kind)) = taxonomy.lookup_skill(cleaned) {
        return Some(Classification {
            kind: PhraseKind::CoreSkill,
            canonical: Some(entry.canonical.clone()),
            name: entry.name.clone(),
            confidence: dictionary_confidence(kind),
            evidence: dictionary_evidence(kind, "skills"),
            matched_entry: Some(MatchedEntry {
                name: entry.name.clone(),
                canonical: entry.canonical.clone(),
                category: entry.category.clone(),
            }),
            inferred_kind: None,
        });
    }

    if let Some((entry, kind)) = taxonomy.lookup_tool(cleaned) {
        return Some(Classification {
            kind: PhraseKind::Tool,
            canonical: Some(entry.canonical.clone()),
            name: entry.name.clone(),
            confidence: dictionary_confidence(kind),
            evidence: dictionary_evidence(kind, "tools"),
            matched_entry: Some(MatchedEntry {
                name: entry.name.clone(),
                canonical: entry.canonical.clone(),
                category: entry.category.clone(),
            }),
            inferred_kind: None,
        });
    }

    None
}

fn dictionary_confidence(kind: MatchKind) -> f64 {
    match kind {
        MatchKind::Name => 1.0,
        MatchKind::Alias | MatchKind::Fuzzy => 0.95,
    }
}

fn dictionary_evidence(kind: MatchKind, dictionary: &str) -> String {
    match kind {
        MatchKind::Name => format!("Exact match in {dictionary} dictionary"),
        MatchKind::Alias => format!("Exact alias match in {dictionary} dictionary"),
        MatchKind::Fuzzy => format!("Near-exact alias match in {dictionary} dictionary"),
    }
}

fn pattern_match(cleaned: &str) -> Option<Classification> {
    let normalized = cleaned.to_lowercase();
    let capitalized = cleaned.chars().next().is_some_and(|c| c.is_ascii_uppercase());

    // Brand names are tools: capitalized with a common product suffix.
    if capitalized && BRAND_SUFFIX.is_match(cleaned) {
        return Some(pattern_tool(cleaned, 0.75, "Pattern: brand-name tool suffix"));
    }

    // Bare 2-5 letter acronyms are usually tools.
    if ACRONYM.is_match(cleaned) {
        return Some(pattern_tool(cleaned, 0.65, "Pattern: acronym (likely tool)"));
    }

    // Version numbers and product names carry digits.
    if HAS_DIGIT.is_match(cleaned) {
        return Some(pattern_tool(
            cleaned,
            0.70,
            "Pattern: contains digits (likely tool/version)",
        ));
    }

    // -ing words read as actions/skills, minus a small stoplist.
    if ING_SUFFIX.is_match(&normalized) && !ING_STOPLIST.is_match(&normalized) {
        return Some(Classification {
            kind: PhraseKind::CoreSkill,
            canonical: Some(canonicalize(cleaned)),
            name: cleaned.to_string(),
            confidence: 0.60,
            evidence: "Pattern: -ing suffix (likely action/skill)".into(),
            matched_entry: None,
            inferred_kind: None,
        });
    }

    None
}

fn pattern_tool(cleaned: &str, confidence: f64, evidence: &str) -> Classification {
    Classification {
        kind: PhraseKind::Tool,
        canonical: Some(canonicalize(cleaned)),
        name: cleaned.to_string(),
        confidence,
        evidence: evidence.into(),
        matched_entry: None,
        inferred_kind: None,
    }
}

fn candidate(cleaned: &str) -> Classification {
    let normalized = cleaned.to_lowercase();
    let capitalized = cleaned.chars().next().is_some_and(|c| c.is_ascii_uppercase());

    let (inferred, confidence) = if capitalized {
        (Some(PhraseKind::Tool), 0.40)
    } else if SKILL_NOUN_SUFFIX.is_match(&normalized) {
        (Some(PhraseKind::CoreSkill), 0.45)
    } else {
        (None, 0.35)
    };

    Classification {
        kind: PhraseKind::Candidate,
        canonical: Some(canonicalize(cleaned)),
        name: cleaned.to_string(),
        confidence,
        evidence: "No clear classification; needs human review".into(),
        matched_entry: None,
        inferred_kind: inferred,
    }
}

fn rejected(phrase: &str, reason: String) -> Classification {
    Classification {
        kind: PhraseKind::Rejected,
        canonical: None,
        name: phrase.to_string(),
        confidence: 0.0,
        evidence: reason,
        matched_entry: None,
        inferred_kind: None,
    }
}

/// Classify a batch of extracted phrases, partitioned by outcome. At most
/// `max_phrases` are considered; overflow is dropped with a warning so
/// attacker-sized inputs cannot stall the pipeline.
pub fn classify_batch(
    taxonomy: &Taxonomy,
    phrases: &[CandidatePhrase],
    max_phrases: usize,
) -> ClassifiedBatch {
    if phrases.len() > max_phrases {
        tracing::warn!(
            total = phrases.len(),
            max = max_phrases,
            "phrase list exceeds cap; excess dropped"
        );
    }

    let mut batch = ClassifiedBatch::default();
    for phrase in phrases.iter().take(max_phrases) {
        let classification = classify_phrase(taxonomy, &phrase.raw);
        let classified = ClassifiedPhrase {
            raw: phrase.raw.clone(),
            source_offset: phrase.source_offset,
            classification,
        };

        match classified.classification.kind {
            PhraseKind::CoreSkill => batch.core_skills.push(classified),
            PhraseKind::Tool => batch.tools.push(classified),
            PhraseKind::Candidate => batch.candidates.push(classified),
            PhraseKind::Rejected => batch.rejected.push(classified),
        }
    }

    batch
}
