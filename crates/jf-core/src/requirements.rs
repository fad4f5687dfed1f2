//! Detects whether each classified phrase is required or desired, from
//! section membership plus local language signals. Header and signal
//! detection are ordered rule tables so precedence stays explicit and
//! independently testable.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::classify::ClassifiedPhrase;

/// Multiplier ladder: expert-level required language outranks the flat
/// required multiplier; desired items stay at 1.0.
pub const REQUIRED_MULTIPLIER: f64 = 2.0;
pub const EXPERT_MULTIPLIER: f64 = 2.2;
pub const DESIRED_MULTIPLIER: f64 = 1.0;

/// Width of the local text window inspected around a phrase, each side.
const SIGNAL_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequirementLevel {
    Required,
    Desired,
}

/// Textual cue near a phrase that overrides section membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSignal {
    ExpertRequired,
    MustHave,
    YearsRequired(u32),
    Preferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveledItem {
    pub phrase: ClassifiedPhrase,
    pub level: RequirementLevel,
    pub multiplier: f64,
    pub language_signal: Option<LanguageSignal>,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementMetadata {
    pub has_required_section: bool,
    pub has_desired_section: bool,
    /// Set when no section structure was found: every phrase defaults to
    /// required so missing structure never silently weakens scoring.
    pub default_to_required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementReport {
    pub required: Vec<LeveledItem>,
    pub desired: Vec<LeveledItem>,
    pub metadata: RequirementMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    Required,
    Desired,
    Boundary,
}

// Ordered header rules. Earlier rules are more specific; all matches feed
// the span computation, the earliest hit per kind opens that section.
// Whitespace inside the patterns is line-local ([ \t], not \s) so a header
// match can never start on a preceding blank line.
static HEADER_RULES: Lazy<Vec<(HeaderKind, Regex)>> = Lazy::new(|| {
    let rule = |kind, pattern: &str| (kind, Regex::new(pattern).unwrap());
    vec![
        rule(
            HeaderKind::Required,
            r"(?im)^[ \t]*(?:required|minimum|essential|must[ \t-]have|basic)[ \t]*(?:skills?|qualifications?|requirements?|experience)?[ \t]*:?[ \t]*$",
        ),
        rule(
            HeaderKind::Required,
            r"(?im)^[ \t]*what[ \t]+(?:you(?:'ll)?|we(?:'re)?)[ \t]+(?:need|looking[ \t]+for|require)[ \t]*:?[ \t]*$",
        ),
        rule(
            HeaderKind::Required,
            r"(?im)^[ \t]*you[ \t]+(?:should|must|will)[ \t]+have[ \t]*:?[ \t]*$",
        ),
        rule(HeaderKind::Required, r"(?im)^[ \t]*qualifications?[ \t]*:?[ \t]*$"),
        rule(HeaderKind::Required, r"(?im)^[ \t]*requirements?[ \t]*:?[ \t]*$"),
        rule(
            HeaderKind::Desired,
            r"(?im)^[ \t]*(?:preferred|desired|nice[ \t-]to[ \t-]have|bonus|additional|plus)[ \t]*(?:skills?|qualifications?|requirements?|experience)?[ \t]*:?[ \t]*$",
        ),
        rule(
            HeaderKind::Desired,
            r"(?im)^[ \t]*it(?:'s)?[ \t]+a[ \t]+plus[ \t]+if[ \t]*:?[ \t]*$",
        ),
        rule(HeaderKind::Desired, r"(?im)^[ \t]*ideal(?:ly)?[ \t]*:?[ \t]*$"),
        rule(
            HeaderKind::Boundary,
            r"(?im)^[ \t]*(?:about[ \t]+(?:us|the[ \t]+company)|benefits|what[ \t]+we[ \t]+offer|responsibilities|location|salary)[ \t]*:?[ \t]*$",
        ),
    ]
});

// Ordered signal rules: expert outranks must-have outranks years outranks
// preferred. Later checks only apply when earlier ones did not match.
static EXPERT_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:expert|advanced)\s+(?:level\s+)?(?:required|needed)|deep\s+(?:expertise|knowledge|experience)\s+(?:required|needed)",
    )
    .unwrap()
});
static MUST_HAVE_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)must\s+have|required\s+skill|essential\s+skill|mandatory|critical\s+skill")
        .unwrap()
});
static YEARS_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})\+?\s*years?\s+(?:of\s+)?(?:experience|background|track\s+record)")
        .unwrap()
});
static PREFERRED_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)preferred|nice[\s-]to[\s-]have|bonus|plus|ideal(?:ly)?|desired").unwrap()
});

#[derive(Debug, Default, PartialEq)]
struct Sections {
    required: Option<Range<usize>>,
    desired: Option<Range<usize>>,
}

fn parse_sections(text: &str) -> Sections {
    // Collect every header hit, then resolve spans: a section runs from its
    // header to the next recognized header of any kind, or end of text.
    let mut hits: Vec<(usize, HeaderKind)> = Vec::new();
    for (kind, rule) in HEADER_RULES.iter() {
        for m in rule.find_iter(text) {
            hits.push((m.start(), *kind));
        }
    }
    hits.sort_by_key(|(start, _)| *start);

    let span_for = |kind: HeaderKind| -> Option<Range<usize>> {
        let start = hits
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(start, _)| *start)?;
        let end = hits
            .iter()
            .map(|(s, _)| *s)
            .find(|s| *s > start)
            .unwrap_or(text.len());
        Some(start..end)
    };

    Sections {
        required: span_for(HeaderKind::Required),
        desired: span_for(HeaderKind::Desired),
    }
}

/// First signal rule that matches the window wins.
fn detect_language_signal(window: &str) -> Option<LanguageSignal> {
    if EXPERT_SIGNAL.is_match(window) {
        return Some(LanguageSignal::ExpertRequired);
    }
    if MUST_HAVE_SIGNAL.is_match(window) {
        return Some(LanguageSignal::MustHave);
    }
    if let Some(caps) = YEARS_SIGNAL.captures(window) {
        let years = caps[1].parse().unwrap_or(0);
        return Some(LanguageSignal::YearsRequired(years));
    }
    if PREFERRED_SIGNAL.is_match(window) {
        return Some(LanguageSignal::Preferred);
    }
    None
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn context_window(text: &str, start: usize, phrase_len: usize) -> &str {
    let lo = floor_char_boundary(text, start.saturating_sub(SIGNAL_WINDOW));
    let hi = ceil_char_boundary(text, start.saturating_add(phrase_len).saturating_add(SIGNAL_WINDOW));
    &text[lo..hi]
}

fn locate(text: &str, phrase: &ClassifiedPhrase) -> Option<usize> {
    match phrase.source_offset {
        // Trust an in-bounds extractor offset; anything else is recomputed.
        Some(offset) if offset <= text.len() => Some(floor_char_boundary(text, offset)),
        _ => text.find(&phrase.raw),
    }
}

/// Level every classified phrase against the description. Rejected phrases
/// must not be passed in; candidates are leveled for display but excluded
/// from scoring downstream. An empty phrase list yields an empty report.
pub fn detect_requirements(text: &str, phrases: &[ClassifiedPhrase]) -> RequirementReport {
    let sections = parse_sections(text);
    let metadata = RequirementMetadata {
        has_required_section: sections.required.is_some(),
        has_desired_section: sections.desired.is_some(),
        default_to_required: sections.required.is_none() && sections.desired.is_none(),
    };

    let mut report = RequirementReport {
        metadata,
        ..RequirementReport::default()
    };

    for phrase in phrases {
        let item = level_phrase(text, &sections, report.metadata.default_to_required, phrase);
        match item.level {
            RequirementLevel::Required => report.required.push(item),
            RequirementLevel::Desired => report.desired.push(item),
        }
    }

    report
}

fn level_phrase(
    text: &str,
    sections: &Sections,
    default_to_required: bool,
    phrase: &ClassifiedPhrase,
) -> LeveledItem {
    // Step 1: conservative default.
    let mut level = RequirementLevel::Required;
    let mut multiplier = REQUIRED_MULTIPLIER;
    let mut evidence = if default_to_required {
        "No explicit sections; defaulted to required".to_string()
    } else {
        "Defaulted to required".to_string()
    };

    let offset = locate(text, phrase);

    // Step 2: section membership, when the phrase can be located.
    if let Some(at) = offset {
        if let Some(span) = &sections.required {
            if span.contains(&at) {
                level = RequirementLevel::Required;
                multiplier = REQUIRED_MULTIPLIER;
                evidence = "Found in required section".into();
            }
        }
        if let Some(span) = &sections.desired {
            if span.contains(&at) {
                level = RequirementLevel::Desired;
                multiplier = DESIRED_MULTIPLIER;
                evidence = "Found in desired/preferred section".into();
            }
        }
    } else if !text.is_empty() {
        evidence = "Phrase not located in description; defaulted to required".into();
    }

    // Step 3: local language signals outrank section membership.
    let mut language_signal = None;
    if let Some(at) = offset {
        let window = context_window(text, at, phrase.raw.len());
        if let Some(signal) = detect_language_signal(window) {
            language_signal = Some(signal);
            match signal {
                LanguageSignal::ExpertRequired => {
                    level = RequirementLevel::Required;
                    multiplier = EXPERT_MULTIPLIER;
                    evidence = "Expert level explicitly required".into();
                }
                LanguageSignal::MustHave => {
                    level = RequirementLevel::Required;
                    multiplier = REQUIRED_MULTIPLIER;
                    evidence = "Must-have language detected".into();
                }
                LanguageSignal::YearsRequired(years) => {
                    level = RequirementLevel::Required;
                    multiplier = REQUIRED_MULTIPLIER;
                    evidence = format!("{years}+ years of experience required");
                }
                LanguageSignal::Preferred => {
                    level = RequirementLevel::Desired;
                    multiplier = DESIRED_MULTIPLIER;
                    evidence = "Preferred/nice-to-have language detected".into();
                }
            }
        }
    }

    LeveledItem {
        phrase: phrase.clone(),
        level,
        multiplier,
        language_signal,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_batch, ClassifiedPhrase};
    use crate::taxonomy::Taxonomy;
    use crate::CandidatePhrase;

    const SECTIONED_JD: &str = "\
We are hiring a Director of Growth.

Requirements:
Growth strategy and demand generation ownership.
5+ years of experience with paid media strategy.
Comfort partnering with sales and product owners across regions.

Nice to have:
Familiarity with Amplitude would be a bonus.

Benefits:
Health insurance and equity.
";

    fn classified(raw: &str, offset: Option<usize>) -> ClassifiedPhrase {
        let phrase = match offset {
            Some(at) => CandidatePhrase::at(raw, at),
            None => CandidatePhrase::new(raw),
        };
        let batch = classify_batch(&Taxonomy::builtin(), &[phrase], 16);
        [batch.core_skills, batch.tools, batch.candidates]
            .into_iter()
            .flatten()
            .next()
            .expect("fixture phrase should classify")
    }

    #[test]
    fn parses_required_and_desired_spans() {
        let sections = parse_sections(SECTIONED_JD);
        let required = sections.required.expect("required span");
        let desired = sections.desired.expect("desired span");

        assert!(SECTIONED_JD[required.clone()].starts_with("Requirements:"));
        assert!(SECTIONED_JD[required].contains("demand generation"));
        assert!(SECTIONED_JD[desired.clone()].contains("Amplitude"));
        // the desired span stops at the Benefits boundary header
        assert!(!SECTIONED_JD[desired].contains("Health insurance"));
    }

    #[test]
    fn section_membership_levels_phrases() {
        let phrases = vec![
            classified("demand generation", None),
            classified("Amplitude", None),
        ];
        let report = detect_requirements(SECTIONED_JD, &phrases);

        assert!(!report.metadata.default_to_required);
        assert_eq!(report.required.len(), 1);
        assert_eq!(report.desired.len(), 1);
        assert_eq!(report.required[0].phrase.raw, "demand generation");
        assert_eq!(report.desired[0].phrase.raw, "Amplitude");
    }

    #[test]
    fn headerless_text_defaults_everything_to_required() {
        let text = "We want growth strategy and Amplitude experience.";
        let phrases = vec![
            classified("growth strategy", None),
            classified("Amplitude", None),
        ];

        let report = detect_requirements(text, &phrases);
        assert!(report.metadata.default_to_required);
        assert_eq!(report.required.len(), 2);
        assert!(report.desired.is_empty());
        for item in &report.required {
            assert_eq!(item.multiplier, REQUIRED_MULTIPLIER);
        }
    }

    #[test]
    fn years_signal_captures_numeral() {
        let phrases = vec![classified("paid media strategy", None)];
        let report = detect_requirements(SECTIONED_JD, &phrases);

        let item = &report.required[0];
        assert_eq!(item.language_signal, Some(LanguageSignal::YearsRequired(5)));
        assert_eq!(item.multiplier, REQUIRED_MULTIPLIER);
        assert!(item.evidence.contains("5+"));
    }

    #[test]
    fn expert_signal_outranks_section_and_must_have() {
        let text = "Qualifications:\nSegment expertise: expert level required, a must have for us.";
        let phrases = vec![classified("Segment", None)];

        let report = detect_requirements(text, &phrases);
        let item = &report.required[0];
        assert_eq!(item.language_signal, Some(LanguageSignal::ExpertRequired));
        assert_eq!(item.multiplier, EXPERT_MULTIPLIER);
    }

    #[test]
    fn preferred_signal_moves_required_section_phrase_to_desired() {
        // Local signals take precedence over section membership.
        let text = "Requirements:\nMarketo experience preferred but not essential to start.";
        let phrases = vec![classified("Marketo", None)];

        let report = detect_requirements(text, &phrases);
        assert!(report.required.is_empty());
        let item = &report.desired[0];
        assert_eq!(item.level, RequirementLevel::Desired);
        assert_eq!(item.multiplier, DESIRED_MULTIPLIER);
    }

    #[test]
    fn no_phrases_yields_empty_report() {
        let report = detect_requirements(SECTIONED_JD, &[]);
        assert!(report.required.is_empty());
        assert!(report.desired.is_empty());
        assert!(!report.metadata.default_to_required);
    }

    #[test]
    fn window_extraction_respects_char_boundaries() {
        let text = "日本語テキスト Growth strategy が必要です。";
        let at = text.find("Growth").unwrap();
        // must not panic on multi-byte neighbors
        let window = context_window(text, at, "Growth strategy".len());
        assert!(window.contains("Growth strategy"));
    }

    #[test]
    fn out_of_bounds_offset_falls_back_to_search() {
        let text = "Requirements:\nGrowth strategy.";
        let mut phrase = classified("Growth strategy", Some(10_000));
        phrase.source_offset = Some(10_000);

        let report = detect_requirements(text, &[phrase]);
        assert_eq!(report.required.len(), 1);
        assert_eq!(report.required[0].evidence, "Found in required section");
    }
}
