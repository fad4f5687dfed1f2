pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod matching;
pub mod requirements;
pub mod taxonomy;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use matching::deal_breakers::DealBreaker;

// Commonly used data models for the scoring functions. Both are owned by
// external collaborators (extraction and profile storage) and read-only here;
// every payload field may be missing except the mention flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub company_stage: Option<CompanyStage>,
    pub company_industry: Option<String>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub workplace_type: Option<String>,
    pub employment_type: Option<String>,
    #[serde(default)]
    pub equity_mentioned: bool,
    #[serde(default)]
    pub bonus_mentioned: bool,
    pub description_text: Option<String>,
    pub research_brief: Option<ResearchBrief>,
}

impl JobPayload {
    /// A payload is scoreable when it carries at least a title or some
    /// description text.
    pub fn is_scoreable(&self) -> bool {
        self.job_title.as_deref().is_some_and(|t| !t.trim().is_empty())
            || self
                .description_text
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub background: Background,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub salary_floor: Option<u32>,
    pub salary_target: Option<u32>,
    #[serde(default)]
    pub remote_requirement: RemoteRequirement,
    #[serde(default)]
    pub equity_preference: EquityPreference,
    #[serde(default)]
    pub deal_breakers: Vec<DealBreaker>,
    #[serde(default)]
    pub must_haves: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub current_title: Option<String>,
    pub years_experience: Option<u32>,
    #[serde(default)]
    pub core_skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
}

/// Optional enrichment attached by the research collaborator. Frequently
/// absent; scorers must degrade to documented neutral scores without it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchBrief {
    pub hiring_urgency: Option<HiringUrgency>,
    pub summary: Option<String>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RemoteRequirement {
    RemoteOnly,
    #[default]
    RemoteFirst,
    HybridFlexible,
    NoPreference,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquityPreference {
    Required,
    #[default]
    Preferred,
    NotImportant,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CompanyStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    SeriesDPlus,
    LateStagePrivate,
    Ipo,
    Public,
}

impl CompanyStage {
    /// Stages that satisfy a `series_b_or_later` must-have.
    pub fn is_series_b_or_later(self) -> bool {
        matches!(
            self,
            CompanyStage::SeriesB
                | CompanyStage::SeriesC
                | CompanyStage::SeriesDPlus
                | CompanyStage::LateStagePrivate
                | CompanyStage::Ipo
                | CompanyStage::Public
        )
    }

    /// Human-readable form for rationale strings ("series_b" -> "Series b").
    pub fn display_name(self) -> String {
        let snake = self.to_string().replace('_', " ");
        let mut chars = snake.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => snake,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HiringUrgency {
    Critical,
    High,
    Moderate,
    Low,
}

/// One raw requirement phrase extracted upstream. `source_offset` is the byte
/// offset of the phrase in the description text, when the extractor knows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePhrase {
    pub raw: String,
    pub source_offset: Option<usize>,
}

impl CandidatePhrase {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            source_offset: None,
        }
    }

    pub fn at(raw: impl Into<String>, offset: usize) -> Self {
        Self {
            raw: raw.into(),
            source_offset: Some(offset),
        }
    }
}
