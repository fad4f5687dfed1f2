//! Dual-bucket fit scoring: core skills and tools are scored separately as
//! weighted matched/total ratios, blended 70/30, then adjusted by capped
//! penalties for missing required items. Every penalty is itemized so the
//! presentation layer can show exactly where the score went.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::requirements::{LanguageSignal, LeveledItem, RequirementReport};
use crate::classify::PhraseKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitScoreConfig {
    pub core_skills_weight: f64,
    pub tools_weight: f64,
    pub required_multiplier: f64,
    pub desired_multiplier: f64,
    pub penalty_missing_required_skill: f64,
    pub penalty_missing_required_tool_standard: f64,
    pub penalty_missing_required_tool_expert: f64,
    pub penalty_missing_desired_tool: f64,
    /// Only the first N missing desired tools are penalized, so a long tail
    /// of desired gaps cannot dominate the score.
    pub desired_tool_penalty_cap: usize,
    /// Floor for the summed penalties; the total is never more punitive.
    pub max_total_penalty: f64,
}

impl Default for FitScoreConfig {
    fn default() -> Self {
        Self {
            core_skills_weight: 0.70,
            tools_weight: 0.30,
            required_multiplier: 2.0,
            desired_multiplier: 1.0,
            penalty_missing_required_skill: -0.10,
            penalty_missing_required_tool_standard: -0.12,
            penalty_missing_required_tool_expert: -0.15,
            penalty_missing_desired_tool: -0.05,
            desired_tool_penalty_cap: 3,
            max_total_penalty: -0.50,
        }
    }
}

impl FitScoreConfig {
    pub fn bucket_weights_sum(&self) -> f64 {
        self.core_skills_weight + self.tools_weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PenaltyKind {
    MissingRequiredSkill,
    MissingRequiredTool,
    MissingDesiredTool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub kind: PenaltyKind,
    pub item: String,
    /// Always negative.
    pub value: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketScore {
    pub score: f64,
    pub required_matched: usize,
    pub required_total: usize,
    pub desired_matched: usize,
    pub desired_total: usize,
    pub required_missing: Vec<String>,
    pub desired_missing: Vec<String>,
    pub matched_items: Vec<String>,
}

/// Echo of the weights a result was computed with, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitWeights {
    pub core_skills_weight: f64,
    pub tools_weight: f64,
    pub required_multiplier: f64,
    pub desired_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitMetadata {
    pub scored_at: DateTime<Utc>,
    pub config_version: String,
    pub degraded_config: bool,
    pub phrases_truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitBreakdown {
    pub core_skills: BucketScore,
    pub tools: BucketScore,
    pub penalties: Vec<Penalty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScoreResult {
    pub overall_score: f64,
    pub breakdown: FitBreakdown,
    pub weights_used: FitWeights,
    pub metadata: FitMetadata,
}

/// Leveled items split by bucket and requirement level. Candidates and
/// rejected phrases never enter the buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeveledBuckets {
    pub required_core: Vec<LeveledItem>,
    pub desired_core: Vec<LeveledItem>,
    pub required_tools: Vec<LeveledItem>,
    pub desired_tools: Vec<LeveledItem>,
}

impl LeveledBuckets {
    pub fn from_report(report: &RequirementReport) -> Self {
        let mut buckets = Self::default();
        for item in &report.required {
            match item.phrase.classification.kind {
                PhraseKind::CoreSkill => buckets.required_core.push(item.clone()),
                PhraseKind::Tool => buckets.required_tools.push(item.clone()),
                _ => {}
            }
        }
        for item in &report.desired {
            match item.phrase.classification.kind {
                PhraseKind::CoreSkill => buckets.desired_core.push(item.clone()),
                PhraseKind::Tool => buckets.desired_tools.push(item.clone()),
                _ => {}
            }
        }
        buckets
    }
}

pub struct FitScoreEngine {
    config: FitScoreConfig,
}

impl FitScoreEngine {
    pub fn new(config: FitScoreConfig) -> Self {
        Self { config }
    }

    /// Score the job's leveled requirements against the user's canonicalized
    /// skill and tool sets.
    pub fn calculate(
        &self,
        buckets: &LeveledBuckets,
        user_skills: &HashSet<String>,
        user_tools: &HashSet<String>,
        metadata: FitMetadata,
    ) -> FitScoreResult {
        let core_skills =
            self.bucket_score(&buckets.required_core, &buckets.desired_core, user_skills);
        let tools =
            self.bucket_score(&buckets.required_tools, &buckets.desired_tools, user_tools);

        let penalties = self.calculate_penalties(buckets, user_skills, user_tools);
        let penalty_sum: f64 = penalties.iter().map(|p| p.value).sum();
        let capped_penalty = penalty_sum.max(self.config.max_total_penalty);

        let raw = core_skills.score * self.config.core_skills_weight
            + tools.score * self.config.tools_weight;
        let overall_score = (raw + capped_penalty).clamp(0.0, 1.0);

        FitScoreResult {
            overall_score,
            breakdown: FitBreakdown {
                core_skills,
                tools,
                penalties,
            },
            weights_used: FitWeights {
                core_skills_weight: self.config.core_skills_weight,
                tools_weight: self.config.tools_weight,
                required_multiplier: self.config.required_multiplier,
                desired_multiplier: self.config.desired_multiplier,
            },
            metadata,
        }
    }

    /// Weighted matched/total ratio for one bucket. Both totals zero scores
    /// 0, not 1: the absence of requirements is not a perfect match.
    fn bucket_score(
        &self,
        required: &[LeveledItem],
        desired: &[LeveledItem],
        user_items: &HashSet<String>,
    ) -> BucketScore {
        let rm = self.config.required_multiplier;
        let dm = self.config.desired_multiplier;

        let mut bucket = BucketScore {
            required_total: required.len(),
            desired_total: desired.len(),
            ..BucketScore::default()
        };

        for item in required {
            let key = item.phrase.classification.bucket_key();
            if user_items.contains(&key) {
                bucket.required_matched += 1;
                bucket.matched_items.push(key);
            } else {
                bucket.required_missing.push(item.phrase.classification.name.clone());
            }
        }
        for item in desired {
            let key = item.phrase.classification.bucket_key();
            if user_items.contains(&key) {
                bucket.desired_matched += 1;
                bucket.matched_items.push(key);
            } else {
                bucket.desired_missing.push(item.phrase.classification.name.clone());
            }
        }

        let numerator = bucket.required_matched as f64 * rm + bucket.desired_matched as f64 * dm;
        let denominator = bucket.required_total as f64 * rm + bucket.desired_total as f64 * dm;
        bucket.score = if denominator > 0.0 {
            (numerator / denominator).clamp(0.0, 1.0)
        } else {
            0.0
        };

        bucket
    }

    /// One itemized penalty per missing required item; desired-tool gaps are
    /// penalized for the first `desired_tool_penalty_cap` only. An
    /// `expert_required` language signal raises the tool penalty; it never
    /// touches the ratio formula.
    fn calculate_penalties(
        &self,
        buckets: &LeveledBuckets,
        user_skills: &HashSet<String>,
        user_tools: &HashSet<String>,
    ) -> Vec<Penalty> {
        let mut penalties = Vec::new();

        for item in missing(&buckets.required_core, user_skills) {
            let name = item.phrase.classification.name.clone();
            penalties.push(Penalty {
                kind: PenaltyKind::MissingRequiredSkill,
                value: self.config.penalty_missing_required_skill,
                reason: format!("Missing required core skill: {name}"),
                item: name,
            });
        }

        for item in missing(&buckets.required_tools, user_tools) {
            let name = item.phrase.classification.name.clone();
            let expert = item.language_signal == Some(LanguageSignal::ExpertRequired);
            let value = if expert {
                self.config.penalty_missing_required_tool_expert
            } else {
                self.config.penalty_missing_required_tool_standard
            };
            penalties.push(Penalty {
                kind: PenaltyKind::MissingRequiredTool,
                value,
                reason: if expert {
                    format!("Missing required tool: {name} (expert level)")
                } else {
                    format!("Missing required tool: {name}")
                },
                item: name,
            });
        }

        for item in missing(&buckets.desired_tools, user_tools)
            .take(self.config.desired_tool_penalty_cap)
        {
            let name = item.phrase.classification.name.clone();
            penalties.push(Penalty {
                kind: PenaltyKind::MissingDesiredTool,
                value: self.config.penalty_missing_desired_tool,
                reason: format!("Missing desired tool: {name}"),
                item: name,
            });
        }

        penalties
    }
}

fn missing<'a>(
    items: &'a [LeveledItem],
    user_items: &'a HashSet<String>,
) -> impl Iterator<Item = &'a LeveledItem> {
    items
        .iter()
        .filter(|item| !user_items.contains(&item.phrase.classification.bucket_key()))
}
