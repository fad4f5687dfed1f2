//! Bidirectional rubric scoring: job→user (does the job meet the user's
//! preferences?) and user→job (does the user match the job's needs?), each a
//! weighted set of 0–50 dimensions, combined into one 0–100 result with a
//! narrative interpretation. The deal-breaker gate runs before any job→user
//! dimension and short-circuits the whole direction when it fires.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::matching::deal_breakers::{format_usd, run_deal_breaker_gate};
use crate::matching::weights::{JobToUserWeights, UserToJobWeights};
use crate::matching::workplace::{normalize_workplace, WorkplaceKind};
use crate::{
    CompanyStage, EquityPreference, HiringUrgency, JobPayload, RemoteRequirement, UserProfile,
};

const MAX_DIMENSION_SCORE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricConfig {
    pub job_to_user: JobToUserWeights,
    pub user_to_job: UserToJobWeights,
    /// Fallbacks when the profile does not state a salary band.
    pub default_salary_floor: u32,
    pub default_salary_target: u32,
    pub stage_scores: HashMap<CompanyStage, f64>,
    /// Score for a stage missing from the table (or an unknown stage).
    pub stage_fallback_score: f64,
    /// Bonus when a `series_b_or_later` must-have is satisfied.
    pub stage_must_have_bonus: f64,
    /// Keyword cluster measuring the role's core-domain component.
    pub domain_keywords: Vec<String>,
    /// Industries counted as adjacent to the user's background.
    pub adjacent_industries: Vec<String>,
    /// Ordered, non-overlapping label bands, highest `min` first.
    pub score_labels: Vec<LabelBand>,
    /// Per-direction "good" cut-offs used by the interpretation templates.
    pub good_threshold_job_to_user: f64,
    pub good_threshold_user_to_job: f64,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            job_to_user: JobToUserWeights::default(),
            user_to_job: UserToJobWeights::default(),
            default_salary_floor: 150_000,
            default_salary_target: 200_000,
            stage_scores: HashMap::from([
                (CompanyStage::PreSeed, 10.0),
                (CompanyStage::Seed, 15.0),
                (CompanyStage::SeriesA, 25.0),
                (CompanyStage::SeriesB, 40.0),
                (CompanyStage::SeriesC, 42.0),
                (CompanyStage::SeriesDPlus, 45.0),
                (CompanyStage::LateStagePrivate, 45.0),
                (CompanyStage::Ipo, 40.0),
                (CompanyStage::Public, 38.0),
            ]),
            stage_fallback_score: 20.0,
            stage_must_have_bonus: 8.0,
            domain_keywords: [
                "revops",
                "revenue operations",
                "marketing operations",
                "automation",
                "crm",
                "attribution",
                "pipeline",
                "forecasting",
                "data infrastructure",
                "workflows",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            adjacent_industries: ["ecommerce", "saas", "marketplace", "consumer", "d2c"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            score_labels: vec![
                LabelBand::new(80.0, "STRONG FIT", "Apply immediately", "#27ae60"),
                LabelBand::new(70.0, "GOOD FIT", "Apply", "#2ecc71"),
                LabelBand::new(50.0, "MODERATE FIT", "Research further before applying", "#f1c40f"),
                LabelBand::new(30.0, "WEAK FIT", "Skip unless something stands out", "#e67e22"),
                LabelBand::new(0.0, "POOR FIT", "Skip", "#e74c3c"),
            ],
            good_threshold_job_to_user: 35.0,
            good_threshold_user_to_job: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBand {
    pub min: f64,
    pub label: String,
    pub action: String,
    pub color: String,
}

impl LabelBand {
    fn new(min: f64, label: &str, action: &str, color: &str) -> Self {
        Self {
            min,
            label: label.into(),
            action: action.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum FitLabel {
    Good,
    Moderate,
    Weak,
    Fail,
}

/// One scored rubric dimension. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub criteria: String,
    pub actual_value: String,
    pub weight: f64,
    pub score: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionFit {
    pub score: f64,
    pub label: FitLabel,
    pub breakdown: Vec<DimensionScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub summary: String,
    pub action: String,
    pub conversation_starters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub overall_score: f64,
    pub overall_label: String,
    pub action: String,
    pub color: String,
    pub job_to_user_fit: DirectionFit,
    pub user_to_job_fit: DirectionFit,
    pub interpretation: Interpretation,
}

pub struct RubricEngine {
    config: RubricConfig,
    domain_matchers: Vec<Regex>,
}

impl RubricEngine {
    pub fn new(mut config: RubricConfig) -> Self {
        // band lookup assumes highest-min-first ordering
        config
            .score_labels
            .sort_by(|a, b| b.min.total_cmp(&a.min));
        let domain_matchers = config
            .domain_keywords
            .iter()
            .map(|kw| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).unwrap())
            .collect();
        Self {
            config,
            domain_matchers,
        }
    }

    pub fn config(&self) -> &RubricConfig {
        &self.config
    }

    /// Job→User fit: deal-breaker gate first, then the five preference
    /// dimensions.
    pub fn score_job_to_user(&self, job: &JobPayload, profile: &UserProfile) -> DirectionFit {
        let weights = &self.config.job_to_user;

        if let Some((breaker, reason)) =
            run_deal_breaker_gate(job, profile, self.config.default_salary_floor)
        {
            return DirectionFit {
                score: 0.0,
                label: FitLabel::Fail,
                breakdown: vec![DimensionScore {
                    criteria: "Deal-breaker detected".into(),
                    actual_value: breaker.to_string(),
                    weight: weights.deal_breakers,
                    score: 0.0,
                    rationale: format!("Job failed automatic filter: {reason}"),
                }],
            };
        }

        let breakdown = vec![
            self.score_salary(job, profile),
            self.score_workplace(job, profile),
            self.score_equity(job, profile),
            self.score_company_stage(job, profile),
            DimensionScore {
                criteria: "Deal-breaker scan".into(),
                actual_value: "PASS".into(),
                weight: weights.deal_breakers,
                score: MAX_DIMENSION_SCORE,
                rationale: "No hard \"no\"s detected".into(),
            },
        ];

        let score = weighted_total(&breakdown);
        DirectionFit {
            score,
            label: direction_label(score, 40.0, 25.0),
            breakdown,
        }
    }

    /// User→Job fit: the five capability dimensions. No gate on this
    /// direction.
    pub fn score_user_to_job(&self, job: &JobPayload, profile: &UserProfile) -> DirectionFit {
        let breakdown = vec![
            self.score_role_type(job, profile),
            self.score_domain_component(job),
            self.score_skill_match(job, profile),
            self.score_industry(job, profile),
            self.score_org_complexity(job),
        ];

        let score = weighted_total(&breakdown);
        DirectionFit {
            score,
            label: direction_label(score, 35.0, 20.0),
            breakdown,
        }
    }

    /// Combine both directions: 0–50 + 0–50 = 0–100, labeled by band.
    pub fn combine(&self, job_to_user: DirectionFit, user_to_job: DirectionFit) -> CombinedResult {
        let overall_score = job_to_user.score + user_to_job.score;

        let band = self
            .config
            .score_labels
            .iter()
            .find(|band| overall_score >= band.min)
            .or_else(|| self.config.score_labels.last());
        let (label, action, color) = match band {
            Some(band) => (band.label.clone(), band.action.clone(), band.color.clone()),
            None => ("POOR FIT".into(), "Skip".into(), "#e74c3c".into()),
        };

        let interpretation = self.interpret(&job_to_user, &user_to_job);

        CombinedResult {
            overall_score,
            overall_label: label,
            action,
            color,
            job_to_user_fit: job_to_user,
            user_to_job_fit: user_to_job,
            interpretation,
        }
    }

    // ── Job→User dimensions ────────────────────────────────────────────────

    fn score_salary(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let floor = profile
            .preferences
            .salary_floor
            .unwrap_or(self.config.default_salary_floor) as f64;
        let target = profile
            .preferences
            .salary_target
            .unwrap_or(self.config.default_salary_target) as f64;
        let weight = self.config.job_to_user.salary;
        let criteria = format!(
            "Salary (vs. floor of {})",
            format_usd(floor as u32)
        );

        let (Some(lower), Some(upper)) = (
            job.salary_min.or(job.salary_max),
            job.salary_max.or(job.salary_min),
        ) else {
            return DimensionScore {
                criteria,
                actual_value: "Not specified".into(),
                weight,
                score: 20.0,
                rationale: "Salary not disclosed; unable to evaluate".into(),
            };
        };

        let actual_value = if job.salary_min.is_some() && job.salary_max.is_some() {
            format!("{}–{}", format_usd(lower), format_usd(upper))
        } else {
            format!("~{}", format_usd(lower))
        };

        let lower_f = lower as f64;
        let upper_f = upper as f64;

        let (score, rationale) = if lower_f < floor {
            let score = ((lower_f / floor) * 30.0).round().max(5.0);
            (
                score,
                format!(
                    "Base of {} is below floor of {}",
                    format_usd(lower),
                    format_usd(floor as u32)
                ),
            )
        } else if upper_f >= target {
            let excess = (upper_f - target) / target * 100.0;
            let rationale = if excess >= 20.0 {
                format!(
                    "Exceptional: {} exceeds target by {}%",
                    format_usd(upper),
                    excess.round()
                )
            } else {
                format!("Meets target: range reaches {}", format_usd(upper))
            };
            (MAX_DIMENSION_SCORE, rationale)
        } else {
            let progress = if target > floor {
                (upper_f - floor) / (target - floor)
            } else {
                1.0
            };
            (
                30.0 + (progress * 20.0).round(),
                format!(
                    "Meets floor; {}% of the way to target",
                    (progress * 100.0).round()
                ),
            )
        };

        DimensionScore {
            criteria,
            actual_value,
            weight,
            score: score.clamp(0.0, MAX_DIMENSION_SCORE),
            rationale,
        }
    }

    fn score_workplace(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let requirement = profile.preferences.remote_requirement;
        let kind = normalize_workplace(job.workplace_type.as_deref());

        let (score, rationale) = match requirement {
            RemoteRequirement::RemoteOnly => match kind {
                WorkplaceKind::Remote => (50.0, "Matches requirement: remote only".to_string()),
                _ => (0.0, "Fails requirement: job is not fully remote".to_string()),
            },
            RemoteRequirement::RemoteFirst => match kind {
                WorkplaceKind::Remote => (50.0, "Matches preference: fully remote".to_string()),
                WorkplaceKind::Hybrid => {
                    (35.0, "Acceptable: hybrid, but remote preferred".to_string())
                }
                _ => (0.0, "Fails requirement: not remote-capable".to_string()),
            },
            RemoteRequirement::HybridFlexible => match kind {
                WorkplaceKind::Remote | WorkplaceKind::Hybrid => {
                    (50.0, format!("Matches preference: {}", kind.display_name()))
                }
                _ => (20.0, "Not preferred: on-site, but could negotiate".to_string()),
            },
            RemoteRequirement::NoPreference => match kind {
                WorkplaceKind::Remote => (50.0, "Ideal: fully remote".to_string()),
                WorkplaceKind::Hybrid => (30.0, "Acceptable: hybrid".to_string()),
                _ => (10.0, "Not preferred: on-site".to_string()),
            },
        };

        DimensionScore {
            criteria: format!("Remote requirement ({requirement})"),
            actual_value: kind.display_name().to_string(),
            weight: self.config.job_to_user.workplace,
            score,
            rationale,
        }
    }

    fn score_equity(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let preference = profile.preferences.equity_preference;
        let has_equity = job.equity_mentioned;
        let has_bonus = job.bonus_mentioned;

        let actual_value = match (has_equity, has_bonus) {
            (true, true) => "Equity + Bonus",
            (true, false) => "Equity only",
            (false, true) => "Bonus only",
            (false, false) => "Neither mentioned",
        };

        let (score, rationale) = match preference {
            EquityPreference::Required => match (has_equity, has_bonus) {
                (true, true) => (50.0, "Excellent: both equity and performance bonus present"),
                (true, false) | (false, true) => (35.0, "Partial: only one of equity/bonus mentioned"),
                (false, false) => (0.0, "Fails requirement: no equity or bonus mentioned"),
            },
            EquityPreference::Preferred => match (has_equity, has_bonus) {
                (true, true) => (50.0, "Ideal: both equity and bonus present"),
                (true, false) | (false, true) => (40.0, "Good: one of equity/bonus present"),
                (false, false) => (20.0, "Not ideal but acceptable"),
            },
            EquityPreference::NotImportant => {
                if has_equity || has_bonus {
                    (30.0, "No strong preference; upside present")
                } else {
                    (25.0, "No strong preference; base only")
                }
            }
        };

        DimensionScore {
            criteria: format!("Equity/Bonus ({preference})"),
            actual_value: actual_value.into(),
            weight: self.config.job_to_user.equity,
            score,
            rationale: rationale.into(),
        }
    }

    fn score_company_stage(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let weight = self.config.job_to_user.stage;

        let Some(stage) = job.company_stage else {
            return DimensionScore {
                criteria: "Company stage (Series B+ preferred)".into(),
                actual_value: "Unknown".into(),
                weight,
                score: self.config.stage_fallback_score,
                rationale: "Stage not identified; using default score".into(),
            };
        };

        let base = self
            .config
            .stage_scores
            .get(&stage)
            .copied()
            .unwrap_or(self.config.stage_fallback_score);

        let wants_series_b = profile
            .preferences
            .must_haves
            .iter()
            .any(|m| m == "series_b_or_later");
        let bonus = if wants_series_b && stage.is_series_b_or_later() {
            self.config.stage_must_have_bonus
        } else {
            0.0
        };

        DimensionScore {
            criteria: "Company stage (Series B+ preferred)".into(),
            actual_value: stage.display_name(),
            weight,
            score: (base + bonus).min(MAX_DIMENSION_SCORE),
            rationale: if bonus > 0.0 {
                format!("Stage is {}; satisfies series_b_or_later must-have", stage)
            } else {
                format!("Stage is {stage}")
            },
        }
    }

    // ── User→Job dimensions ────────────────────────────────────────────────

    fn score_role_type(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let weight = self.config.user_to_job.role_type;
        let criteria = "Role type vs. target roles".to_string();

        let Some(title) = job.job_title.as_deref().filter(|t| !t.trim().is_empty()) else {
            return DimensionScore {
                criteria,
                actual_value: "Unknown".into(),
                weight,
                score: 15.0,
                rationale: "No job title available to match".into(),
            };
        };
        let title_lower = title.to_lowercase();

        let exact = profile.background.target_roles.iter().any(|target| {
            let key = target
                .to_lowercase()
                .split_whitespace()
                .take(2)
                .collect::<Vec<_>>()
                .join(" ");
            !key.is_empty() && title_lower.contains(&key)
        });

        let (score, rationale) = if exact {
            (50.0, "Exact match: title aligns with target roles")
        } else if title_lower.contains("growth")
            || title_lower.contains("revops")
            || title_lower.contains("revenue operations")
        {
            (40.0, "Strong signal: title carries core domain keywords")
        } else if title_lower.contains("director")
            || title_lower.contains("head")
            || title_lower.contains("vp")
        {
            (35.0, "Seniority matches but not the exact role")
        } else if title_lower.contains("manager") || title_lower.contains("lead") {
            (25.0, "Below target seniority")
        } else {
            (15.0, "Title does not match target roles")
        };

        DimensionScore {
            criteria,
            actual_value: title.to_string(),
            weight,
            score,
            rationale: rationale.into(),
        }
    }

    /// Keyword-cluster occurrences bucketed by count thresholds, not raw
    /// frequency, so one over-used generic term cannot inflate the score.
    fn score_domain_component(&self, job: &JobPayload) -> DimensionScore {
        let weight = self.config.user_to_job.domain_component;
        let criteria = "Domain component strength".to_string();

        let Some(description) = job.description_text.as_deref().filter(|d| !d.trim().is_empty())
        else {
            return DimensionScore {
                criteria,
                actual_value: "Unknown".into(),
                weight,
                score: 10.0,
                rationale: "No description text available to assess".into(),
            };
        };

        let count: usize = self
            .domain_matchers
            .iter()
            .map(|m| m.find_iter(description).count())
            .sum();

        let (score, strength, rationale) = if count >= 5 {
            (50.0, "Strong", "Role is heavily focused on the core domain")
        } else if count >= 3 {
            (35.0, "Moderate", "Core domain is a significant component")
        } else if count >= 1 {
            (20.0, "Weak", "Some domain signals present")
        } else {
            (10.0, "Minimal/None", "Little to no core-domain component")
        };

        DimensionScore {
            criteria,
            actual_value: format!("{strength} ({count} keyword hits)"),
            weight,
            score,
            rationale: rationale.into(),
        }
    }

    fn score_skill_match(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let weight = self.config.user_to_job.skill_match;
        let criteria = "Skill match".to_string();
        let user_skills = &profile.background.core_skills;

        if user_skills.is_empty() {
            return DimensionScore {
                criteria,
                actual_value: "0/0 skills matched".into(),
                weight,
                score: 0.0,
                rationale: "No skills in profile to match against".into(),
            };
        }

        let description = job
            .description_text
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let matched = user_skills
            .iter()
            .filter(|skill| {
                let keyword = skill.replace('_', " ").to_lowercase();
                !keyword.is_empty() && description.contains(&keyword)
            })
            .count();

        let percentage = matched as f64 / user_skills.len() as f64 * 100.0;
        let (score, rationale) = if description.is_empty() {
            (10.0, "No description text available to match against".to_string())
        } else if percentage >= 80.0 {
            (50.0, format!("Excellent match: {}% of skills mentioned", percentage.round()))
        } else if percentage >= 60.0 {
            (40.0, format!("Good match: {}% of skills mentioned", percentage.round()))
        } else if percentage >= 40.0 {
            (30.0, format!("Partial match: {}% of skills mentioned", percentage.round()))
        } else if percentage >= 20.0 {
            (20.0, format!("Weak match: only {}% of skills mentioned", percentage.round()))
        } else {
            (10.0, "Minimal skill overlap".to_string())
        };

        DimensionScore {
            criteria,
            actual_value: format!("{matched}/{} skills matched", user_skills.len()),
            weight,
            score,
            rationale,
        }
    }

    fn score_industry(&self, job: &JobPayload, profile: &UserProfile) -> DimensionScore {
        let weight = self.config.user_to_job.industry;
        let criteria = "Industry alignment".to_string();

        let Some(industry) = job.company_industry.as_deref().filter(|i| !i.trim().is_empty())
        else {
            return DimensionScore {
                criteria,
                actual_value: "Unknown".into(),
                weight,
                score: 20.0,
                rationale: "Industry not identified; assuming transferable skills".into(),
            };
        };
        let industry_lower = industry.to_lowercase();

        let exact = profile.background.industries.iter().any(|ind| {
            ind.to_lowercase()
                .split(['_', ' '])
                .next()
                .is_some_and(|token| !token.is_empty() && industry_lower.contains(token))
        });

        let (score, rationale) = if exact {
            (50.0, format!("Direct experience in {industry_lower}"))
        } else if self
            .config
            .adjacent_industries
            .iter()
            .any(|adj| industry_lower.contains(adj.as_str()))
        {
            (35.0, format!("Adjacent to user's background ({industry_lower})"))
        } else {
            (20.0, "New industry; transferable but unproven".to_string())
        };

        DimensionScore {
            criteria,
            actual_value: industry.to_string(),
            weight,
            score,
            rationale,
        }
    }

    /// Explicitly speculative: keyed off whatever research-brief signal
    /// exists, neutral when there is none.
    fn score_org_complexity(&self, job: &JobPayload) -> DimensionScore {
        let weight = self.config.user_to_job.org_complexity;
        let criteria = "Org complexity readiness".to_string();

        let urgency = job
            .research_brief
            .as_ref()
            .and_then(|brief| brief.hiring_urgency);

        let (score, complexity, rationale) = match urgency {
            None => (
                30.0,
                "Unknown",
                "No research brief; org complexity not assessed (speculative default)",
            ),
            Some(HiringUrgency::Critical) => (
                35.0,
                "High (inflection point)",
                "Org is in transition; expect high expectations (speculative)",
            ),
            Some(HiringUrgency::High) => (
                40.0,
                "Moderate-high (active growth)",
                "Active growth phase (speculative)",
            ),
            Some(HiringUrgency::Moderate) | Some(HiringUrgency::Low) => (
                45.0,
                "Moderate (stable growth)",
                "Normal growth phase (speculative)",
            ),
        };

        DimensionScore {
            criteria,
            actual_value: complexity.into(),
            weight,
            score,
            rationale: rationale.into(),
        }
    }

    // ── Interpretation ─────────────────────────────────────────────────────

    fn interpret(&self, job_to_user: &DirectionFit, user_to_job: &DirectionFit) -> Interpretation {
        let job_meets_user = job_to_user.score >= self.config.good_threshold_job_to_user;
        let user_matches_job = user_to_job.score >= self.config.good_threshold_user_to_job;

        let (summary, action) = match (job_meets_user, user_matches_job) {
            (true, true) => (
                "Mutual alignment: the job meets your requirements and you match the role well.",
                "PURSUE — apply with a strong 90-day plan",
            ),
            (true, false) => (
                "The job meets your requirements but you only partially match the role.",
                "CONSIDER — only if excited; expect a ramp-up period",
            ),
            (false, true) => (
                "You match the role well but the job does not fully meet your requirements.",
                "CONSIDER — if willing to negotiate on the weak dimensions",
            ),
            (false, false) => (
                "Limited alignment on both sides; look for better opportunities.",
                "SKIP — not a strong fit",
            ),
        };

        let mut starters = Vec::new();
        let weakest = job_to_user
            .breakdown
            .iter()
            .chain(user_to_job.breakdown.iter())
            .min_by(|a, b| a.score.total_cmp(&b.score));
        if let Some(dimension) = weakest.filter(|d| d.score < 30.0) {
            if dimension.criteria.contains("Salary") {
                starters.push("What is the full compensation package?".to_string());
            } else if dimension.criteria.contains("Remote") {
                starters.push("Is there flexibility for remote work?".to_string());
            } else if dimension.criteria.contains("Domain") {
                starters.push(
                    "How much of this role is the core domain focus vs. other duties?".to_string(),
                );
            }
        }
        if starters.is_empty() {
            starters.push("What does success look like in the first 90 days?".to_string());
        }

        Interpretation {
            summary: summary.into(),
            action: action.into(),
            conversation_starters: starters,
        }
    }
}

/// Weighted sum of clamped dimension scores, rounded and capped at 50.
fn weighted_total(breakdown: &[DimensionScore]) -> f64 {
    let total: f64 = breakdown
        .iter()
        .map(|d| d.score.clamp(0.0, MAX_DIMENSION_SCORE) * d.weight)
        .sum();
    total.round().min(MAX_DIMENSION_SCORE)
}

fn direction_label(score: f64, good: f64, moderate: f64) -> FitLabel {
    if score >= good {
        FitLabel::Good
    } else if score >= moderate {
        FitLabel::Moderate
    } else {
        FitLabel::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::deal_breakers::DealBreaker;
    use crate::{Background, Preferences, ResearchBrief};

    fn engine() -> RubricEngine {
        RubricEngine::new(RubricConfig::default())
    }

    fn base_profile() -> UserProfile {
        UserProfile {
            schema_version: 1,
            preferences: Preferences {
                salary_floor: Some(150_000),
                salary_target: Some(200_000),
                remote_requirement: RemoteRequirement::RemoteOnly,
                equity_preference: EquityPreference::Required,
                deal_breakers: vec![],
                must_haves: vec!["series_b_or_later".into()],
            },
            background: Background {
                current_title: Some("Director of Growth".into()),
                years_experience: Some(12),
                core_skills: vec![
                    "growth_strategy".into(),
                    "customer_acquisition".into(),
                    "customer_retention".into(),
                    "marketing_analytics".into(),
                ],
                tools: vec!["hubspot".into(), "salesforce".into()],
                industries: vec!["ecommerce".into()],
                target_roles: vec!["VP of Growth".into(), "Chief Growth Officer".into()],
            },
        }
    }

    fn base_job() -> JobPayload {
        JobPayload {
            job_title: Some("VP of Growth".into()),
            company_name: Some("Acme".into()),
            company_stage: Some(CompanyStage::SeriesB),
            company_industry: Some("ecommerce".into()),
            salary_min: Some(162_000),
            salary_max: Some(221_000),
            workplace_type: Some("Remote".into()),
            employment_type: Some("full_time".into()),
            equity_mentioned: true,
            bonus_mentioned: true,
            description_text: Some(
                "Own growth strategy, customer acquisition and customer retention. \
                 Build marketing analytics and revops automation with CRM workflows and \
                 attribution reporting."
                    .into(),
            ),
            research_brief: None,
        }
    }

    #[test]
    fn salary_range_reaching_target_maxes_dimension() {
        // $162k–$221k vs. floor $150k / target $200k: upper bound exceeds
        // the target, so the dimension maxes out.
        let dim = engine().score_salary(&base_job(), &base_profile());
        assert_eq!(dim.score, 50.0);
        assert!(dim.actual_value.contains("$162,000"));
        assert!(dim.actual_value.contains("$221,000"));
    }

    #[test]
    fn salary_below_floor_scales_down() {
        let mut job = base_job();
        job.salary_min = Some(100_000);
        job.salary_max = Some(120_000);

        let dim = engine().score_salary(&job, &base_profile());
        assert_eq!(dim.score, 20.0); // 100/150 * 30
        assert!(dim.rationale.contains("below floor"));
    }

    #[test]
    fn salary_between_floor_and_target_interpolates() {
        let mut job = base_job();
        job.salary_min = Some(160_000);
        job.salary_max = Some(175_000);

        let dim = engine().score_salary(&job, &base_profile());
        assert_eq!(dim.score, 40.0); // 30 + (25/50)*20
        assert!(dim.rationale.contains("50%"));
    }

    #[test]
    fn missing_salary_scores_neutral_with_rationale() {
        let mut job = base_job();
        job.salary_min = None;
        job.salary_max = None;

        let dim = engine().score_salary(&job, &base_profile());
        assert_eq!(dim.score, 20.0);
        assert_eq!(dim.actual_value, "Not specified");
        assert!(dim.rationale.contains("not disclosed"));
    }

    #[test]
    fn workplace_matrix_for_remote_only_user() {
        let eng = engine();
        let profile = base_profile();

        let mut job = base_job();
        assert_eq!(eng.score_workplace(&job, &profile).score, 50.0);

        job.workplace_type = Some("Hybrid".into());
        assert_eq!(eng.score_workplace(&job, &profile).score, 0.0);

        job.workplace_type = None;
        assert_eq!(eng.score_workplace(&job, &profile).score, 0.0);
    }

    #[test]
    fn stage_bonus_applies_for_must_have_and_caps() {
        let eng = engine();
        let dim = eng.score_company_stage(&base_job(), &base_profile());
        assert_eq!(dim.score, 48.0); // 40 + 8 bonus
        assert!(dim.rationale.contains("must-have"));

        let mut job = base_job();
        job.company_stage = Some(CompanyStage::SeriesDPlus);
        let capped = eng.score_company_stage(&job, &base_profile());
        assert_eq!(capped.score, 50.0); // 45 + 8 capped

        job.company_stage = None;
        let unknown = eng.score_company_stage(&job, &base_profile());
        assert_eq!(unknown.score, 20.0);
        assert!(unknown.rationale.contains("default"));
    }

    #[test]
    fn deal_breaker_gate_short_circuits_job_to_user() {
        // On-site job, remote-only user, on_site breaker enabled: score 0
        // with a single breakdown entry naming the trigger.
        let mut profile = base_profile();
        profile.preferences.deal_breakers = vec![DealBreaker::OnSite];
        let mut job = base_job();
        job.workplace_type = Some("on_site".into());

        let fit = engine().score_job_to_user(&job, &profile);
        assert_eq!(fit.score, 0.0);
        assert_eq!(fit.label, FitLabel::Fail);
        assert_eq!(fit.breakdown.len(), 1);
        assert_eq!(fit.breakdown[0].actual_value, "on_site");
        assert!(fit.breakdown[0].rationale.contains("automatic filter"));
    }

    #[test]
    fn passing_gate_includes_scan_dimension() {
        let mut profile = base_profile();
        profile.preferences.deal_breakers = vec![DealBreaker::OnSite];

        let fit = engine().score_job_to_user(&base_job(), &profile);
        assert_eq!(fit.breakdown.len(), 5);
        let scan = fit.breakdown.last().unwrap();
        assert_eq!(scan.actual_value, "PASS");
        assert_eq!(scan.score, 50.0);
    }

    #[test]
    fn role_type_ladder() {
        let eng = engine();
        let profile = base_profile();
        let mut job = base_job();

        assert_eq!(eng.score_role_type(&job, &profile).score, 50.0);

        job.job_title = Some("Head of Revenue Operations".into());
        assert_eq!(eng.score_role_type(&job, &profile).score, 40.0);

        job.job_title = Some("Director of Finance".into());
        assert_eq!(eng.score_role_type(&job, &profile).score, 35.0);

        job.job_title = Some("Marketing Manager".into());
        assert_eq!(eng.score_role_type(&job, &profile).score, 25.0);

        job.job_title = Some("Accountant".into());
        assert_eq!(eng.score_role_type(&job, &profile).score, 15.0);

        job.job_title = None;
        let dim = eng.score_role_type(&job, &profile);
        assert_eq!(dim.score, 15.0);
        assert_eq!(dim.actual_value, "Unknown");
    }

    #[test]
    fn domain_component_buckets_by_count() {
        let eng = engine();
        let mut job = base_job();

        // base_job description: revops + automation + crm + workflows +
        // attribution = 5 hits
        let strong = eng.score_domain_component(&job);
        assert_eq!(strong.score, 50.0);

        job.description_text = Some("We need crm hygiene and attribution reports.".into());
        assert_eq!(eng.score_domain_component(&job).score, 20.0);

        job.description_text = Some("Pure brand storytelling role.".into());
        assert_eq!(eng.score_domain_component(&job).score, 10.0);

        job.description_text = None;
        let missing = eng.score_domain_component(&job);
        assert_eq!(missing.score, 10.0);
        assert!(missing.rationale.contains("No description"));
    }

    #[test]
    fn skill_match_buckets_and_empty_profile() {
        let eng = engine();
        let job = base_job();

        // all four profile skills appear in the description
        let full = eng.score_skill_match(&job, &base_profile());
        assert_eq!(full.score, 50.0);
        assert_eq!(full.actual_value, "4/4 skills matched");

        let mut profile = base_profile();
        profile.background.core_skills = vec!["media_mix_modeling".into()];
        let none = eng.score_skill_match(&job, &profile);
        assert_eq!(none.score, 10.0);

        profile.background.core_skills.clear();
        let empty = eng.score_skill_match(&job, &profile);
        assert_eq!(empty.score, 0.0);
        assert!(empty.rationale.contains("No skills in profile"));
    }

    #[test]
    fn industry_alignment_levels() {
        let eng = engine();
        let profile = base_profile();
        let mut job = base_job();

        assert_eq!(eng.score_industry(&job, &profile).score, 50.0);

        job.company_industry = Some("B2B SaaS".into());
        assert_eq!(eng.score_industry(&job, &profile).score, 35.0);

        job.company_industry = Some("Aerospace".into());
        let new_industry = eng.score_industry(&job, &profile);
        assert_eq!(new_industry.score, 20.0);
        assert!(new_industry.rationale.contains("transferable"));

        job.company_industry = None;
        assert_eq!(eng.score_industry(&job, &profile).score, 20.0);
    }

    #[test]
    fn org_complexity_defaults_neutral_without_brief() {
        let eng = engine();
        let mut job = base_job();

        let neutral = eng.score_org_complexity(&job);
        assert_eq!(neutral.score, 30.0);
        assert!(neutral.rationale.contains("speculative"));

        job.research_brief = Some(ResearchBrief {
            hiring_urgency: Some(HiringUrgency::Critical),
            summary: None,
        });
        assert_eq!(eng.score_org_complexity(&job).score, 35.0);

        job.research_brief = Some(ResearchBrief {
            hiring_urgency: Some(HiringUrgency::Low),
            summary: None,
        });
        assert_eq!(eng.score_org_complexity(&job).score, 45.0);
    }

    #[test]
    fn direction_scores_stay_within_fifty() {
        let eng = engine();
        let profile = base_profile();
        let job = base_job();

        let j2u = eng.score_job_to_user(&job, &profile);
        let u2j = eng.score_user_to_job(&job, &profile);

        assert!(j2u.score >= 0.0 && j2u.score <= 50.0);
        assert!(u2j.score >= 0.0 && u2j.score <= 50.0);
        for dim in j2u.breakdown.iter().chain(u2j.breakdown.iter()) {
            assert!(dim.score >= 0.0 && dim.score <= 50.0);
        }
    }

    #[test]
    fn combine_adds_directions_and_labels_by_band() {
        let eng = engine();
        let profile = base_profile();
        let job = base_job();

        let result = eng.combine(
            eng.score_job_to_user(&job, &profile),
            eng.score_user_to_job(&job, &profile),
        );

        assert_eq!(
            result.overall_score,
            result.job_to_user_fit.score + result.user_to_job_fit.score
        );
        assert!(result.overall_score >= 0.0 && result.overall_score <= 100.0);
        assert!(result.overall_score >= 80.0);
        assert_eq!(result.overall_label, "STRONG FIT");
        assert!(result.interpretation.summary.contains("Mutual alignment"));
    }

    #[test]
    fn interpretation_flags_weakest_dimension() {
        let eng = engine();
        let mut profile = base_profile();
        let mut job = base_job();

        // weaken salary far below floor while keeping both directions decent
        job.salary_min = Some(60_000);
        job.salary_max = Some(70_000);
        profile.preferences.remote_requirement = RemoteRequirement::RemoteOnly;

        let result = eng.combine(
            eng.score_job_to_user(&job, &profile),
            eng.score_user_to_job(&job, &profile),
        );
        assert!(result
            .interpretation
            .conversation_starters
            .iter()
            .any(|s| s.contains("compensation")));
    }

    #[test]
    fn skip_template_when_neither_direction_is_good() {
        let eng = engine();
        let profile = UserProfile::default();
        let job = JobPayload {
            job_title: Some("Junior Accountant".into()),
            ..JobPayload::default()
        };

        let result = eng.combine(
            eng.score_job_to_user(&job, &profile),
            eng.score_user_to_job(&job, &profile),
        );
        assert!(result.interpretation.action.starts_with("SKIP") || result.interpretation.action.starts_with("CONSIDER"));
        assert!(result.overall_score < 80.0);
    }
}
