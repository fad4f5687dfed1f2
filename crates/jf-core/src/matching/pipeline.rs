//! The engine wiring both scoring paths: classify → level → dual-bucket fit
//! for the skill path, and deal-breaker gate → rubric dimensions → combiner
//! for the bidirectional path. Pure computation over in-memory data; safe to
//! call concurrently once constructed.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_batch, ClassifiedBatch};
use crate::config::{max_description_chars, max_phrases, ScoringConfig};
use crate::error::ScoreError;
use crate::matching::fit::{FitMetadata, FitScoreEngine, FitScoreResult, LeveledBuckets};
use crate::matching::rubric::{CombinedResult, RubricEngine};
use crate::requirements::{detect_requirements, RequirementReport};
use crate::taxonomy::Taxonomy;
use crate::{CandidatePhrase, JobPayload, UserProfile};

/// Classified and leveled phrases for one description, candidates and
/// rejections included for review surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    pub batch: ClassifiedBatch,
    pub report: RequirementReport,
    pub phrases_truncated: bool,
}

pub struct ScoringEngine {
    taxonomy: Taxonomy,
    config: ScoringConfig,
    fit: FitScoreEngine,
    rubric: RubricEngine,
}

impl ScoringEngine {
    pub fn new(taxonomy: Taxonomy, config: ScoringConfig) -> Self {
        let fit = FitScoreEngine::new(config.fit.clone());
        let rubric = RubricEngine::new(config.rubric.clone());
        Self {
            taxonomy,
            config,
            fit,
            rubric,
        }
    }

    /// Built-in taxonomy and default configuration.
    pub fn with_defaults() -> Self {
        Self::new(Taxonomy::builtin(), ScoringConfig::default())
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Classify and level the extracted phrases against the description.
    /// Rejected phrases stop here; candidates are leveled for display but
    /// never scored.
    pub fn analyze_skills(
        &self,
        description: &str,
        phrases: &[CandidatePhrase],
    ) -> SkillAnalysis {
        let cap = max_phrases();
        let phrases_truncated = phrases.len() > cap;
        let description = bounded_text(description);

        let batch = classify_batch(&self.taxonomy, phrases, cap);
        let scoreable: Vec<_> = batch
            .core_skills
            .iter()
            .chain(batch.tools.iter())
            .chain(batch.candidates.iter())
            .cloned()
            .collect();
        let report = detect_requirements(description, &scoreable);

        SkillAnalysis {
            batch,
            report,
            phrases_truncated,
        }
    }

    /// The dual-bucket skill/tool fit path.
    pub fn score_skill_fit(
        &self,
        description: &str,
        phrases: &[CandidatePhrase],
        profile: &UserProfile,
    ) -> FitScoreResult {
        let analysis = self.analyze_skills(description, phrases);
        let buckets = LeveledBuckets::from_report(&analysis.report);

        let user_skills = self
            .taxonomy
            .normalize_skill_set(&profile.background.core_skills);
        let user_tools = self.taxonomy.normalize_tool_set(&profile.background.tools);

        let metadata = FitMetadata {
            scored_at: Utc::now(),
            config_version: self.config.version.clone(),
            degraded_config: self.config.degraded,
            phrases_truncated: analysis.phrases_truncated,
        };

        let result = self
            .fit
            .calculate(&buckets, &user_skills, &user_tools, metadata);
        tracing::debug!(
            overall = result.overall_score,
            core = result.breakdown.core_skills.score,
            tools = result.breakdown.tools.score,
            penalties = result.breakdown.penalties.len(),
            "skill fit scored"
        );
        result
    }

    /// The bidirectional rubric path. A missing profile is a distinct
    /// "not configured" condition, never a zero score.
    pub fn score_job_fit(
        &self,
        job: &JobPayload,
        profile: Option<&UserProfile>,
    ) -> Result<CombinedResult, ScoreError> {
        let profile = profile.ok_or(ScoreError::ProfileNotConfigured)?;
        if !job.is_scoreable() {
            return Err(ScoreError::UnscoreableJob(
                "payload carries neither title nor description".into(),
            ));
        }

        let job_to_user = self.rubric.score_job_to_user(job, profile);
        let user_to_job = self.rubric.score_user_to_job(job, profile);
        let result = self.rubric.combine(job_to_user, user_to_job);

        tracing::debug!(
            overall = result.overall_score,
            label = %result.overall_label,
            "job fit scored"
        );
        Ok(result)
    }
}

/// Truncate untrusted description text (at a char boundary) before the regex
/// rules scan it.
fn bounded_text(text: &str) -> &str {
    let cap = max_description_chars();
    if text.len() <= cap {
        return text;
    }
    let mut end = cap;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    tracing::warn!(len = text.len(), cap, "description truncated before scanning");
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::deal_breakers::DealBreaker;
    use crate::{Background, Preferences, RemoteRequirement};

    const JD: &str = "\
VP of Growth, remote.

Requirements:
Growth strategy ownership and customer acquisition at scale.
Must have HubSpot experience.
You will partner closely with product, finance and lifecycle teammates.

Preferred:
Amplitude familiarity is a plus.
";

    fn phrases() -> Vec<CandidatePhrase> {
        vec![
            CandidatePhrase::new("Growth strategy"),
            CandidatePhrase::new("customer acquisition"),
            CandidatePhrase::new("HubSpot"),
            CandidatePhrase::new("Amplitude"),
            CandidatePhrase::new("team player"),
        ]
    }

    fn base_profile() -> UserProfile {
        UserProfile {
            schema_version: 1,
            preferences: Preferences {
                salary_floor: Some(150_000),
                salary_target: Some(200_000),
                remote_requirement: RemoteRequirement::RemoteOnly,
                deal_breakers: vec![DealBreaker::OnSite],
                ..Preferences::default()
            },
            background: Background {
                core_skills: vec!["growth_strategy".into(), "customer_acquisition".into()],
                tools: vec!["HubSpot".into()],
                target_roles: vec!["VP of Growth".into()],
                ..Background::default()
            },
        }
    }

    #[test]
    fn analysis_levels_scoreable_phrases_and_drops_rejected() {
        let engine = ScoringEngine::with_defaults();
        let analysis = engine.analyze_skills(JD, &phrases());

        assert_eq!(analysis.batch.rejected.len(), 1);
        // rejected phrase never reaches the requirement detector
        let leveled = analysis.report.required.len() + analysis.report.desired.len();
        assert_eq!(leveled, 4);
        assert!(!analysis.phrases_truncated);
    }

    #[test]
    fn skill_fit_matches_profile_and_keeps_evidence() {
        let engine = ScoringEngine::with_defaults();
        let result = engine.score_skill_fit(JD, &phrases(), &base_profile());

        // 0.70 * 1.0 + 0.30 * (2/3) - 0.05 desired-tool penalty
        assert!((result.overall_score - 0.85).abs() < 1e-9);
        assert_eq!(result.breakdown.core_skills.required_matched, 2);
        assert_eq!(result.breakdown.tools.required_matched, 1);
        // the desired Amplitude gap is evidenced and penalized
        assert_eq!(result.breakdown.tools.desired_missing, vec!["Amplitude".to_string()]);
        assert_eq!(result.breakdown.penalties.len(), 1);
        assert!(!result.metadata.degraded_config);
    }

    #[test]
    fn skill_fit_with_empty_profile_scores_zero_buckets() {
        let engine = ScoringEngine::with_defaults();
        let result = engine.score_skill_fit(JD, &phrases(), &UserProfile::default());

        assert_eq!(result.breakdown.core_skills.score, 0.0);
        assert_eq!(result.breakdown.tools.score, 0.0);
        assert!(!result.breakdown.core_skills.required_missing.is_empty());
    }

    #[test]
    fn job_fit_requires_profile() {
        let engine = ScoringEngine::with_defaults();
        let job = JobPayload {
            job_title: Some("VP of Growth".into()),
            ..JobPayload::default()
        };

        let err = engine.score_job_fit(&job, None).unwrap_err();
        assert_eq!(err, ScoreError::ProfileNotConfigured);
    }

    #[test]
    fn job_fit_rejects_unscoreable_payload() {
        let engine = ScoringEngine::with_defaults();
        let profile = base_profile();

        let err = engine
            .score_job_fit(&JobPayload::default(), Some(&profile))
            .unwrap_err();
        assert!(matches!(err, ScoreError::UnscoreableJob(_)));
    }

    #[test]
    fn job_fit_gates_on_site_jobs() {
        let engine = ScoringEngine::with_defaults();
        let job = JobPayload {
            job_title: Some("VP of Growth".into()),
            workplace_type: Some("on_site".into()),
            ..JobPayload::default()
        };

        let result = engine.score_job_fit(&job, Some(&base_profile())).unwrap();
        assert_eq!(result.job_to_user_fit.score, 0.0);
        assert_eq!(result.job_to_user_fit.breakdown.len(), 1);
        assert_eq!(result.job_to_user_fit.breakdown[0].actual_value, "on_site");
    }

    #[test]
    fn every_rubric_dimension_carries_a_rationale() {
        let engine = ScoringEngine::with_defaults();
        let job = JobPayload {
            job_title: Some("VP of Growth".into()),
            description_text: Some("growth strategy with crm automation".into()),
            workplace_type: Some("remote".into()),
            ..JobPayload::default()
        };

        let result = engine.score_job_fit(&job, Some(&base_profile())).unwrap();
        for dim in result
            .job_to_user_fit
            .breakdown
            .iter()
            .chain(result.user_to_job_fit.breakdown.iter())
        {
            assert!(!dim.rationale.is_empty(), "missing rationale: {}", dim.criteria);
            assert!(dim.score >= 0.0 && dim.score <= 50.0);
        }
        assert!(result.overall_score >= 0.0 && result.overall_score <= 100.0);
    }

    #[test]
    fn headerless_description_defaults_everything_required() {
        let engine = ScoringEngine::with_defaults();
        let text = "We want growth strategy and HubSpot.";
        let analysis = engine.analyze_skills(
            text,
            &[
                CandidatePhrase::new("growth strategy"),
                CandidatePhrase::new("HubSpot"),
            ],
        );

        assert!(analysis.report.metadata.default_to_required);
        assert_eq!(analysis.report.required.len(), 2);
        assert!(analysis.report.desired.is_empty());
    }
}
