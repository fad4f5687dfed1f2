//! Hard-no pre-filter for the job→user direction. The deal-breaker set is a
//! closed enum: adding one means adding a variant and its evaluator, never a
//! new string branch. Variants are walked in declaration order restricted to
//! the user's enabled set, and the first trigger short-circuits, so the gate
//! yields exactly one result no matter how many predicates would fire.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::matching::workplace::{normalize_workplace, WorkplaceKind};
use crate::{CompanyStage, EquityPreference, JobPayload, RemoteRequirement, UserProfile};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DealBreaker {
    /// Job is on-site while the user requires remote work.
    OnSite,
    /// The best offered salary sits under the user's floor.
    BelowSalaryFloor,
    /// Equity is required but the job mentions neither equity nor bonus.
    NoEquity,
    /// Company stage indicates zero revenue (pre-seed / seed).
    PreRevenue,
}

impl DealBreaker {
    /// Evaluation order for the gate walk.
    pub const ALL: [DealBreaker; 4] = [
        DealBreaker::OnSite,
        DealBreaker::BelowSalaryFloor,
        DealBreaker::NoEquity,
        DealBreaker::PreRevenue,
    ];

    /// Returns the trigger reason when this predicate fires. Missing data
    /// never triggers a breaker; it degrades in the dimension scorers
    /// instead.
    pub fn evaluate(
        self,
        job: &JobPayload,
        profile: &UserProfile,
        default_salary_floor: u32,
    ) -> Option<String> {
        match self {
            DealBreaker::OnSite => {
                let requires_remote = matches!(
                    profile.preferences.remote_requirement,
                    RemoteRequirement::RemoteOnly | RemoteRequirement::RemoteFirst
                );
                let on_site = normalize_workplace(job.workplace_type.as_deref())
                    == WorkplaceKind::OnSite;
                (requires_remote && on_site)
                    .then(|| "Job is on-site; remote is required".to_string())
            }
            DealBreaker::BelowSalaryFloor => {
                let floor = profile
                    .preferences
                    .salary_floor
                    .unwrap_or(default_salary_floor);
                let best = job.salary_max.or(job.salary_min)?;
                (best < floor).then(|| {
                    format!(
                        "Best offered salary {} is below floor of {}",
                        format_usd(best),
                        format_usd(floor)
                    )
                })
            }
            DealBreaker::NoEquity => {
                let required =
                    profile.preferences.equity_preference == EquityPreference::Required;
                (required && !job.equity_mentioned && !job.bonus_mentioned).then(|| {
                    "Neither equity nor bonus is mentioned, and equity is required".to_string()
                })
            }
            DealBreaker::PreRevenue => matches!(
                job.company_stage,
                Some(CompanyStage::PreSeed) | Some(CompanyStage::Seed)
            )
            .then(|| "Company is pre-revenue or very early stage".to_string()),
        }
    }
}

/// Walk the enabled deal-breakers in canonical order; the first trigger
/// wins. Duplicate entries in the profile list change nothing.
pub fn run_deal_breaker_gate(
    job: &JobPayload,
    profile: &UserProfile,
    default_salary_floor: u32,
) -> Option<(DealBreaker, String)> {
    for breaker in DealBreaker::ALL {
        if !profile.preferences.deal_breakers.contains(&breaker) {
            continue;
        }
        if let Some(reason) = breaker.evaluate(job, profile, default_salary_floor) {
            tracing::debug!(breaker = %breaker, reason, "deal-breaker triggered");
            return Some((breaker, reason));
        }
    }
    None
}

/// `1234567` -> `"$1,234,567"`.
pub(crate) fn format_usd(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Preferences;

    fn remote_profile(breakers: &[DealBreaker]) -> UserProfile {
        UserProfile {
            preferences: Preferences {
                salary_floor: Some(150_000),
                remote_requirement: RemoteRequirement::RemoteOnly,
                equity_preference: EquityPreference::Required,
                deal_breakers: breakers.to_vec(),
                ..Preferences::default()
            },
            ..UserProfile::default()
        }
    }

    fn on_site_job() -> JobPayload {
        JobPayload {
            job_title: Some("VP Growth".into()),
            workplace_type: Some("on_site".into()),
            salary_min: Some(120_000),
            salary_max: Some(140_000),
            company_stage: Some(CompanyStage::Seed),
            ..JobPayload::default()
        }
    }

    #[test]
    fn on_site_breaker_triggers_for_remote_user() {
        let profile = remote_profile(&[DealBreaker::OnSite]);
        let (breaker, reason) =
            run_deal_breaker_gate(&on_site_job(), &profile, 150_000).unwrap();
        assert_eq!(breaker, DealBreaker::OnSite);
        assert!(reason.contains("on-site"));
    }

    #[test]
    fn disabled_breakers_are_skipped() {
        let profile = remote_profile(&[]);
        assert!(run_deal_breaker_gate(&on_site_job(), &profile, 150_000).is_none());
    }

    #[test]
    fn multiple_triggers_yield_exactly_one_result() {
        // Every predicate would fire; the gate reports only the first in
        // canonical order, regardless of profile list order.
        let mut profile = remote_profile(&[
            DealBreaker::PreRevenue,
            DealBreaker::NoEquity,
            DealBreaker::BelowSalaryFloor,
            DealBreaker::OnSite,
        ]);
        let first = run_deal_breaker_gate(&on_site_job(), &profile, 150_000).unwrap();
        assert_eq!(first.0, DealBreaker::OnSite);

        profile.preferences.deal_breakers.reverse();
        let second = run_deal_breaker_gate(&on_site_job(), &profile, 150_000).unwrap();
        assert_eq!(second.0, DealBreaker::OnSite);
    }

    #[test]
    fn salary_floor_uses_offer_upper_bound() {
        let profile = remote_profile(&[DealBreaker::BelowSalaryFloor]);

        let mut job = on_site_job();
        job.salary_min = Some(140_000);
        job.salary_max = Some(160_000);
        // upper bound reaches the floor: no trigger
        assert!(run_deal_breaker_gate(&job, &profile, 150_000).is_none());

        job.salary_max = Some(145_000);
        let (breaker, reason) = run_deal_breaker_gate(&job, &profile, 150_000).unwrap();
        assert_eq!(breaker, DealBreaker::BelowSalaryFloor);
        assert!(reason.contains("$145,000"));
        assert!(reason.contains("$150,000"));
    }

    #[test]
    fn missing_salary_never_triggers_floor_breaker() {
        let profile = remote_profile(&[DealBreaker::BelowSalaryFloor]);
        let mut job = on_site_job();
        job.salary_min = None;
        job.salary_max = None;
        assert!(run_deal_breaker_gate(&job, &profile, 150_000).is_none());
    }

    #[test]
    fn no_equity_requires_both_mentions_absent() {
        let profile = remote_profile(&[DealBreaker::NoEquity]);
        let mut job = on_site_job();

        let (breaker, _) = run_deal_breaker_gate(&job, &profile, 150_000).unwrap();
        assert_eq!(breaker, DealBreaker::NoEquity);

        job.bonus_mentioned = true;
        assert!(run_deal_breaker_gate(&job, &profile, 150_000).is_none());
    }

    #[test]
    fn pre_revenue_triggers_on_seed_stages_only() {
        let profile = remote_profile(&[DealBreaker::PreRevenue]);
        let mut job = on_site_job();

        assert!(run_deal_breaker_gate(&job, &profile, 150_000).is_some());

        job.company_stage = Some(CompanyStage::SeriesB);
        assert!(run_deal_breaker_gate(&job, &profile, 150_000).is_none());

        job.company_stage = None;
        assert!(run_deal_breaker_gate(&job, &profile, 150_000).is_none());
    }

    #[test]
    fn gate_is_idempotent() {
        let profile = remote_profile(&[DealBreaker::OnSite, DealBreaker::OnSite]);
        let job = on_site_job();
        let first = run_deal_breaker_gate(&job, &profile, 150_000);
        let second = run_deal_breaker_gate(&job, &profile, 150_000);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(950), "$950");
        assert_eq!(format_usd(145_000), "$145,000");
        assert_eq!(format_usd(1_234_567), "$1,234,567");
    }
}
