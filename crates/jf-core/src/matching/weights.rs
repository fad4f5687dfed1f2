use serde::{Deserialize, Serialize};

/// Job→User dimension weights.
/// Salary and workplace dominate: they are the two preferences users refuse
/// to negotiate on most often.
pub const JOB_TO_USER_WEIGHTS: JobToUserWeights = JobToUserWeights {
    salary: 0.25,
    workplace: 0.25,
    equity: 0.20,
    stage: 0.15,
    deal_breakers: 0.15,
};

/// User→Job dimension weights.
/// Role-title alignment leads; industry is the most transferable dimension
/// and weighs least.
pub const USER_TO_JOB_WEIGHTS: UserToJobWeights = UserToJobWeights {
    role_type: 0.25,
    domain_component: 0.20,
    skill_match: 0.20,
    industry: 0.15,
    org_complexity: 0.20,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobToUserWeights {
    pub salary: f64,
    pub workplace: f64,
    pub equity: f64,
    pub stage: f64,
    pub deal_breakers: f64,
}

impl Default for JobToUserWeights {
    fn default() -> Self {
        JOB_TO_USER_WEIGHTS
    }
}

impl JobToUserWeights {
    pub fn sum(&self) -> f64 {
        self.salary + self.workplace + self.equity + self.stage + self.deal_breakers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserToJobWeights {
    pub role_type: f64,
    pub domain_component: f64,
    pub skill_match: f64,
    pub industry: f64,
    pub org_complexity: f64,
}

impl Default for UserToJobWeights {
    fn default() -> Self {
        USER_TO_JOB_WEIGHTS
    }
}

impl UserToJobWeights {
    pub fn sum(&self) -> f64 {
        self.role_type + self.domain_component + self.skill_match + self.industry + self.org_complexity
    }
}
