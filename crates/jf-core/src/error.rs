use thiserror::Error;

/// Terminal conditions for a single scoring call. Sparse-but-well-formed
/// input never lands here; it degrades to documented low/neutral scores with
/// a rationale instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The payload carries neither a title nor any description text, so
    /// there is nothing to score against.
    #[error("job payload is not scoreable: {0}")]
    UnscoreableJob(String),

    /// No user profile has been saved. Distinct from an empty profile: the
    /// caller must prompt for setup rather than show a misleading low score.
    #[error("user profile not configured")]
    ProfileNotConfigured,
}
