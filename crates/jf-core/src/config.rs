//! Versioned, human-editable scoring configuration. The document is loaded
//! once by the caller and passed by reference into every engine; there is no
//! memoized global. A missing or malformed document degrades to the built-in
//! defaults with a logged warning and a `degraded` flag on the result
//! metadata, never a hard failure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::matching::fit::FitScoreConfig;
use crate::matching::rubric::RubricConfig;

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub version: String,
    pub fit: FitScoreConfig,
    pub rubric: RubricConfig,
    /// Set when the loader fell back to defaults. Never serialized.
    #[serde(skip)]
    pub degraded: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            version: "2.0".into(),
            fit: FitScoreConfig::default(),
            rubric: RubricConfig::default(),
            degraded: false,
        }
    }
}

impl ScoringConfig {
    /// Load the configuration document, falling back to defaults on any
    /// failure (missing file, parse error, invalid weight sums).
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "scoring config unavailable; using built-in defaults"
                );
                return Self::degraded_default();
            }
        };

        match serde_json::from_str::<ScoringConfig>(&raw) {
            Ok(config) if config.weights_are_valid() => {
                tracing::debug!(version = %config.version, "scoring config loaded");
                config
            }
            Ok(config) => {
                tracing::warn!(
                    version = %config.version,
                    "scoring config weights do not sum to 1.0; using built-in defaults"
                );
                Self::degraded_default()
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "scoring config malformed; using built-in defaults"
                );
                Self::degraded_default()
            }
        }
    }

    fn degraded_default() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    /// Every weight set used by a scoring path must sum to 1.0.
    pub fn weights_are_valid(&self) -> bool {
        let sums = [
            self.fit.bucket_weights_sum(),
            self.rubric.job_to_user.sum(),
            self.rubric.user_to_job.sum(),
        ];
        sums.iter().all(|sum| (sum - 1.0).abs() <= WEIGHT_TOLERANCE)
    }
}

/// Upper bound on phrases considered per call, overridable via
/// `JF_MAX_PHRASES`.
pub fn max_phrases() -> usize {
    std::env::var("JF_MAX_PHRASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(256)
}

/// Upper bound on description bytes scanned by the regex rules, overridable
/// via `JF_MAX_DESCRIPTION_CHARS`.
pub fn max_description_chars() -> usize {
    std::env::var("JF_MAX_DESCRIPTION_CHARS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000)
}
