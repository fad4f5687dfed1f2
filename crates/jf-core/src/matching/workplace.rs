//! Workplace-type normalization. Extracted workplace strings are messy
//! ("Hybrid (3 days in office)", "100% Remote", "In-Office"); both the
//! deal-breaker gate and the workplace dimension key off the normalized kind.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkplaceKind {
    Remote,
    Hybrid,
    OnSite,
    Unknown,
}

impl WorkplaceKind {
    /// Human-readable form for rationale strings.
    pub fn display_name(self) -> &'static str {
        match self {
            WorkplaceKind::Remote => "Remote",
            WorkplaceKind::Hybrid => "Hybrid",
            WorkplaceKind::OnSite => "On-site",
            WorkplaceKind::Unknown => "Unknown",
        }
    }
}

/// Normalize a raw workplace string. Remote wins over hybrid when both
/// appear ("remote or hybrid") so ambiguous listings are not over-penalized.
pub fn normalize_workplace(input: Option<&str>) -> WorkplaceKind {
    let Some(raw) = input else {
        return WorkplaceKind::Unknown;
    };
    // Extractors emit both prose ("In-Office, NYC") and enum-ish keys
    // ("on_site"); fold underscores before matching.
    let lower = raw.trim().to_lowercase().replace('_', " ");
    if lower.is_empty() {
        return WorkplaceKind::Unknown;
    }

    if lower.contains("remote") {
        return WorkplaceKind::Remote;
    }
    if lower.contains("hybrid") {
        return WorkplaceKind::Hybrid;
    }
    if lower.contains("on-site")
        || lower.contains("on site")
        || lower.contains("onsite")
        || lower.contains("in-office")
        || lower.contains("in office")
        || lower.contains("office-based")
    {
        return WorkplaceKind::OnSite;
    }

    WorkplaceKind::Unknown
}
