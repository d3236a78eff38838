//! Version catalog record types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One published build of a component
///
/// `version` is an opaque token: it is compared for equality and ordered by
/// catalog position, never parsed as semver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub version: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    /// Published digest, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            url: url.into(),
            notes: None,
            file_size: None,
            sha256: None,
            release_date: None,
        }
    }

    /// Release date when it is a plain `YYYY-MM-DD` value
    pub fn released_on(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}
