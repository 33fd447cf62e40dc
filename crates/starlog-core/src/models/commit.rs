//! Normalized commit record.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Format used for `starred_time` values.
pub const STARRED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single commit, either freshly fetched or persisted after starring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Commit hash; unique key.
    pub id: String,
    pub message: String,
    /// `YYYY-MM-DD HH:MM`, or a placeholder when the source date was unusable.
    pub date: String,
    pub author: String,
    pub repo_name: String,
    pub repo_owner: String,
    #[serde(default)]
    pub starred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred_time: Option<String>,
}

impl CommitRecord {
    /// Whether this record belongs to the repository `owner/name`.
    pub fn belongs_to(&self, owner: &str, name: &str) -> bool {
        self.repo_owner == owner && self.repo_name == name
    }

    /// Mark as starred at `at`.
    pub fn star<Tz>(&mut self, at: DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.starred = true;
        self.starred_time = Some(at.format(STARRED_TIME_FORMAT).to_string());
    }

    /// Case-insensitive substring match on the message. An empty needle
    /// matches everything.
    pub fn message_contains(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.message.to_lowercase().contains(needle_lower)
    }
}
